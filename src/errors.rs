/*!
 * Error types for the catdesc application.
 *
 * This module contains custom error types for the different collaborators the
 * catalog walk talks to, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with HTTP provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised by the SQL session and the catalog metadata store
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A read or generation statement failed to execute
    #[error("Query failed: {message} (statement: {statement})")]
    QueryExecution {
        /// The statement that was sent
        statement: String,
        /// Error reported by the engine
        message: String,
    },

    /// A statement that must return a value returned no rows or a null
    #[error("Query returned no result: {statement}")]
    EmptyResult {
        /// The statement that was sent
        statement: String,
    },

    /// An ALTER statement persisting a comment failed
    #[error("Metadata write failed: {message} (statement: {statement})")]
    MetadataWrite {
        /// The statement that was sent
        statement: String,
        /// Error reported by the engine
        message: String,
    },

    /// Error from the HTTP transport of the session
    #[error("Session error: {0}")]
    Provider(#[from] ProviderError),
}

/// Errors that can occur while setting up or running translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// No package in the backend index covers the requested pair
    #[error("No translation package available for {from} -> {to}")]
    PackageNotFound {
        /// Source language code
        from: String,
        /// Target language code
        to: String,
    },

    /// Downloading or activating the package failed
    #[error("Failed to install translation package: {0}")]
    Install(String),

    /// Translation requested before the pair was installed
    #[error("Language pair {from} -> {to} is not installed")]
    NotInstalled {
        /// Source language code
        from: String,
        /// Target language code
        to: String,
    },

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the catalog or SQL session
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
