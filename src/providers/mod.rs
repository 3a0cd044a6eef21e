/*!
 * Provider implementations for the translation backends.
 *
 * This module contains HTTP clients for:
 * - LibreTranslate: Argos Translate models served over HTTP
 * - Ollama: Local LLM server
 * - Anthropic: Anthropic API integration
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// Map a non-success HTTP response into a provider error
pub(crate) async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());

    match status.as_u16() {
        401 | 403 => Err(ProviderError::AuthenticationError(message)),
        code => Err(ProviderError::ApiError { status_code: code, message }),
    }
}

pub mod anthropic;
pub mod libretranslate;
pub mod ollama;
