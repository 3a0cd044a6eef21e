/*!
 * # catdesc - Catalog description generation and translation
 *
 * A Rust library that fills in table and column descriptions of a data
 * warehouse catalog and writes them back translated.
 *
 * ## Features
 *
 * - Walk a list of schemas of one catalog, table by table, column by column
 * - Generate missing English descriptions with the warehouse's AI SQL function
 * - Translate descriptions using one of several backends:
 *   - LibreTranslate (Argos Translate packages)
 *   - Ollama (local LLM)
 *   - Anthropic API
 * - Persist results as table properties and column comments
 * - Dry-run mode that logs the ALTER statements instead of executing them
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `catalog`: Catalog, table and column references and comment state
 * - `sql`: SQL session boundary:
 *   - `sql::databricks`: Databricks SQL Statement Execution API client
 *   - `sql::dry_run`: Read-through session that skips metadata writes
 *   - `sql::memory`: In-process catalog
 * - `generator`: AI description generation through SQL
 * - `writer`: Metadata persistence
 * - `translation`: Translation adapter and service
 * - `providers`: HTTP clients for the translation backends
 * - `walker`: Orchestration of the whole run
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod catalog;
pub mod errors;
pub mod generator;
pub mod language_utils;
pub mod providers;
pub mod sql;
pub mod translation;
pub mod walker;
pub mod writer;

// Re-export main types for easier usage
pub use app_config::Config;
pub use catalog::{CatalogRef, ColumnRef, CommentState, TableRef};
pub use errors::{AppError, CatalogError, ProviderError, TranslationError};
pub use generator::DescriptionGenerator;
pub use sql::SqlSession;
pub use translation::{TranslationService, Translator};
pub use walker::{CatalogWalker, WalkSummary, WalkerConfig};
pub use writer::MetadataWriter;
