/*!
 * Translation adapter.
 *
 * A [`Translator`] installs a language pair once and then translates
 * description text synchronously, one request at a time.
 *
 * - `core`: [`TranslationService`], dispatching to the configured backend
 */

use async_trait::async_trait;
use std::fmt::{self, Debug};

use crate::errors::TranslationError;

/// Source and target language codes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    pub from: String,
    pub to: String,
}

impl LanguagePair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Whether this pair covers the given codes, whatever their ISO form
    pub fn matches(&self, from: &str, to: &str) -> bool {
        crate::language_utils::language_codes_match(&self.from, from)
            && crate::language_utils::language_codes_match(&self.to, to)
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Capability interface for translating description text
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Make the language pair available, downloading whatever the backend needs
    async fn install_language_pair(&self, from: &str, to: &str) -> Result<(), TranslationError>;

    /// Translate text between two installed languages
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslationError>;
}

pub use self::core::TranslationService;

pub mod core;
