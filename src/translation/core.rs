/*!
 * Core translation service implementation.
 *
 * [`TranslationService`] owns one backend client chosen from configuration and
 * remembers which language pairs were installed during this run.
 */

use async_trait::async_trait;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::libretranslate::{LanguagePackage, LibreTranslate, TranslateRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::providers::Provider;
use crate::translation::{LanguagePair, Translator};

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Argos Translate packages behind LibreTranslate
    LibreTranslate {
        client: LibreTranslate,
    },

    /// Ollama LLM service
    Ollama {
        client: Ollama,
        model: String,
    },

    /// Anthropic API service
    Anthropic {
        client: Anthropic,
        model: String,
    },
}

/// A pair requested by the caller and the codes the backend uses for it
#[derive(Debug, Clone)]
struct InstalledPair {
    requested: LanguagePair,
    backend: LanguagePair,
}

/// Main translation service
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    installed: Mutex<Vec<InstalledPair>>,
}

/// Pick the first package whose source matches `from` and that targets `to`
pub fn find_package(packages: &[LanguagePackage], from: &str, to: &str) -> Option<LanguagePair> {
    packages.iter()
        .filter(|p| language_utils::language_codes_match(&p.code, from))
        .find_map(|p| {
            p.targets.iter()
                .find(|t| language_utils::language_codes_match(t, to))
                .map(|t| LanguagePair::new(p.code.clone(), t.clone()))
        })
}

/// Whether a provider failure is worth another attempt
fn is_retryable(error: &ProviderError) -> bool {
    match error {
        ProviderError::ConnectionError(_) => true,
        ProviderError::ApiError { status_code, .. } => *status_code == 429 || *status_code >= 500,
        _ => false,
    }
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Self {
        let timeout_secs = config.get_timeout_secs();
        let provider = match config.provider {
            TranslationProvider::LibreTranslate => TranslationProviderImpl::LibreTranslate {
                client: LibreTranslate::new(config.get_endpoint(), config.get_api_key(), timeout_secs),
            },
            TranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new(config.get_endpoint(), timeout_secs),
                model: config.get_model(),
            },
            TranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(config.get_api_key(), config.get_endpoint(), config.get_model(), timeout_secs),
                model: config.get_model(),
            },
        };

        Self {
            provider,
            config,
            installed: Mutex::new(Vec::new()),
        }
    }

    /// Render the LLM system prompt for a pair
    pub fn system_prompt(&self, from: &str, to: &str) -> String {
        let source = language_utils::get_language_name(from).unwrap_or_else(|_| from.to_string());
        let target = language_utils::get_language_name(to).unwrap_or_else(|_| to.to_string());
        self.config.common.system_prompt
            .replace("{source_language}", &source)
            .replace("{target_language}", &target)
    }

    fn installed_pair(&self, from: &str, to: &str) -> Option<LanguagePair> {
        self.installed.lock().iter()
            .find(|p| p.requested.matches(from, to))
            .map(|p| p.backend.clone())
    }

    /// Check both codes are real languages before talking to an LLM backend
    fn check_llm_pair(from: &str, to: &str) -> Result<LanguagePair, TranslationError> {
        match (language_utils::resolve_language(from), language_utils::resolve_language(to)) {
            (Ok(_), Ok(_)) => Ok(LanguagePair::new(from, to)),
            _ => Err(TranslationError::PackageNotFound {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }

    async fn resolve_backend_pair(&self, from: &str, to: &str) -> Result<LanguagePair, TranslationError> {
        match &self.provider {
            TranslationProviderImpl::LibreTranslate { client } => {
                let packages = client.languages().await
                    .map_err(|e| TranslationError::Install(format!("Failed to fetch package index: {}", e)))?;
                find_package(&packages, from, to).ok_or_else(|| TranslationError::PackageNotFound {
                    from: from.to_string(),
                    to: to.to_string(),
                })
            },
            TranslationProviderImpl::Ollama { client, model } => {
                let pair = Self::check_llm_pair(from, to)?;
                let models = client.list_models().await
                    .map_err(|e| TranslationError::Install(format!("Failed to reach Ollama: {}", e)))?;
                if !Ollama::has_model(&models, model) {
                    client.pull(model).await
                        .map_err(|e| TranslationError::Install(format!("Failed to pull {}: {}", model, e)))?;
                }
                Ok(pair)
            },
            TranslationProviderImpl::Anthropic { client, .. } => {
                let pair = Self::check_llm_pair(from, to)?;
                client.test_connection().await
                    .map_err(|e| TranslationError::Install(format!("Failed to reach Anthropic: {}", e)))?;
                Ok(pair)
            },
        }
    }

    async fn translate_once(&self, text: &str, pair: &LanguagePair) -> Result<String, ProviderError> {
        let temperature = self.config.common.temperature;
        let translated = match &self.provider {
            TranslationProviderImpl::LibreTranslate { client } => {
                let response = client.complete(TranslateRequest::new(text, &pair.from, &pair.to)).await?;
                LibreTranslate::extract_text(&response)
            },
            TranslationProviderImpl::Ollama { client, model } => {
                let request = GenerationRequest::new(model.clone(), text)
                    .system(self.system_prompt(&pair.from, &pair.to))
                    .temperature(temperature);
                let response = client.complete(request).await?;
                Ollama::extract_text(&response)
            },
            TranslationProviderImpl::Anthropic { client, model } => {
                let request = AnthropicRequest::new(model.clone(), 2048)
                    .system(self.system_prompt(&pair.from, &pair.to))
                    .add_message("user", text)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                Anthropic::extract_text(&response)
            },
        };
        Ok(translated.trim().to_string())
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn install_language_pair(&self, from: &str, to: &str) -> Result<(), TranslationError> {
        if self.installed_pair(from, to).is_some() {
            debug!("Language pair {} -> {} already installed", from, to);
            return Ok(());
        }

        info!("Installing {} -> {} for {}", from, to, self.config.provider.display_name());
        let backend = self.resolve_backend_pair(from, to).await?;
        debug!("Backend codes for {} -> {}: {}", from, to, backend);

        self.installed.lock().push(InstalledPair {
            requested: LanguagePair::new(from, to),
            backend,
        });
        Ok(())
    }

    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslationError> {
        let pair = self.installed_pair(from, to).ok_or_else(|| TranslationError::NotInstalled {
            from: from.to_string(),
            to: to.to_string(),
        })?;

        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let retry_count = self.config.common.retry_count;
        let mut attempt = 0;
        loop {
            match self.translate_once(text, &pair).await {
                Ok(translated) => return Ok(translated),
                Err(e) if attempt < retry_count && is_retryable(&e) => {
                    let backoff = self.config.common.retry_backoff_ms.saturating_mul(1 << attempt.min(16));
                    warn!("Translation attempt {} failed: {}. Retrying in {}ms", attempt + 1, e, backoff);
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    attempt += 1;
                },
                Err(e) => return Err(TranslationError::Provider(e)),
            }
        }
    }
}
