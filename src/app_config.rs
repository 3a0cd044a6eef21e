use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Catalog whose schemas are walked
    pub catalog: String,

    /// Schemas to walk, in order
    pub schemas: Vec<String>,

    /// Language of generated and existing descriptions (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language written back to the catalog (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// SQL warehouse connection
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    /// AI generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// What to do when a table fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// SQL warehouse connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WarehouseConfig {
    /// Workspace host, with or without scheme
    #[serde(default = "String::new")]
    pub host: String,

    /// Access token
    #[serde(default = "String::new")]
    pub token: String,

    /// SQL warehouse identifier
    #[serde(default = "String::new")]
    pub warehouse_id: String,

    /// Server-side wait per statement submission (5 to 50 seconds)
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Delay between polls of a running statement
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Give up (and cancel) a statement after this long
    #[serde(default = "default_statement_timeout_secs")]
    pub statement_timeout_secs: u64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            token: String::new(),
            warehouse_id: String::new(),
            wait_timeout_secs: default_wait_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            statement_timeout_secs: default_statement_timeout_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Settings for the AI generation SQL function
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationConfig {
    /// Name of the SQL function producing text from a prompt
    #[serde(default = "default_generation_function")]
    pub function: String,

    /// Table prompt template
    /// Placeholders: {table}
    #[serde(default = "default_table_prompt")]
    pub table_prompt: String,

    /// Column prompt template
    /// Placeholders: {table}, {column}
    #[serde(default = "default_column_prompt")]
    pub column_prompt: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            function: default_generation_function(),
            table_prompt: default_table_prompt(),
            column_prompt: default_column_prompt(),
        }
    }
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: LibreTranslate (Argos Translate models)
    #[default]
    LibreTranslate,
    // @provider: Ollama
    Ollama,
    // @provider: Anthropic
    Anthropic,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::LibreTranslate => "LibreTranslate",
            Self::Ollama => "Ollama",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::LibreTranslate => "libretranslate".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name (LLM providers only)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::LibreTranslate => Self {
                provider_type: "libretranslate".to_string(),
                model: String::new(),
                api_key: String::new(),
                endpoint: default_libretranslate_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
                timeout_secs: default_anthropic_timeout_secs(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for LLM translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Retry count for failed translation requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for LLM providers (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Behaviour when processing a table fails
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the whole run at the first error
    #[default]
    Abort,
    /// Record the failure and move on to the next table
    Continue,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "pt".to_string()
}

fn default_wait_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_statement_timeout_secs() -> u64 {
    900
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_anthropic_timeout_secs() -> u64 {
    120
}

fn default_retry_count() -> u32 {
    0 // Failures propagate unless retries are configured
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.1
}

fn default_generation_function() -> String {
    "ai_gen".to_string()
}

fn default_table_prompt() -> String {
    "Human: {table} is a single table in a data warehouse. \
As an industry-leading expert Data Scientist, generate a one-paragraph summary of the provided table. \
This summary will be added next to the table as a description in the data explorer UI. \
Your description should be succinct and written in an objective and decisive tone. \
Start with one sentence summarizing what the table is, followed by a detailed description. \
Ensure the paragraph is less than 100 words. \
The summary should only contain English characters, commas, and periods, with each sentence being direct and straightforward. \
Do not include quotation marks. \
Avoid flowery language, descriptions of the schema itself, decorative tone, specific examples, parentheses, and single or double quotes in your answer. \
Do not show table name or schema name or catalog name.".to_string()
}

fn default_column_prompt() -> String {
    "Human: {column} is a column in the table {table}. \
As an industry-leading expert Data Scientist, generate a concise description for this column. \
Start with one sentence summarizing what the column represents, followed by more details about its significance or role in the table. \
Keep the description under 25 words. \
Ensure the paragraph is in English, with each sentence being clear and precise. \
Avoid mentioning the table name, column name, column type, or using parentheses, quotation marks, or examples.".to_string()
}

fn default_libretranslate_endpoint() -> String {
    "http://localhost:5000".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator of data catalog documentation. Translate the text from {source_language} to {target_language}. Reply with the translation only, without quotes, notes or explanations.".to_string()
}

impl Config {
    /// Apply command line values on top of the loaded configuration
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(catalog) = overrides.catalog {
            self.catalog = catalog;
        }

        if !overrides.schemas.is_empty() {
            self.schemas = overrides.schemas;
        }

        if let Some(source_lang) = overrides.source_language {
            self.source_language = source_lang;
        }

        if let Some(target_lang) = overrides.target_language {
            self.target_language = target_lang;
        }

        if let Some(provider) = overrides.provider {
            debug!("Translation provider set to {}", provider);
            self.translation.provider = provider;
        }

        if let Some(model) = overrides.model {
            self.translation.active_provider_config_or_insert().model = model;
        }

        if let Some(host) = overrides.host {
            self.warehouse.host = host;
        }

        if let Some(token) = overrides.token {
            self.warehouse.token = token;
        }

        if let Some(warehouse_id) = overrides.warehouse_id {
            self.warehouse.warehouse_id = warehouse_id;
        }

        if overrides.continue_on_error {
            self.failure_policy = FailurePolicy::Continue;
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .context(format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write this configuration as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .context(format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if crate::language_utils::language_codes_match(&self.source_language, &self.target_language) {
            return Err(anyhow!("Source and target language are the same: {}", self.source_language));
        }

        if self.catalog.trim().is_empty() {
            return Err(anyhow!("Catalog name is required"));
        }

        if self.schemas.is_empty() || self.schemas.iter().any(|s| s.trim().is_empty()) {
            return Err(anyhow!("At least one non-empty schema name is required"));
        }

        if self.generation.function.is_empty()
            || !self.generation.function.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(anyhow!("Invalid generation function name: '{}'", self.generation.function));
        }

        // Validate API key for hosted providers
        if self.translation.provider == TranslationProvider::Anthropic
            && self.translation.get_api_key().is_empty()
        {
            return Err(anyhow!("Translation API key is required for Anthropic provider"));
        }

        Ok(())
    }

    /// Validate the settings needed to reach a real warehouse
    pub fn validate_warehouse(&self) -> Result<()> {
        if self.warehouse.host.is_empty() {
            return Err(anyhow!("Warehouse host is required"));
        }
        if self.warehouse.token.is_empty() {
            return Err(anyhow!("Warehouse access token is required"));
        }
        if self.warehouse.warehouse_id.is_empty() {
            return Err(anyhow!("Warehouse id is required"));
        }
        Ok(())
    }
}

/// Values given on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub catalog: Option<String>,
    /// Replaces the configured list when non-empty
    pub schemas: Vec<String>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub provider: Option<TranslationProvider>,
    /// Model of the active provider, applied after `provider`
    pub model: Option<String>,
    pub host: Option<String>,
    pub token: Option<String>,
    pub warehouse_id: Option<String>,
    pub continue_on_error: bool,
    pub log_level: Option<LogLevel>,
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            catalog: "main".to_string(),
            schemas: vec![
                "bronze_schema".to_string(),
                "silver_schema".to_string(),
                "gold_schema".to_string(),
            ],
            source_language: default_source_language(),
            target_language: default_target_language(),
            warehouse: WarehouseConfig::default(),
            generation: GenerationConfig::default(),
            translation: TranslationConfig::default(),
            failure_policy: FailurePolicy::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider configuration
    pub fn get_active_provider_config_mut(&mut self) -> Option<&mut ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter_mut()
            .find(|p| p.provider_type == provider_str)
    }

    /// Active provider configuration, added with its defaults when the list lacks it
    pub fn active_provider_config_or_insert(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let index = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider.clone()));
                self.available_providers.len() - 1
            },
        };
        &mut self.available_providers[index]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::LibreTranslate => String::new(),
            TranslationProvider::Ollama => default_ollama_model(),
            TranslationProvider::Anthropic => default_anthropic_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::LibreTranslate => default_libretranslate_endpoint(),
            TranslationProvider::Ollama => default_ollama_endpoint(),
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }

        match self.provider {
            TranslationProvider::Anthropic => default_anthropic_timeout_secs(),
            _ => default_timeout_secs(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::LibreTranslate),
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::Anthropic),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
