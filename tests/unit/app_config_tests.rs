/*!
 * Tests for application configuration functionality
 */

use catdesc::app_config::{
    Config, ConfigOverrides, FailurePolicy, LogLevel, ProviderConfig, TranslationConfig, TranslationProvider,
};
use crate::common;

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.catalog, "main");
    assert_eq!(config.schemas, vec!["bronze_schema", "silver_schema", "gold_schema"]);
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "pt");
    assert_eq!(config.translation.provider, TranslationProvider::LibreTranslate);
    assert_eq!(config.failure_policy, FailurePolicy::Abort);
    assert_eq!(config.log_level, LogLevel::Info);

    assert_eq!(config.generation.function, "ai_gen");
    assert!(config.generation.table_prompt.contains("{table}"));
    assert!(config.generation.column_prompt.contains("{column}"));

    assert_eq!(config.warehouse.wait_timeout_secs, 30);
    assert_eq!(config.translation.common.retry_count, 0);
}

#[test]
fn test_validate_withDefaults_shouldPass() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.source_language = "english".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.target_language = "en".to_string();
    assert!(config.validate().is_err(), "same source and target language");

    let mut config = Config::default();
    config.catalog = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.schemas.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.generation.function = "ai_gen; DROP TABLE x".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_anthropicWithoutKey_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;
    assert!(config.validate().is_err());

    if let Some(provider) = config.translation.get_active_provider_config_mut() {
        provider.api_key = "sk-ant-test".to_string();
    }
    assert!(config.validate().is_ok());
}

#[test]
fn test_validateWarehouse_withMissingSettings_shouldFail() {
    let mut config = Config::default();
    assert!(config.validate_warehouse().is_err());

    config.warehouse.host = "adb-123.azuredatabricks.net".to_string();
    config.warehouse.token = "dapi-test".to_string();
    assert!(config.validate_warehouse().is_err());

    config.warehouse.warehouse_id = "abc123".to_string();
    assert!(config.validate_warehouse().is_ok());
}

#[test]
fn test_saveAndLoad_shouldRoundTrip() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("catdesc.json");

    let mut config = Config::default();
    config.catalog = "C".to_string();
    config.schemas = vec!["s".to_string()];
    config.failure_policy = FailurePolicy::Continue;
    config.translation.provider = TranslationProvider::Ollama;
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.catalog, "C");
    assert_eq!(loaded.schemas, vec!["s"]);
    assert_eq!(loaded.failure_policy, FailurePolicy::Continue);
    assert_eq!(loaded.translation.provider, TranslationProvider::Ollama);
}

#[test]
fn test_fromFile_withMinimalJson_shouldFillDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        temp_dir.path(),
        "catdesc.json",
        r#"{ "catalog": "C", "schemas": ["s"], "failure_policy": "continue", "translation": { "provider": "ollama" } }"#,
    ).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "pt");
    assert_eq!(config.failure_policy, FailurePolicy::Continue);
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.get_model(), "llama3.2:3b");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.warehouse.statement_timeout_secs, 900);
}

#[test]
fn test_fromFile_withInvalidJson_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp_dir.path(), "catdesc.json", "{ not json").unwrap();
    assert!(Config::from_file(&path).is_err());
    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());
}

#[test]
fn test_translationConfig_getters_shouldFollowActiveProvider() {
    let mut config = TranslationConfig::default();
    assert_eq!(config.get_endpoint(), "http://localhost:5000");
    assert_eq!(config.get_model(), "");

    config.provider = TranslationProvider::Anthropic;
    assert_eq!(config.get_endpoint(), "https://api.anthropic.com");
    assert_eq!(config.get_timeout_secs(), 120);

    config.available_providers = vec![ProviderConfig {
        provider_type: "anthropic".to_string(),
        model: "claude-custom".to_string(),
        api_key: "key".to_string(),
        endpoint: String::new(),
        timeout_secs: 5,
    }];
    assert_eq!(config.get_model(), "claude-custom");
    assert_eq!(config.get_api_key(), "key");
    assert_eq!(config.get_endpoint(), "https://api.anthropic.com");
    assert_eq!(config.get_timeout_secs(), 5);
}

#[test]
fn test_applyOverrides_withModelOnMinimalConfig_shouldAddProviderEntry() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        temp_dir.path(),
        "catdesc.json",
        r#"{ "catalog": "C", "schemas": ["s"], "translation": { "provider": "ollama" } }"#,
    ).unwrap();
    let mut config = Config::from_file(&path).unwrap();
    assert!(config.translation.available_providers.is_empty());

    config.apply_overrides(ConfigOverrides {
        model: Some("mistral".to_string()),
        ..ConfigOverrides::default()
    });

    assert_eq!(config.translation.get_model(), "mistral");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.available_providers.len(), 1);
}

#[test]
fn test_applyOverrides_providerThenModel_shouldSetModelOfNewProvider() {
    let mut config = Config::default();
    config.apply_overrides(ConfigOverrides {
        provider: Some(TranslationProvider::Anthropic),
        model: Some("claude-custom".to_string()),
        ..ConfigOverrides::default()
    });

    assert_eq!(config.translation.provider, TranslationProvider::Anthropic);
    assert_eq!(config.translation.get_model(), "claude-custom");
    // The existing entry is updated rather than duplicated
    assert_eq!(config.translation.available_providers.len(), 3);
    assert_eq!(
        config.translation.get_provider_config(&TranslationProvider::Ollama).unwrap().model,
        "llama3.2:3b"
    );
}

#[test]
fn test_applyOverrides_shouldReplaceOnlyGivenValues() {
    let mut config = Config::default();
    config.apply_overrides(ConfigOverrides {
        catalog: Some("C".to_string()),
        schemas: vec!["s1".to_string(), "s2".to_string()],
        target_language: Some("de".to_string()),
        host: Some("adb-1.azuredatabricks.net".to_string()),
        token: Some("dapi-x".to_string()),
        warehouse_id: Some("wh".to_string()),
        continue_on_error: true,
        log_level: Some(LogLevel::Debug),
        ..ConfigOverrides::default()
    });

    assert_eq!(config.catalog, "C");
    assert_eq!(config.schemas, vec!["s1", "s2"]);
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "de");
    assert_eq!(config.failure_policy, FailurePolicy::Continue);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate_warehouse().is_ok());
    assert_eq!(config.translation.provider, TranslationProvider::LibreTranslate);
}

#[test]
fn test_applyOverrides_withEmptyOverrides_shouldKeepConfig() {
    let mut config = Config::default();
    config.apply_overrides(ConfigOverrides::default());

    assert_eq!(config.schemas.len(), 3);
    assert_eq!(config.failure_policy, FailurePolicy::Abort);
    assert_eq!(config.translation.available_providers.len(), 3);
}
