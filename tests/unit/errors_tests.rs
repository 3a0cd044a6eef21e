/*!
 * Tests for error types and conversions
 */

use catdesc::errors::{AppError, CatalogError, ProviderError, TranslationError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Too many requests"));
}

#[test]
fn test_providerError_connectionError_shouldDisplayCorrectly() {
    let error = ProviderError::ConnectionError("Host unreachable".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Connection error"));
    assert!(display.contains("Host unreachable"));
}

#[test]
fn test_catalogError_emptyResult_shouldNameStatement() {
    let error = CatalogError::EmptyResult {
        statement: "SELECT ai_gen('x') AS description".to_string(),
    };
    assert!(error.to_string().contains("SELECT ai_gen('x')"));
}

#[test]
fn test_catalogError_metadataWrite_shouldIncludeEngineMessage() {
    let error = CatalogError::MetadataWrite {
        statement: "ALTER TABLE `c`.`s`.`t` SET TBLPROPERTIES ('comment' = 'x')".to_string(),
        message: "PERMISSION_DENIED".to_string(),
    };
    let display = error.to_string();
    assert!(display.starts_with("Metadata write failed"));
    assert!(display.contains("PERMISSION_DENIED"));
}

#[test]
fn test_catalogError_fromProviderError_shouldWrap() {
    let error: CatalogError = ProviderError::AuthenticationError("invalid token".to_string()).into();
    assert!(matches!(error, CatalogError::Provider(ProviderError::AuthenticationError(_))));
    assert!(error.to_string().contains("invalid token"));
}

#[test]
fn test_translationError_packageNotFound_shouldNamePair() {
    let error = TranslationError::PackageNotFound {
        from: "en".to_string(),
        to: "xx".to_string(),
    };
    assert_eq!(error.to_string(), "No translation package available for en -> xx");
}

#[test]
fn test_appError_fromCatalogError_shouldPreserveVariant() {
    let error: AppError = CatalogError::EmptyResult { statement: "DESCRIBE DETAIL x".to_string() }.into();
    assert!(matches!(error, AppError::Catalog(CatalogError::EmptyResult { .. })));
    assert!(error.to_string().starts_with("Catalog error"));
}

#[test]
fn test_appError_fromTranslationError_shouldPreserveVariant() {
    let error: AppError = TranslationError::Install("download failed".to_string()).into();
    assert!(matches!(error, AppError::Translation(TranslationError::Install(_))));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(_)));
    assert!(error.to_string().contains("missing.json"));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(_)));
}
