use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{error_for_status, Provider};

/// LibreTranslate client
///
/// LibreTranslate serves Argos Translate language packages over HTTP. The
/// `/languages` listing doubles as the index of installed packages.
pub struct LibreTranslate {
    /// Base URL of the server
    endpoint: String,
    /// Optional API key
    api_key: Option<String>,
    /// HTTP client for making requests
    client: Client,
}

impl std::fmt::Debug for LibreTranslate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibreTranslate")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Translate request body
#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    /// Text to translate
    pub q: String,
    /// Source language code
    pub source: String,
    /// Target language code
    pub target: String,
    /// "text" or "html"
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl TranslateRequest {
    pub fn new(text: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            q: text.into(),
            source: source.into(),
            target: target.into(),
            format: "text".to_string(),
            api_key: None,
        }
    }
}

/// Translate response body
#[derive(Debug, Clone, Deserialize)]
pub struct TranslateResponse {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

/// One entry of the `/languages` index
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LanguagePackage {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub targets: Vec<String>,
}

impl LibreTranslate {
    /// Create a new LibreTranslate client
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout_secs: u64) -> Self {
        let api_key = api_key.into();
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: if api_key.is_empty() { None } else { Some(api_key) },
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Fetch the language package index
    pub async fn languages(&self) -> Result<Vec<LanguagePackage>, ProviderError> {
        let url = format!("{}/languages", self.endpoint);
        let response = self.client.get(&url).send().await?;
        let packages = error_for_status(response).await?
            .json::<Vec<LanguagePackage>>()
            .await?;
        Ok(packages)
    }
}

#[async_trait]
impl Provider for LibreTranslate {
    type Request = TranslateRequest;
    type Response = TranslateResponse;

    async fn complete(&self, mut request: Self::Request) -> Result<Self::Response, ProviderError> {
        let url = format!("{}/translate", self.endpoint);
        if request.api_key.is_none() {
            request.api_key = self.api_key.clone();
        }

        let response = self.client.post(&url)
            .json(&request)
            .send()
            .await?;

        let response = error_for_status(response).await.inspect_err(|e| {
            error!("LibreTranslate API error: {}", e);
        })?;

        response.json::<TranslateResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse LibreTranslate response: {}", e)))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.languages().await.map(|_| ())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.translated_text.clone()
    }
}
