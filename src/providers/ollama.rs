use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{error_for_status, Provider};

/// Ollama client for interacting with Ollama API
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

impl std::fmt::Debug for Ollama {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ollama")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    pub done: bool,
}

/// Model listing returned by `/api/tags`
#[derive(Debug, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ModelInfo {
    pub name: String,
}

/// Pull request for `/api/pull`
#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    status: String,
}

impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }
}

impl Ollama {
    /// Create a new Ollama client from a complete URL
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                // Ollama uses HTTP/1.1
                .http1_only()
                .build()
                .unwrap_or_default(),
        }
    }

    /// Get the server version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response = self.client.get(&url).send().await?;
        let value: serde_json::Value = error_for_status(response).await?.json().await?;

        value["version"].as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }

    /// Models available locally
    pub async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(&url).send().await?;
        let list: ModelList = error_for_status(response).await?.json().await?;
        Ok(list.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether a model is already pulled; "llama3" matches "llama3:latest"
    pub fn has_model(models: &[String], model: &str) -> bool {
        models.iter().any(|m| m == model || (!model.contains(':') && *m == format!("{}:latest", model)))
    }

    /// Download a model into the local Ollama store
    pub async fn pull(&self, model: &str) -> Result<(), ProviderError> {
        info!("Pulling Ollama model {}", model);
        let url = format!("{}/api/pull", self.base_url);
        let response = self.client.post(&url)
            .json(&PullRequest { model, stream: false })
            .send()
            .await?;
        let pulled: PullResponse = error_for_status(response).await?.json().await?;

        if pulled.status == "success" {
            Ok(())
        } else {
            Err(ProviderError::RequestFailed(format!("Pull of {} ended with status '{}'", model, pulled.status)))
        }
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let response = self.client.post(&url)
            .json(&request)
            .send()
            .await?;

        let response = error_for_status(response).await.inspect_err(|e| {
            error!("Ollama API error: {}", e);
        })?;

        let response_text = response.text().await?;
        serde_json::from_str::<GenerationResponse>(&response_text).map_err(|e| {
            error!(
                "Failed to parse Ollama API response: {}. Raw response (first 500 chars): {}",
                e,
                response_text.chars().take(500).collect::<String>()
            );
            ProviderError::ParseError(e.to_string())
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.version().await.map(|_| ())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.response.clone()
    }
}
