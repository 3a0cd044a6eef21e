use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use url::Url;

use crate::app_config::WarehouseConfig;
use crate::catalog::{CatalogRef, TableRef};
use crate::errors::{CatalogError, ProviderError};
use crate::providers::error_for_status;
use crate::sql::{QueryResult, SqlSession};

/// Databricks SQL warehouse client using the Statement Execution API
pub struct DatabricksSession {
    /// Workspace base URL
    base_url: Url,
    /// Personal access token
    token: String,
    /// SQL warehouse the statements run on
    warehouse_id: String,
    /// Server-side wait before the API answers with a pending statement
    wait_timeout_secs: u64,
    /// Delay between status polls of a pending statement
    poll_interval: Duration,
    /// Upper bound on the total time spent waiting for one statement
    statement_timeout: Duration,
    /// HTTP client for making requests
    client: Client,
}

impl std::fmt::Debug for DatabricksSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabricksSession")
            .field("base_url", &self.base_url.as_str())
            .field("warehouse_id", &self.warehouse_id)
            .finish_non_exhaustive()
    }
}

/// Statement submission body
#[derive(Debug, Serialize)]
pub struct StatementRequest {
    statement: String,
    warehouse_id: String,
    wait_timeout: String,
    on_wait_timeout: String,
    format: String,
    disposition: String,
}

impl StatementRequest {
    pub fn new(statement: impl Into<String>, warehouse_id: impl Into<String>, wait_timeout_secs: u64) -> Self {
        Self {
            statement: statement.into(),
            warehouse_id: warehouse_id.into(),
            // The API accepts 0 or 5..=50 seconds
            wait_timeout: format!("{}s", wait_timeout_secs.clamp(5, 50)),
            on_wait_timeout: "CONTINUE".to_string(),
            format: "JSON_ARRAY".to_string(),
            disposition: "INLINE".to_string(),
        }
    }
}

/// Statement execution response
#[derive(Debug, Deserialize)]
pub struct StatementResponse {
    pub statement_id: String,
    pub status: StatementStatus,
    #[serde(default)]
    pub manifest: Option<ResultManifest>,
    #[serde(default)]
    pub result: Option<ResultChunk>,
}

#[derive(Debug, Deserialize)]
pub struct StatementStatus {
    pub state: StatementState,
    #[serde(default)]
    pub error: Option<ServiceError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Canceled,
    Closed,
}

impl StatementState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }
}

#[derive(Debug, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResultManifest {
    pub schema: ResultSchema,
}

#[derive(Debug, Deserialize)]
pub struct ResultSchema {
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
}

/// One chunk of inline results
#[derive(Debug, Deserialize)]
pub struct ResultChunk {
    #[serde(default)]
    pub data_array: Vec<Vec<Value>>,
    #[serde(default)]
    pub next_chunk_internal_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableExistsResponse {
    table_exists: bool,
}

impl DatabricksSession {
    /// Create a new session from warehouse configuration
    pub fn new(config: &WarehouseConfig) -> Result<Self, CatalogError> {
        let host = config.host.trim_end_matches('/');
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            Url::parse(host)
        } else {
            Url::parse(&format!("https://{}", host))
        }
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid warehouse host '{}': {}", config.host, e)))?;

        Ok(Self {
            base_url,
            token: config.token.clone(),
            warehouse_id: config.warehouse_id.clone(),
            wait_timeout_secs: config.wait_timeout_secs,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            statement_timeout: Duration::from_secs(config.statement_timeout_secs),
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid API path '{}': {}", path, e)))
    }

    /// Shared status mapping, logged with the Databricks context
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        error_for_status(response).await.inspect_err(|e| {
            error!("Databricks API error: {}", e);
        })
    }

    async fn submit(&self, statement: &str) -> Result<StatementResponse, ProviderError> {
        let url = self.endpoint("/api/2.0/sql/statements")?;
        let request = StatementRequest::new(statement, &self.warehouse_id, self.wait_timeout_secs);

        let response = self.client.post(url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        Ok(Self::check_status(response).await?.json::<StatementResponse>().await?)
    }

    async fn poll(&self, statement_id: &str) -> Result<StatementResponse, ProviderError> {
        let url = self.endpoint(&format!("/api/2.0/sql/statements/{}", statement_id))?;
        let response = self.client.get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        Ok(Self::check_status(response).await?.json::<StatementResponse>().await?)
    }

    async fn cancel(&self, statement_id: &str) {
        let Ok(url) = self.endpoint(&format!("/api/2.0/sql/statements/{}/cancel", statement_id)) else {
            return;
        };
        if let Err(e) = self.client.post(url).bearer_auth(&self.token).send().await {
            debug!("Failed to cancel statement {}: {}", statement_id, e);
        }
    }

    async fn fetch_chunk(&self, link: &str) -> Result<ResultChunk, ProviderError> {
        let url = self.endpoint(link)?;
        let response = self.client.get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        Ok(Self::check_status(response).await?.json::<ResultChunk>().await?)
    }

    /// Submit a statement and wait until it reaches a terminal state
    async fn run_to_completion(&self, statement: &str) -> Result<StatementResponse, CatalogError> {
        let started = Instant::now();
        let mut response = self.submit(statement).await?;

        while !response.status.state.is_terminal() {
            if started.elapsed() >= self.statement_timeout {
                self.cancel(&response.statement_id).await;
                return Err(CatalogError::QueryExecution {
                    statement: statement.to_string(),
                    message: format!("statement did not finish within {}s", self.statement_timeout.as_secs()),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
            response = self.poll(&response.statement_id).await?;
        }

        match response.status.state {
            StatementState::Succeeded => Ok(response),
            state => {
                let message = response.status.error.as_ref()
                    .map(|e| match (&e.error_code, &e.message) {
                        (Some(code), Some(message)) => format!("{}: {}", code, message),
                        (None, Some(message)) => message.clone(),
                        (Some(code), None) => code.clone(),
                        (None, None) => format!("statement ended in state {:?}", state),
                    })
                    .unwrap_or_else(|| format!("statement ended in state {:?}", state));
                Err(CatalogError::QueryExecution {
                    statement: statement.to_string(),
                    message,
                })
            },
        }
    }
}

/// Render a JSON_ARRAY cell as an optional string
fn cell_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl SqlSession for DatabricksSession {
    async fn execute(&self, statement: &str) -> Result<QueryResult, CatalogError> {
        debug!("Executing: {}", statement);
        let response = self.run_to_completion(statement).await?;

        let columns = response.manifest
            .map(|m| m.schema.columns.into_iter().map(|c| c.name).collect())
            .unwrap_or_default();

        let mut rows = Vec::new();
        let mut chunk = response.result;
        while let Some(current) = chunk.take() {
            rows.extend(
                current.data_array.into_iter()
                    .map(|row| row.into_iter().map(cell_to_string).collect::<Vec<_>>())
            );
            if let Some(link) = current.next_chunk_internal_link {
                chunk = Some(self.fetch_chunk(&link).await?);
            }
        }

        Ok(QueryResult::new(columns, rows))
    }

    async fn list_tables(&self, namespace: &CatalogRef) -> Result<Vec<String>, CatalogError> {
        let statement = format!("SHOW TABLES IN {}", namespace.qualified_sql());
        let result = self.execute(&statement).await?;
        Ok((0..result.rows.len())
            .filter(|&row| result.value(row, "isTemporary") != Some("true"))
            .filter_map(|row| result.value(row, "tableName").map(str::to_string))
            .collect())
    }

    async fn list_columns(&self, table: &TableRef) -> Result<Vec<String>, CatalogError> {
        let statement = format!("SHOW COLUMNS IN {}", table.qualified_sql());
        let result = self.execute(&statement).await?;
        Ok((0..result.rows.len())
            .filter_map(|row| result.value(row, "col_name").map(|name| name.trim().to_string()))
            .collect())
    }

    async fn table_exists(&self, table: &TableRef) -> Result<bool, CatalogError> {
        let mut url = self.endpoint("/api/2.1/unity-catalog/tables")?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::RequestFailed(format!("Cannot build table URL from {}", self.base_url)))?
            .push(&table.to_string())
            .push("exists");

        let response = self.client.get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(ProviderError::from)?;

        let parsed = Self::check_status(response).await?
            .json::<TableExistsResponse>()
            .await
            .map_err(ProviderError::from)?;
        Ok(parsed.table_exists)
    }
}
