/*!
 * Description generation through the warehouse's AI SQL function.
 *
 * Prompts are templates from [`GenerationConfig`]; the rendered prompt is sent
 * as a string literal to e.g. `SELECT ai_gen('<prompt>') AS description`.
 */

use log::debug;
use std::sync::Arc;

use crate::app_config::GenerationConfig;
use crate::catalog::{ColumnRef, TableRef};
use crate::errors::CatalogError;
use crate::sql::{literal, SqlSession};

/// Generates English descriptions for tables and columns
#[derive(Debug, Clone)]
pub struct DescriptionGenerator {
    session: Arc<dyn SqlSession>,
    config: GenerationConfig,
}

impl DescriptionGenerator {
    pub fn new(session: Arc<dyn SqlSession>, config: GenerationConfig) -> Self {
        Self { session, config }
    }

    /// Render the table prompt
    pub fn table_prompt(&self, table: &TableRef) -> String {
        self.config.table_prompt.replace("{table}", &table.to_string())
    }

    /// Render the column prompt
    pub fn column_prompt(&self, column: &ColumnRef) -> String {
        self.config.column_prompt
            .replace("{table}", &column.table.to_string())
            .replace("{column}", &column.column)
    }

    /// Build the generation statement for a prompt
    pub fn statement(&self, prompt: &str) -> String {
        format!("SELECT {}({}) AS description", self.config.function, literal(prompt))
    }

    /// Run a prompt and return the first value of the first row
    async fn generate(&self, prompt: &str) -> Result<String, CatalogError> {
        let statement = self.statement(prompt);
        let result = self.session.execute(&statement).await?;

        match result.first_value() {
            Some(Some(text)) => {
                debug!("Generated {} characters", text.chars().count());
                Ok(text.trim().to_string())
            },
            _ => Err(CatalogError::EmptyResult { statement }),
        }
    }

    /// Generate a description for a table
    pub async fn generate_table_description(&self, table: &TableRef) -> Result<String, CatalogError> {
        self.generate(&self.table_prompt(table)).await
    }

    /// Generate a description for one column
    pub async fn generate_column_description(&self, column: &ColumnRef) -> Result<String, CatalogError> {
        self.generate(&self.column_prompt(column)).await
    }

    /// Generate a description for every column of a table, in catalog order
    ///
    /// The catalog walk does not use this: it calls [`Self::generate_column_description`]
    /// only for columns whose comment is absent or empty.
    pub async fn generate_column_descriptions(&self, table: &TableRef) -> Result<Vec<(String, String)>, CatalogError> {
        let columns = self.session.list_columns(table).await?;
        let mut descriptions = Vec::with_capacity(columns.len());
        for name in columns {
            let description = self.generate_column_description(&table.column(name.as_str())).await?;
            descriptions.push((name, description));
        }
        Ok(descriptions)
    }
}
