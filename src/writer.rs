use log::debug;
use std::sync::Arc;

use crate::catalog::{ColumnRef, TableRef};
use crate::errors::CatalogError;
use crate::sql::{literal, SqlSession};

/// Remove every single quote from a description before it is persisted
pub fn sanitize_description(text: &str) -> String {
    text.replace('\'', "")
}

/// Persists descriptions as table properties and column comments
#[derive(Debug, Clone)]
pub struct MetadataWriter {
    session: Arc<dyn SqlSession>,
}

impl MetadataWriter {
    pub fn new(session: Arc<dyn SqlSession>) -> Self {
        Self { session }
    }

    pub fn table_statement(table: &TableRef, text: &str) -> String {
        format!(
            "ALTER TABLE {} SET TBLPROPERTIES ('comment' = {})",
            table.qualified_sql(),
            literal(&sanitize_description(text))
        )
    }

    pub fn column_statement(column: &ColumnRef, text: &str) -> String {
        format!(
            "ALTER TABLE {} ALTER COLUMN {} COMMENT {}",
            column.table.qualified_sql(),
            column.quoted_column(),
            literal(&sanitize_description(text))
        )
    }

    async fn write(&self, statement: String) -> Result<(), CatalogError> {
        debug!("Writing metadata: {}", statement);
        match self.session.execute(&statement).await {
            Ok(_) => Ok(()),
            Err(CatalogError::QueryExecution { message, .. }) => {
                Err(CatalogError::MetadataWrite { statement, message })
            },
            Err(CatalogError::Provider(e)) => {
                Err(CatalogError::MetadataWrite { statement, message: e.to_string() })
            },
            Err(other) => Err(other),
        }
    }

    /// Set the table's `comment` property
    pub async fn set_table_description(&self, table: &TableRef, text: &str) -> Result<(), CatalogError> {
        self.write(Self::table_statement(table, text)).await
    }

    /// Set a column comment
    pub async fn set_column_description(&self, column: &ColumnRef, text: &str) -> Result<(), CatalogError> {
        self.write(Self::column_statement(column, text)).await
    }
}
