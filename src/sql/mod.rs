/*!
 * SQL session boundary.
 *
 * Every read and write the walk performs goes through a [`SqlSession`]:
 * - `databricks`: Databricks SQL Statement Execution API client
 * - `dry_run`: wrapper that forwards reads and only logs ALTER statements
 * - `memory`: in-process catalog for offline runs and tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::catalog::{CatalogRef, TableRef};
use crate::errors::CatalogError;

/// Rows returned by a statement, values rendered as strings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Column names in result order
    pub columns: Vec<String>,
    /// Row values; `None` is SQL NULL
    pub rows: Vec<Vec<Option<String>>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    /// Result of a statement that produces no rows
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by case-insensitive name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    /// First row, first column. `None` when there is no row.
    pub fn first_value(&self) -> Option<Option<&str>> {
        self.rows
            .first()
            .map(|row| row.first().and_then(|v| v.as_deref()))
    }

    /// First row, named column. `None` when there is no row or no such column.
    pub fn first_named(&self, name: &str) -> Option<Option<&str>> {
        let index = self.column_index(name)?;
        self.rows
            .first()
            .map(|row| row.get(index).and_then(|v| v.as_deref()))
    }

    /// Value of a named column in a given row
    pub fn value(&self, row: usize, name: &str) -> Option<&str> {
        let index = self.column_index(name)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }
}

/// Narrow interface over the SQL engine and its catalog metadata API
#[async_trait]
pub trait SqlSession: Send + Sync + Debug {
    /// Execute a statement and collect its rows
    async fn execute(&self, statement: &str) -> Result<QueryResult, CatalogError>;

    /// Names of the tables in a schema
    async fn list_tables(&self, namespace: &CatalogRef) -> Result<Vec<String>, CatalogError>;

    /// Column names of a table, in catalog order
    async fn list_columns(&self, table: &TableRef) -> Result<Vec<String>, CatalogError>;

    /// Whether the table currently exists
    async fn table_exists(&self, table: &TableRef) -> Result<bool, CatalogError>;
}

/// Render a single-quoted SQL string literal
pub fn literal(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Whether a statement mutates catalog metadata
pub fn is_alter_statement(statement: &str) -> bool {
    statement
        .trim_start()
        .get(..5)
        .is_some_and(|head| head.eq_ignore_ascii_case("ALTER"))
}

pub mod databricks;
pub mod dry_run;
pub mod memory;
