use async_trait::async_trait;
use log::info;
use parking_lot::Mutex;

use crate::catalog::{CatalogRef, TableRef};
use crate::errors::CatalogError;
use crate::sql::{is_alter_statement, QueryResult, SqlSession};

/// Session wrapper that forwards reads and only logs metadata writes
#[derive(Debug)]
pub struct DryRunSession<S: SqlSession> {
    inner: S,
    skipped: Mutex<Vec<String>>,
}

impl<S: SqlSession> DryRunSession<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            skipped: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// ALTER statements that would have been executed
    pub fn skipped_statements(&self) -> Vec<String> {
        self.skipped.lock().clone()
    }
}

#[async_trait]
impl<S: SqlSession> SqlSession for DryRunSession<S> {
    async fn execute(&self, statement: &str) -> Result<QueryResult, CatalogError> {
        if is_alter_statement(statement) {
            info!("[dry-run] {}", statement);
            self.skipped.lock().push(statement.to_string());
            return Ok(QueryResult::empty());
        }
        self.inner.execute(statement).await
    }

    async fn list_tables(&self, namespace: &CatalogRef) -> Result<Vec<String>, CatalogError> {
        self.inner.list_tables(namespace).await
    }

    async fn list_columns(&self, table: &TableRef) -> Result<Vec<String>, CatalogError> {
        self.inner.list_columns(table).await
    }

    async fn table_exists(&self, table: &TableRef) -> Result<bool, CatalogError> {
        self.inner.table_exists(table).await
    }
}
