/*!
 * In-process catalog implementing [`SqlSession`].
 *
 * Understands exactly the statement shapes the walk issues:
 * `DESCRIBE DETAIL`, `DESCRIBE TABLE`, `SELECT <fn>('<prompt>')`,
 * `ALTER TABLE .. SET TBLPROPERTIES ('comment' = ..)` and
 * `ALTER TABLE .. ALTER COLUMN .. COMMENT ..`. Every statement is recorded.
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use std::collections::VecDeque;

use crate::catalog::{CatalogRef, TableRef};
use crate::errors::CatalogError;
use crate::sql::{QueryResult, SqlSession};

const IDENT: &str = r"`(?:[^`]|``)*`";
const LITERAL: &str = r"'((?:[^'\\]|\\.)*)'";

static IDENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(IDENT).unwrap());

static DESCRIBE_DETAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?is)^\s*DESCRIBE\s+DETAIL\s+({i}\.{i}\.{i})\s*;?\s*$", i = IDENT)).unwrap()
});

static DESCRIBE_TABLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?is)^\s*DESCRIBE\s+TABLE\s+({i}\.{i}\.{i})\s*;?\s*$", i = IDENT)).unwrap()
});

static GENERATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?is)^\s*SELECT\s+(\w+)\s*\(\s*{l}\s*\)", l = LITERAL)).unwrap()
});

static SET_TABLE_COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*ALTER\s+TABLE\s+({i}\.{i}\.{i})\s+SET\s+TBLPROPERTIES\s*\(\s*'comment'\s*=\s*{l}\s*\)\s*;?\s*$",
        i = IDENT,
        l = LITERAL
    ))
    .unwrap()
});

static SET_COLUMN_COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*ALTER\s+TABLE\s+({i}\.{i}\.{i})\s+ALTER\s+COLUMN\s+({i})\s+COMMENT\s+{l}\s*;?\s*$",
        i = IDENT,
        l = LITERAL
    ))
    .unwrap()
});

/// A column held by the memory catalog
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryColumn {
    pub name: String,
    pub data_type: String,
    pub comment: Option<String>,
}

/// A table held by the memory catalog
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTable {
    pub reference: TableRef,
    pub description: Option<String>,
    pub columns: Vec<MemoryColumn>,
    /// Listed by the schema but gone when looked up
    pub exists: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: Vec<MemoryTable>,
    statements: Vec<String>,
    prompts: Vec<String>,
    generated: VecDeque<Option<String>>,
    generation_count: usize,
    failures: Vec<String>,
}

/// In-memory catalog store
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    state: Mutex<MemoryState>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table with its description and `(column, comment)` pairs
    pub fn with_table(self, table: TableRef, description: Option<&str>, columns: &[(&str, Option<&str>)]) -> Self {
        self.state.lock().tables.push(MemoryTable {
            reference: table,
            description: description.map(str::to_string),
            columns: columns.iter()
                .map(|(name, comment)| MemoryColumn {
                    name: name.to_string(),
                    data_type: "string".to_string(),
                    comment: comment.map(str::to_string),
                })
                .collect(),
            exists: true,
        });
        self
    }

    /// Add a table that is listed by its schema but no longer exists
    pub fn with_dropped_table(self, table: TableRef) -> Self {
        self.state.lock().tables.push(MemoryTable {
            reference: table,
            description: None,
            columns: Vec::new(),
            exists: false,
        });
        self
    }

    /// Queue the value returned by the next generation call; `None` yields NULL
    pub fn with_generation_response(self, response: Option<&str>) -> Self {
        self.state.lock().generated.push_back(response.map(str::to_string));
        self
    }

    /// Make every statement containing `pattern` fail
    pub fn with_failure_on(self, pattern: &str) -> Self {
        self.state.lock().failures.push(pattern.to_string());
        self
    }

    /// All statements received, in order
    pub fn statements(&self) -> Vec<String> {
        self.state.lock().statements.clone()
    }

    /// Prompts passed to the generation function, unescaped
    pub fn generation_prompts(&self) -> Vec<String> {
        self.state.lock().prompts.clone()
    }

    pub fn table_description(&self, table: &TableRef) -> Option<String> {
        let state = self.state.lock();
        state.tables.iter()
            .find(|t| &t.reference == table)
            .and_then(|t| t.description.clone())
    }

    pub fn column_comment(&self, table: &TableRef, column: &str) -> Option<String> {
        let state = self.state.lock();
        state.tables.iter()
            .find(|t| &t.reference == table)
            .and_then(|t| t.columns.iter().find(|c| c.name == column))
            .and_then(|c| c.comment.clone())
    }

    fn not_found(statement: &str, table: &TableRef) -> CatalogError {
        CatalogError::QueryExecution {
            statement: statement.to_string(),
            message: format!("[TABLE_OR_VIEW_NOT_FOUND] The table {} cannot be found", table),
        }
    }

    fn run(&self, statement: &str) -> Result<QueryResult, CatalogError> {
        let mut state = self.state.lock();
        state.statements.push(statement.to_string());

        if state.failures.iter().any(|pattern| statement.contains(pattern.as_str())) {
            return Err(CatalogError::QueryExecution {
                statement: statement.to_string(),
                message: "injected failure".to_string(),
            });
        }

        if let Some(caps) = DESCRIBE_DETAIL_REGEX.captures(statement) {
            let reference = parse_table(&caps[1]);
            let table = state.tables.iter()
                .find(|t| t.exists && t.reference == reference)
                .ok_or_else(|| Self::not_found(statement, &reference))?;
            return Ok(QueryResult::new(
                vec!["format".into(), "name".into(), "description".into()],
                vec![vec![Some("delta".into()), Some(reference.to_string()), table.description.clone()]],
            ));
        }

        if let Some(caps) = DESCRIBE_TABLE_REGEX.captures(statement) {
            let reference = parse_table(&caps[1]);
            let table = state.tables.iter()
                .find(|t| t.exists && t.reference == reference)
                .ok_or_else(|| Self::not_found(statement, &reference))?;
            return Ok(QueryResult::new(
                vec!["col_name".into(), "data_type".into(), "comment".into()],
                table.columns.iter()
                    .map(|c| vec![Some(c.name.clone()), Some(c.data_type.clone()), c.comment.clone()])
                    .collect(),
            ));
        }

        if let Some(caps) = GENERATE_REGEX.captures(statement) {
            let prompt = unescape_literal(&caps[2]);
            state.prompts.push(prompt);
            state.generation_count += 1;
            let count = state.generation_count;
            let value = state.generated.pop_front()
                .unwrap_or_else(|| Some(format!("Generated description {}", count)));
            return Ok(QueryResult::new(vec!["description".into()], vec![vec![value]]));
        }

        if let Some(caps) = SET_TABLE_COMMENT_REGEX.captures(statement) {
            let reference = parse_table(&caps[1]);
            let comment = unescape_literal(&caps[2]);
            let table = state.tables.iter_mut()
                .find(|t| t.exists && t.reference == reference)
                .ok_or_else(|| Self::not_found(statement, &reference))?;
            table.description = Some(comment);
            return Ok(QueryResult::empty());
        }

        if let Some(caps) = SET_COLUMN_COMMENT_REGEX.captures(statement) {
            let reference = parse_table(&caps[1]);
            let column = parse_identifiers(&caps[2]).pop().unwrap_or_default();
            let comment = unescape_literal(&caps[3]);
            let table = state.tables.iter_mut()
                .find(|t| t.exists && t.reference == reference)
                .ok_or_else(|| Self::not_found(statement, &reference))?;
            let target = table.columns.iter_mut()
                .find(|c| c.name == column)
                .ok_or_else(|| CatalogError::QueryExecution {
                    statement: statement.to_string(),
                    message: format!("[UNRESOLVED_COLUMN] {} not found in {}", column, reference),
                })?;
            target.comment = Some(comment);
            return Ok(QueryResult::empty());
        }

        Err(CatalogError::QueryExecution {
            statement: statement.to_string(),
            message: "unsupported statement".to_string(),
        })
    }
}

/// Split a backtick-quoted dotted path into its identifiers
fn parse_identifiers(path: &str) -> Vec<String> {
    IDENT_REGEX.find_iter(path)
        .map(|m| {
            let quoted = m.as_str();
            quoted[1..quoted.len() - 1].replace("``", "`")
        })
        .collect()
}

fn parse_table(path: &str) -> TableRef {
    let mut parts = parse_identifiers(path).into_iter();
    TableRef::new(
        parts.next().unwrap_or_default(),
        parts.next().unwrap_or_default(),
        parts.next().unwrap_or_default(),
    )
}

/// Reverse of [`crate::sql::literal`] for the body between the quotes
fn unescape_literal(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[async_trait]
impl SqlSession for MemoryCatalog {
    async fn execute(&self, statement: &str) -> Result<QueryResult, CatalogError> {
        self.run(statement)
    }

    async fn list_tables(&self, namespace: &CatalogRef) -> Result<Vec<String>, CatalogError> {
        let state = self.state.lock();
        Ok(state.tables.iter()
            .filter(|t| t.reference.catalog == namespace.catalog && t.reference.schema == namespace.schema)
            .map(|t| t.reference.table.clone())
            .collect())
    }

    async fn list_columns(&self, table: &TableRef) -> Result<Vec<String>, CatalogError> {
        let state = self.state.lock();
        let found = state.tables.iter()
            .find(|t| t.exists && &t.reference == table)
            .ok_or_else(|| Self::not_found(&format!("listColumns({})", table), table))?;
        Ok(found.columns.iter().map(|c| c.name.clone()).collect())
    }

    async fn table_exists(&self, table: &TableRef) -> Result<bool, CatalogError> {
        let state = self.state.lock();
        Ok(state.tables.iter().any(|t| t.exists && &t.reference == table))
    }
}
