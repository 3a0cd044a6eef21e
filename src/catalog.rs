/*!
 * Catalog references and comment state.
 *
 * References are plain values identifying a namespace, a table or a column.
 * They are built once per walk step and never mutated.
 */

use std::fmt;

/// A schema inside a catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogRef {
    pub catalog: String,
    pub schema: String,
}

impl CatalogRef {
    pub fn new(catalog: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
        }
    }

    /// Reference a table inside this namespace
    pub fn table(&self, table: impl Into<String>) -> TableRef {
        TableRef {
            catalog: self.catalog.clone(),
            schema: self.schema.clone(),
            table: table.into(),
        }
    }

    /// Backtick-quoted `catalog`.`schema` path for SQL statements
    pub fn qualified_sql(&self) -> String {
        format!("{}.{}", quote_identifier(&self.catalog), quote_identifier(&self.schema))
    }
}

impl fmt::Display for CatalogRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.catalog, self.schema)
    }
}

/// A single table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub catalog: String,
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn new(catalog: impl Into<String>, schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Reference a column of this table
    pub fn column(&self, column: impl Into<String>) -> ColumnRef {
        ColumnRef {
            table: self.clone(),
            column: column.into(),
        }
    }

    /// Backtick-quoted three-part name for SQL statements
    pub fn qualified_sql(&self) -> String {
        format!(
            "{}.{}.{}",
            quote_identifier(&self.catalog),
            quote_identifier(&self.schema),
            quote_identifier(&self.table)
        )
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.schema, self.table)
    }
}

/// A column of a table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: TableRef,
    pub column: String,
}

impl ColumnRef {
    /// Backtick-quoted column name
    pub fn quoted_column(&self) -> String {
        quote_identifier(&self.column)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Quote an identifier with backticks, doubling embedded backticks
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Current description/comment of a table or column as read from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentState {
    /// The store reported null
    Absent,
    /// The store reported an empty (or blank) string
    Empty,
    /// A usable comment
    Present(String),
}

impl CommentState {
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            None => Self::Absent,
            Some(text) if text.trim().is_empty() => Self::Empty,
            Some(text) => Self::Present(text),
        }
    }

    /// Whether a fresh description has to be generated
    pub fn needs_generation(&self) -> bool {
        !matches!(self, Self::Present(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Present(text) => Some(text),
            _ => None,
        }
    }
}
