use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::{Config, FailurePolicy, GenerationConfig};
use crate::catalog::{CatalogRef, ColumnRef, CommentState, TableRef};
use crate::errors::{AppError, CatalogError};
use crate::generator::DescriptionGenerator;
use crate::sql::SqlSession;
use crate::translation::Translator;
use crate::writer::MetadataWriter;

// @module: Catalog walk driving generate -> translate -> write

/// Run parameters for a walk
#[derive(Debug, Clone, PartialEq)]
pub struct WalkerConfig {
    pub catalog: String,
    pub schemas: Vec<String>,
    pub source_language: String,
    pub target_language: String,
    pub failure_policy: FailurePolicy,
}

impl WalkerConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            catalog: config.catalog.clone(),
            schemas: config.schemas.clone(),
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            failure_policy: config.failure_policy,
        }
    }
}

/// A table or schema that could not be processed
#[derive(Debug, Clone, PartialEq)]
pub struct WalkFailure {
    /// Fully qualified name of the schema or table
    pub entity: String,
    pub error: String,
}

/// Counters collected over one walk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkSummary {
    /// Tables whose description was written
    pub tables_processed: usize,
    /// Tables listed but gone when checked
    pub tables_skipped: usize,
    /// Tables whose English description had to be generated
    pub tables_generated: usize,
    /// Columns whose English description had to be generated
    pub columns_generated: usize,
    /// Columns written back, generated or not
    pub columns_translated: usize,
    /// Failures recorded under `FailurePolicy::Continue`
    pub failures: Vec<WalkFailure>,
}

/// What happened to a single table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableOutcome {
    /// Description and column comments written
    Written,
    /// `table_exists` reported false
    Skipped,
}

/// Walks schemas, tables and columns of one catalog
#[derive(Debug)]
pub struct CatalogWalker {
    config: WalkerConfig,
    session: Arc<dyn SqlSession>,
    generator: DescriptionGenerator,
    translator: Arc<dyn Translator>,
    writer: MetadataWriter,
}

impl CatalogWalker {
    pub fn new(
        config: WalkerConfig,
        session: Arc<dyn SqlSession>,
        generator: DescriptionGenerator,
        translator: Arc<dyn Translator>,
        writer: MetadataWriter,
    ) -> Self {
        Self {
            config,
            session,
            generator,
            translator,
            writer,
        }
    }

    /// Wire generator and writer onto the same session
    pub fn with_session(
        config: WalkerConfig,
        session: Arc<dyn SqlSession>,
        generation: GenerationConfig,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let generator = DescriptionGenerator::new(session.clone(), generation);
        let writer = MetadataWriter::new(session.clone());
        Self::new(config, session, generator, translator, writer)
    }

    /// Install the language pair and walk every configured schema
    pub async fn run(&self) -> Result<WalkSummary, AppError> {
        let start_time = Instant::now();
        self.translator
            .install_language_pair(&self.config.source_language, &self.config.target_language)
            .await?;

        let mut summary = WalkSummary::default();
        for schema in &self.config.schemas {
            let namespace = CatalogRef::new(self.config.catalog.clone(), schema.clone());
            if let Err(e) = self.walk_schema(&namespace, &mut summary).await {
                self.handle_failure(namespace.to_string(), e, &mut summary)?;
            }
        }

        info!(
            "Finished in {:.1}s: {} tables written ({} generated), {} skipped, {} columns written ({} generated), {} failures",
            start_time.elapsed().as_secs_f64(),
            summary.tables_processed,
            summary.tables_generated,
            summary.tables_skipped,
            summary.columns_translated,
            summary.columns_generated,
            summary.failures.len()
        );
        Ok(summary)
    }

    /// Abort or record, depending on the failure policy
    fn handle_failure(&self, entity: String, e: AppError, summary: &mut WalkSummary) -> Result<(), AppError> {
        match self.config.failure_policy {
            FailurePolicy::Abort => Err(e),
            FailurePolicy::Continue => {
                error!("Failed to process {}: {}", entity, e);
                summary.failures.push(WalkFailure {
                    entity,
                    error: e.to_string(),
                });
                Ok(())
            },
        }
    }

    async fn walk_schema(&self, namespace: &CatalogRef, summary: &mut WalkSummary) -> Result<(), AppError> {
        info!(
            "Starting description translation for catalog {} schema {}...",
            namespace.catalog, namespace.schema
        );

        let tables = self.session.list_tables(namespace).await?;
        debug!("{} tables listed in {}", tables.len(), namespace);

        for name in tables {
            let table = namespace.table(name);
            if let Err(e) = self.process_table(&table, summary).await {
                self.handle_failure(table.to_string(), e, summary)?;
            }
        }
        Ok(())
    }

    /// Generate or reuse, translate and write the description of one table and its columns
    pub async fn process_table(&self, table: &TableRef, summary: &mut WalkSummary) -> Result<TableOutcome, AppError> {
        if !self.session.table_exists(table).await? {
            warn!("Description not generated for table: {}", table);
            summary.tables_skipped += 1;
            return Ok(TableOutcome::Skipped);
        }
        info!("{}", table);

        let english = match self.read_table_description(table).await? {
            CommentState::Present(existing) => existing,
            _ => {
                let generated = self.generator.generate_table_description(table).await?;
                summary.tables_generated += 1;
                generated
            },
        };

        let translated = self.translate(&english).await?;
        self.writer.set_table_description(table, &translated).await?;
        summary.tables_processed += 1;

        info!("Generating descriptions for the columns of {}...", table.table);
        let columns = self.session.list_columns(table).await?;
        let mut comments = self.read_column_comments(table).await?;

        for name in columns {
            let state = comments.remove(&name).unwrap_or(CommentState::Absent);
            let column = table.column(name);
            self.process_column(&column, state, summary).await?;
        }

        Ok(TableOutcome::Written)
    }

    async fn process_column(&self, column: &ColumnRef, state: CommentState, summary: &mut WalkSummary) -> Result<(), AppError> {
        let english = match state {
            CommentState::Present(existing) => existing,
            _ => {
                let generated = self.generator.generate_column_description(column).await?;
                summary.columns_generated += 1;
                generated
            },
        };

        let translated = self.translate(&english).await?;
        self.writer.set_column_description(column, &translated).await?;
        summary.columns_translated += 1;
        Ok(())
    }

    async fn translate(&self, text: &str) -> Result<String, AppError> {
        Ok(self.translator
            .translate(text, &self.config.source_language, &self.config.target_language)
            .await?)
    }

    /// Read the `description` column of `DESCRIBE DETAIL`
    async fn read_table_description(&self, table: &TableRef) -> Result<CommentState, CatalogError> {
        let statement = format!("DESCRIBE DETAIL {}", table.qualified_sql());
        let result = self.session.execute(&statement).await?;
        if result.is_empty() {
            return Err(CatalogError::EmptyResult { statement });
        }
        let description = result.first_named("description").flatten().map(str::to_string);
        Ok(CommentState::from_option(description))
    }

    /// Current comment per column from `DESCRIBE TABLE`
    async fn read_column_comments(&self, table: &TableRef) -> Result<HashMap<String, CommentState>, CatalogError> {
        let statement = format!("DESCRIBE TABLE {}", table.qualified_sql());
        let result = self.session.execute(&statement).await?;

        let mut comments = HashMap::new();
        for row in 0..result.rows.len() {
            let Some(name) = result.value(row, "col_name").map(str::trim) else {
                continue;
            };
            // Partition and detail sections follow the column list
            if name.is_empty() || name.starts_with('#') {
                break;
            }
            let comment = result.value(row, "comment").map(str::to_string);
            comments.entry(name.to_string()).or_insert_with(|| CommentState::from_option(comment));
        }
        Ok(comments)
    }
}
