/*!
 * Tests for the memory catalog and the dry-run session
 */

use catdesc::catalog::{CatalogRef, TableRef};
use catdesc::errors::CatalogError;
use catdesc::sql::dry_run::DryRunSession;
use catdesc::sql::memory::MemoryCatalog;
use catdesc::sql::SqlSession;
use catdesc::writer::MetadataWriter;

fn orders() -> TableRef {
    TableRef::new("C", "s", "orders")
}

fn sample_catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_table(orders(), Some("Customer orders"), &[("id", None), ("amount", Some("Total value"))])
        .with_table(TableRef::new("C", "other", "x"), None, &[])
        .with_dropped_table(TableRef::new("C", "s", "gone"))
}

#[tokio::test]
async fn test_listTables_shouldOnlyReturnSchemaTables() {
    let catalog = sample_catalog();
    let tables = catalog.list_tables(&CatalogRef::new("C", "s")).await.unwrap();
    assert_eq!(tables, vec!["orders", "gone"]);
}

#[tokio::test]
async fn test_tableExists_withDroppedTable_shouldBeFalse() {
    let catalog = sample_catalog();
    assert!(catalog.table_exists(&orders()).await.unwrap());
    assert!(!catalog.table_exists(&TableRef::new("C", "s", "gone")).await.unwrap());
    assert!(!catalog.table_exists(&TableRef::new("C", "s", "never")).await.unwrap());
}

#[tokio::test]
async fn test_describeDetail_shouldReturnDescriptionColumn() {
    let catalog = sample_catalog();
    let result = catalog.execute("DESCRIBE DETAIL `C`.`s`.`orders`").await.unwrap();
    assert_eq!(result.first_named("description"), Some(Some("Customer orders")));

    let result = catalog.execute("DESCRIBE DETAIL `C`.`other`.`x`").await.unwrap();
    assert_eq!(result.first_named("description"), Some(None));
}

#[tokio::test]
async fn test_describeTable_shouldListColumnsWithComments() {
    let catalog = sample_catalog();
    let result = catalog.execute("DESCRIBE TABLE `C`.`s`.`orders`").await.unwrap();
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.value(0, "col_name"), Some("id"));
    assert_eq!(result.value(0, "comment"), None);
    assert_eq!(result.value(1, "comment"), Some("Total value"));
}

#[tokio::test]
async fn test_alterStatements_shouldUpdateStore() {
    let catalog = sample_catalog();
    catalog.execute(&MetadataWriter::table_statement(&orders(), "Pedidos")).await.unwrap();
    catalog.execute(&MetadataWriter::column_statement(&orders().column("id"), "Identificador")).await.unwrap();

    assert_eq!(catalog.table_description(&orders()).as_deref(), Some("Pedidos"));
    assert_eq!(catalog.column_comment(&orders(), "id").as_deref(), Some("Identificador"));
    assert_eq!(catalog.statements().len(), 2);
}

#[tokio::test]
async fn test_generation_withoutQueuedResponse_shouldNumberDescriptions() {
    let catalog = MemoryCatalog::new().with_generation_response(Some("First"));
    let first = catalog.execute("SELECT ai_gen('describe \\'orders\\'') AS description").await.unwrap();
    let second = catalog.execute("SELECT ai_gen('another') AS description").await.unwrap();

    assert_eq!(first.first_value(), Some(Some("First")));
    assert_eq!(second.first_value(), Some(Some("Generated description 2")));
    assert_eq!(catalog.generation_prompts(), vec!["describe 'orders'", "another"]);
}

#[tokio::test]
async fn test_execute_withInjectedFailure_shouldFail() {
    let catalog = sample_catalog().with_failure_on("DESCRIBE TABLE");
    let result = catalog.execute("DESCRIBE TABLE `C`.`s`.`orders`").await;
    assert!(matches!(result, Err(CatalogError::QueryExecution { .. })));
}

#[tokio::test]
async fn test_execute_onDroppedTable_shouldReportNotFound() {
    let catalog = sample_catalog();
    let result = catalog.execute("DESCRIBE DETAIL `C`.`s`.`gone`").await;
    match result {
        Err(CatalogError::QueryExecution { message, .. }) => assert!(message.contains("TABLE_OR_VIEW_NOT_FOUND")),
        other => panic!("expected a not-found error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dryRun_shouldSkipAlterAndForwardReads() {
    let session = DryRunSession::new(sample_catalog());

    let statement = MetadataWriter::table_statement(&orders(), "Pedidos");
    let result = session.execute(&statement).await.unwrap();
    assert!(result.is_empty());
    assert_eq!(session.skipped_statements(), vec![statement]);

    let result = session.execute("DESCRIBE DETAIL `C`.`s`.`orders`").await.unwrap();
    assert_eq!(result.first_named("description"), Some(Some("Customer orders")));
    assert_eq!(session.list_columns(&orders()).await.unwrap(), vec!["id", "amount"]);
}
