/*!
 * Tests for metadata persistence
 */

use std::sync::Arc;

use catdesc::catalog::TableRef;
use catdesc::errors::CatalogError;
use catdesc::sql::memory::MemoryCatalog;
use catdesc::writer::{sanitize_description, MetadataWriter};

fn orders() -> TableRef {
    TableRef::new("C", "s", "orders")
}

#[test]
fn test_sanitizeDescription_shouldRemoveEverySingleQuote() {
    assert_eq!(sanitize_description("it's the 'main' table"), "its the main table");
    assert_eq!(sanitize_description("no quotes"), "no quotes");
    assert_eq!(sanitize_description("\"double\" stay"), "\"double\" stay");
}

#[test]
fn test_columnStatement_shouldQuoteColumnAndSanitize() {
    let statement = MetadataWriter::column_statement(&orders().column("order`id"), "O'Neil's id");
    assert_eq!(
        statement,
        "ALTER TABLE `C`.`s`.`orders` ALTER COLUMN `order``id` COMMENT 'ONeils id'"
    );
}

#[tokio::test]
async fn test_setTableDescription_shouldPersistSanitizedText() {
    let catalog = Arc::new(MemoryCatalog::new().with_table(orders(), None, &[("id", None)]));
    let writer = MetadataWriter::new(catalog.clone());

    writer.set_table_description(&orders(), "Tabela d'ordens").await.unwrap();
    assert_eq!(catalog.table_description(&orders()).as_deref(), Some("Tabela dordens"));
}

#[tokio::test]
async fn test_setColumnDescription_withBackslash_shouldRoundTrip() {
    let catalog = Arc::new(MemoryCatalog::new().with_table(orders(), None, &[("path", None)]));
    let writer = MetadataWriter::new(catalog.clone());

    writer.set_column_description(&orders().column("path"), r"Caminho C:\dados").await.unwrap();
    assert_eq!(catalog.column_comment(&orders(), "path").as_deref(), Some(r"Caminho C:\dados"));
}

#[tokio::test]
async fn test_setTableDescription_whenRejected_shouldFailWithMetadataWrite() {
    let catalog = Arc::new(
        MemoryCatalog::new()
            .with_table(orders(), None, &[])
            .with_failure_on("SET TBLPROPERTIES"),
    );
    let writer = MetadataWriter::new(catalog);

    let result = writer.set_table_description(&orders(), "x").await;
    match result {
        Err(CatalogError::MetadataWrite { statement, message }) => {
            assert!(statement.starts_with("ALTER TABLE `C`.`s`.`orders`"));
            assert_eq!(message, "injected failure");
        },
        other => panic!("expected MetadataWrite, got {:?}", other),
    }
}

#[tokio::test]
async fn test_setColumnDescription_onUnknownColumn_shouldFail() {
    let catalog = Arc::new(MemoryCatalog::new().with_table(orders(), None, &[("id", None)]));
    let writer = MetadataWriter::new(catalog);

    let result = writer.set_column_description(&orders().column("missing"), "x").await;
    assert!(matches!(result, Err(CatalogError::MetadataWrite { .. })));
}
