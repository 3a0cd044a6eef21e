/*!
 * Tests for catalog references and comment state
 */

use catdesc::catalog::{quote_identifier, CatalogRef, CommentState, TableRef};

#[test]
fn test_catalogRef_table_shouldCarryNamespace() {
    let namespace = CatalogRef::new("C", "s");
    let table = namespace.table("t");
    assert_eq!(table, TableRef::new("C", "s", "t"));
    assert_eq!(namespace.to_string(), "C.s");
    assert_eq!(namespace.qualified_sql(), "`C`.`s`");
}

#[test]
fn test_tableRef_column_shouldRenderQualifiedNames() {
    let column = TableRef::new("C", "s", "t").column("order id");
    assert_eq!(column.to_string(), "C.s.t.order id");
    assert_eq!(column.quoted_column(), "`order id`");
    assert_eq!(column.table.qualified_sql(), "`C`.`s`.`t`");
}

#[test]
fn test_quoteIdentifier_shouldDoubleBackticks() {
    assert_eq!(quote_identifier("plain"), "`plain`");
    assert_eq!(quote_identifier("a`b"), "`a``b`");
}

#[test]
fn test_commentState_needsGeneration_shouldOnlySkipPresent() {
    assert!(CommentState::Absent.needs_generation());
    assert!(CommentState::Empty.needs_generation());
    assert!(!CommentState::Present("kept".to_string()).needs_generation());
    assert_eq!(CommentState::Empty.text(), None);
}
