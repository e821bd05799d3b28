//! Unit tests for identifier quoting

use rust_schemascan::identifiers::{IdentifierCase, Identifiers};
use rust_schemascan::model::SchemaReference;

#[test]
fn test_simple_name_stays_bare() {
    let identifiers = Identifiers::new("\"", IdentifierCase::Mixed);
    assert_eq!(identifiers.quote_name("ORDERS"), "ORDERS");
}

#[test]
fn test_name_with_space_is_wrapped() {
    let identifiers = Identifiers::new("\"", IdentifierCase::Mixed);
    assert_eq!(identifiers.quote_name("Order Items"), "\"Order Items\"");
}

#[test]
fn test_quoting_twice_does_not_double_wrap() {
    let identifiers = Identifiers::new("\"", IdentifierCase::Mixed);
    let quoted = identifiers.quote_name("Order Items");
    assert_eq!(identifiers.quote_name(&quoted), "\"Order Items\"");
}

#[test]
fn test_quoting_is_deterministic() {
    let identifiers = Identifiers::new("\"", IdentifierCase::Upper);
    assert_eq!(
        identifiers.quote_name("Mixed Case"),
        identifiers.quote_name("Mixed Case")
    );
}

#[test]
fn test_full_name_joins_schema_and_object() {
    let identifiers = Identifiers::new("\"", IdentifierCase::Mixed);
    let schema = SchemaReference::new(None, "PUBLIC");
    assert_eq!(
        identifiers.quote_full_name(Some(&schema), "ORDERS"),
        "PUBLIC.ORDERS"
    );
    assert_eq!(
        identifiers.quote_full_name(Some(&schema), "Order Items"),
        "PUBLIC.\"Order Items\""
    );
}

#[test]
fn test_full_name_omits_missing_schema() {
    let identifiers = Identifiers::new("\"", IdentifierCase::Mixed);
    assert_eq!(identifiers.quote_full_name(None, "ORDERS"), "ORDERS");
}

#[test]
fn test_full_name_includes_catalog_segment() {
    let identifiers = Identifiers::new("\"", IdentifierCase::Mixed);
    let schema = SchemaReference::new(Some("SALESDB"), "PUBLIC");
    assert_eq!(
        identifiers.quote_full_name(Some(&schema), "ORDERS"),
        "SALESDB.PUBLIC.ORDERS"
    );
}

#[test]
fn test_no_quote_string_means_no_quoting() {
    let identifiers = Identifiers::unquoted();
    assert_eq!(identifiers.quote_name("Order Items"), "Order Items");
    assert_eq!(identifiers.quote_name("2ND"), "2ND");
}
