//! Named queries and the `${token}` template engine.
//!
//! Templates are expanded in a single left-to-right pass; replacement text
//! is never rescanned, so expanding an already-expanded template is a no-op.
//! Tokens with no matching property are left byte-for-byte, which allows a
//! later defaults-only pass to fill the standard tokens. The engine only
//! produces SQL text; executing it belongs to the metadata source adapter.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::filter::InclusionRule;
use crate::identifiers::Identifiers;
use crate::model::Table;

/// Standard template tokens filled for schema- and table-scoped queries:
/// `schemas`, `schema`, `table`, `tablename`, `columns`, `orderbycolumns`,
/// `tabletype`. Tokens are case-sensitive.
static TEMPLATE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z0-9_.\-]+)\}").expect("invalid token pattern"));

/// Registered defaults for standard tokens a caller left unfilled
static DEFAULT_PROPERTIES: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let mut defaults = HashMap::new();
    defaults.insert("schemas".to_string(), ".*".to_string());
    defaults
});

/// A named SQL query template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub name: String,
    pub sql: String,
}

impl Query {
    pub fn new(name: &str, sql: &str) -> Self {
        Self {
            name: name.to_string(),
            sql: sql.to_string(),
        }
    }
}

/// Expands `${key}` tokens from the given properties.
///
/// Unknown tokens pass through unexpanded; a malformed template is a
/// data-quality issue surfaced in the output, never an error.
pub fn expand_template(template: &str, properties: &HashMap<String, String>) -> String {
    TEMPLATE_TOKEN
        .replace_all(template, |captures: &Captures| {
            let key = &captures[1];
            match properties.get(key) {
                Some(value) => value.clone(),
                None => captures[0].to_string(),
            }
        })
        .into_owned()
}

/// Fills standard tokens still unexpanded after the caller's own pass.
/// Unregistered tokens stay verbatim.
pub fn expand_template_defaults(template: &str) -> String {
    expand_template(template, &DEFAULT_PROPERTIES)
}

/// Expands a schema-scoped query.
///
/// The `schemas` token becomes the raw pattern of a regex inclusion rule
/// when one is active; the defaults pass fills it with `.*` otherwise. The
/// pattern is substituted verbatim; templates are trusted input.
pub fn expand_for_schemas(query: &Query, schema_rule: &InclusionRule) -> String {
    let mut properties = HashMap::new();
    if let Some(pattern) = schema_rule.inclusion_pattern() {
        if !pattern.trim().is_empty() {
            properties.insert("schemas".to_string(), pattern.to_string());
        }
    }
    expand_template_defaults(&expand_template(&query.sql, &properties))
}

/// Expands a table-scoped query.
///
/// `columns` excludes large-object and other opaque-typed columns;
/// `orderbycolumns` includes every column. Column order is whatever the
/// table currently holds; call [`Table::sort_columns`] first to materialize
/// a deterministic order. A trailing defaults pass fills any registered
/// token the table properties left untouched.
pub fn expand_for_table(query: &Query, table: &Table, identifiers: &Identifiers) -> String {
    let mut properties = HashMap::new();
    properties.insert(
        "schema".to_string(),
        identifiers.quote_schema_name(&table.schema),
    );
    properties.insert(
        "table".to_string(),
        identifiers.quote_full_name(Some(&table.schema), &table.name),
    );
    properties.insert("tablename".to_string(), table.name.clone());
    properties.insert("tabletype".to_string(), table.table_type.as_str().to_string());
    properties.insert("columns".to_string(), column_list(table, true, identifiers));
    properties.insert(
        "orderbycolumns".to_string(),
        column_list(table, false, identifiers),
    );
    expand_template_defaults(&expand_template(&query.sql, &properties))
}

/// Comma-joined quoted column names, optionally omitting opaque columns.
fn column_list(table: &Table, omit_opaque_columns: bool, identifiers: &Identifiers) -> String {
    table
        .columns
        .iter()
        .filter(|column| !(omit_opaque_columns && column.data_type.type_group.is_opaque()))
        .map(|column| identifiers.quote_name(&column.name))
        .collect::<Vec<_>>()
        .join(", ")
}
