//! Identifier quoting for generated SQL.
//!
//! Quoting is applied only where a name needs it, so generated SQL stays
//! readable. Quoting is idempotent: a name already wrapped in the quote
//! string is returned as-is, never double-wrapped.

use crate::model::SchemaReference;

/// How the database stores unquoted identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierCase {
    Upper,
    Lower,
    #[default]
    Mixed,
}

/// Quotes identifiers per the database's quote string and stored casing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifiers {
    quote_string: String,
    stored_case: IdentifierCase,
}

impl Default for Identifiers {
    fn default() -> Self {
        Self::new("\"", IdentifierCase::Mixed)
    }
}

impl Identifiers {
    pub fn new(quote_string: &str, stored_case: IdentifierCase) -> Self {
        Self {
            quote_string: quote_string.to_string(),
            stored_case,
        }
    }

    /// No quote string configured; names always pass through unchanged.
    pub fn unquoted() -> Self {
        Self::new("", IdentifierCase::Mixed)
    }

    pub fn quote_string(&self) -> &str {
        &self.quote_string
    }

    /// Quotes a name if it needs quoting, and returns it unchanged otherwise.
    pub fn quote_name(&self, name: &str) -> String {
        if self.quote_string.is_empty() || name.is_empty() {
            return name.to_string();
        }
        if self.is_quoted(name) {
            return name.to_string();
        }
        if self.needs_quoting(name) {
            format!("{}{}{}", self.quote_string, name, self.quote_string)
        } else {
            name.to_string()
        }
    }

    /// Quoted schema and object name joined with `.`; the schema segment is
    /// omitted when absent.
    pub fn quote_full_name(&self, schema: Option<&SchemaReference>, name: &str) -> String {
        let quoted_name = self.quote_name(name);
        match schema {
            Some(schema) if !schema.name.is_empty() => {
                let mut full_name = String::new();
                if let Some(catalog) = &schema.catalog_name {
                    if !catalog.is_empty() {
                        full_name.push_str(&self.quote_name(catalog));
                        full_name.push('.');
                    }
                }
                full_name.push_str(&self.quote_name(&schema.name));
                full_name.push('.');
                full_name.push_str(&quoted_name);
                full_name
            }
            _ => quoted_name,
        }
    }

    /// Quoted fully qualified name of a schema itself.
    pub fn quote_schema_name(&self, schema: &SchemaReference) -> String {
        match &schema.catalog_name {
            Some(catalog) if !catalog.is_empty() => {
                format!("{}.{}", self.quote_name(catalog), self.quote_name(&schema.name))
            }
            _ => self.quote_name(&schema.name),
        }
    }

    fn is_quoted(&self, name: &str) -> bool {
        let quote = &self.quote_string;
        name.len() >= 2 * quote.len() && name.starts_with(quote) && name.ends_with(quote)
    }

    fn needs_quoting(&self, name: &str) -> bool {
        let mut chars = name.chars();
        let starts_with_digit = chars.next().is_some_and(|c| c.is_ascii_digit());
        let has_special = name
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '_'));
        starts_with_digit || has_special || self.case_differs(name)
    }

    fn case_differs(&self, name: &str) -> bool {
        match self.stored_case {
            IdentifierCase::Upper => name.chars().any(|c| c.is_ascii_lowercase()),
            IdentifierCase::Lower => name.chars().any(|c| c.is_ascii_uppercase()),
            IdentifierCase::Mixed => false,
        }
    }
}
