//! Retrieval strategy selection and database-specific option resolution.
//!
//! Resolution order per metadata category: explicit user override, then the
//! built-in default for the detected database product, then a generic
//! bulk-query default. Driver capability probes run once per crawl and are
//! cached in [`DatabaseSpecificOptions`]; probe failures fall back to
//! permissive defaults instead of aborting.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::warn;

use crate::identifiers::{IdentifierCase, Identifiers};
use crate::query::Query;

use super::source::MetadataSource;

/// How one metadata category gets retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalStrategy {
    /// One bulk metadata query per schema
    MetadataBulk,
    /// One metadata call per object
    MetadataPerObject,
    /// Category is skipped entirely and left empty in the catalog
    None,
}

/// Metadata categories the selector resolves independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataCategory {
    Tables,
    Columns,
    PrimaryKeys,
    Indexes,
    ForeignKeys,
    Procedures,
    Functions,
    Sequences,
    Synonyms,
}

/// Built-in per-product strategy defaults, keyed by lowercased product name.
/// Stands in for the per-database plugin registry, which is out of scope.
static PRODUCT_DEFAULTS: Lazy<HashMap<&'static str, Vec<(MetadataCategory, RetrievalStrategy)>>> =
    Lazy::new(|| {
        let mut defaults = HashMap::new();
        defaults.insert(
            "oracle",
            vec![
                (MetadataCategory::Indexes, RetrievalStrategy::MetadataPerObject),
                (
                    MetadataCategory::ForeignKeys,
                    RetrievalStrategy::MetadataPerObject,
                ),
            ],
        );
        defaults.insert(
            "mysql",
            vec![
                (MetadataCategory::Sequences, RetrievalStrategy::None),
                (MetadataCategory::Synonyms, RetrievalStrategy::None),
            ],
        );
        defaults.insert(
            "postgresql",
            vec![(MetadataCategory::Synonyms, RetrievalStrategy::None)],
        );
        defaults.insert(
            "sqlite",
            vec![
                (MetadataCategory::Procedures, RetrievalStrategy::None),
                (MetadataCategory::Functions, RetrievalStrategy::None),
                (MetadataCategory::Sequences, RetrievalStrategy::None),
                (MetadataCategory::Synonyms, RetrievalStrategy::None),
            ],
        );
        defaults
    });

/// User-supplied overrides for one crawl. Immutable once constructed; the
/// chainable `with_*` methods consume and return the record.
#[derive(Debug, Clone, Default)]
pub struct CrawlOverrides {
    pub supports_schemas: Option<bool>,
    pub supports_catalogs: Option<bool>,
    pub identifier_quote_string: Option<String>,
    strategies: HashMap<MetadataCategory, RetrievalStrategy>,
    /// Dialect-specific override queries, expanded by the template engine
    /// before the source executes them
    pub tables_query: Option<Query>,
    pub sequences_query: Option<Query>,
    pub synonyms_query: Option<Query>,
}

impl CrawlOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, category: MetadataCategory, strategy: RetrievalStrategy) -> Self {
        self.strategies.insert(category, strategy);
        self
    }

    pub fn with_identifier_quote_string(mut self, quote_string: &str) -> Self {
        self.identifier_quote_string = Some(quote_string.to_string());
        self
    }

    pub fn with_tables_query(mut self, query: Query) -> Self {
        self.tables_query = Some(query);
        self
    }

    pub fn with_sequences_query(mut self, query: Query) -> Self {
        self.sequences_query = Some(query);
        self
    }

    pub fn with_synonyms_query(mut self, query: Query) -> Self {
        self.synonyms_query = Some(query);
        self
    }

    pub fn strategy_override(&self, category: MetadataCategory) -> Option<RetrievalStrategy> {
        self.strategies.get(&category).copied()
    }
}

/// Resolved, cached per-crawl options: capability probes plus one retrieval
/// strategy per category
#[derive(Debug, Clone)]
pub struct DatabaseSpecificOptions {
    pub database_product: String,
    pub database_version: String,
    pub supports_schemas: bool,
    pub supports_catalogs: bool,
    pub identifiers: Identifiers,
    strategies: HashMap<MetadataCategory, RetrievalStrategy>,
}

impl DatabaseSpecificOptions {
    /// Probes the source once and resolves every category's strategy.
    pub fn resolve(source: &dyn MetadataSource, overrides: &CrawlOverrides) -> Self {
        let (database_product, database_version) = match source.database_product() {
            Ok(product) => (product.name, product.version),
            Err(err) => {
                warn!(error = %err, "Could not probe database product");
                (String::from("unknown"), String::new())
            }
        };

        let supports_schemas = overrides.supports_schemas.unwrap_or_else(|| {
            source.supports_schemas().unwrap_or_else(|err| {
                warn!(error = %err, "Schema support probe failed; assuming supported");
                true
            })
        });
        let supports_catalogs = overrides.supports_catalogs.unwrap_or_else(|| {
            source.supports_catalogs().unwrap_or_else(|err| {
                warn!(error = %err, "Catalog support probe failed; assuming supported");
                true
            })
        });

        let quote_string = match &overrides.identifier_quote_string {
            Some(quote_string) => quote_string.clone(),
            None => source.identifier_quote_string().unwrap_or_else(|err| {
                warn!(error = %err, "Quote string probe failed; not quoting");
                String::new()
            }),
        };
        let stored_case = source
            .stored_identifier_case()
            .unwrap_or(IdentifierCase::Mixed);
        let identifiers = Identifiers::new(&quote_string, stored_case);

        let product_key = database_product.to_ascii_lowercase();
        let strategies = ALL_CATEGORIES
            .iter()
            .map(|&category| {
                (
                    category,
                    resolve_strategy(category, overrides, &product_key),
                )
            })
            .collect();

        Self {
            database_product,
            database_version,
            supports_schemas,
            supports_catalogs,
            identifiers,
            strategies,
        }
    }

    pub fn strategy(&self, category: MetadataCategory) -> RetrievalStrategy {
        self.strategies
            .get(&category)
            .copied()
            .unwrap_or(RetrievalStrategy::MetadataBulk)
    }
}

const ALL_CATEGORIES: [MetadataCategory; 9] = [
    MetadataCategory::Tables,
    MetadataCategory::Columns,
    MetadataCategory::PrimaryKeys,
    MetadataCategory::Indexes,
    MetadataCategory::ForeignKeys,
    MetadataCategory::Procedures,
    MetadataCategory::Functions,
    MetadataCategory::Sequences,
    MetadataCategory::Synonyms,
];

fn resolve_strategy(
    category: MetadataCategory,
    overrides: &CrawlOverrides,
    product_key: &str,
) -> RetrievalStrategy {
    if let Some(strategy) = overrides.strategy_override(category) {
        return strategy;
    }
    if let Some(product_defaults) = PRODUCT_DEFAULTS.get(product_key) {
        if let Some(&(_, strategy)) = product_defaults
            .iter()
            .find(|(default_category, _)| *default_category == category)
        {
            return strategy;
        }
    }
    RetrievalStrategy::MetadataBulk
}
