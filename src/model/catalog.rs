//! Catalog root aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Routine, Schema, SchemaReference, Sequence, Synonym, Table};

/// Provenance of one crawl: when it happened and what it crawled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlInfo {
    pub crawl_timestamp: DateTime<Utc>,
    pub database_product: String,
    pub database_version: String,
}

impl CrawlInfo {
    pub fn new(database_product: &str, database_version: &str) -> Self {
        Self {
            crawl_timestamp: Utc::now(),
            database_product: database_product.to_string(),
            database_version: database_version.to_string(),
        }
    }
}

/// The full in-memory snapshot of database structural metadata for one crawl.
///
/// Mutable while the crawler builds it and while the reducer prunes it;
/// treated as read-only once handed to a command chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub crawl_info: CrawlInfo,
    pub schemas: Vec<Schema>,
}

impl Catalog {
    pub fn new(crawl_info: CrawlInfo) -> Self {
        Self {
            crawl_info,
            schemas: Vec::new(),
        }
    }

    pub fn schema(&self, reference: &SchemaReference) -> Option<&Schema> {
        self.schemas
            .iter()
            .find(|schema| schema.reference() == *reference)
    }

    pub fn schema_mut(&mut self, reference: &SchemaReference) -> Option<&mut Schema> {
        self.schemas
            .iter_mut()
            .find(|schema| schema.reference() == *reference)
    }

    /// All tables across schemas, in schema order then insertion order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.schemas.iter().flat_map(|schema| schema.tables.iter())
    }

    pub fn routines(&self) -> impl Iterator<Item = &Routine> {
        self.schemas
            .iter()
            .flat_map(|schema| schema.routines.iter())
    }

    pub fn sequences(&self) -> impl Iterator<Item = &Sequence> {
        self.schemas
            .iter()
            .flat_map(|schema| schema.sequences.iter())
    }

    pub fn synonyms(&self) -> impl Iterator<Item = &Synonym> {
        self.schemas
            .iter()
            .flat_map(|schema| schema.synonyms.iter())
    }

    pub fn table(&self, schema: &SchemaReference, name: &str) -> Option<&Table> {
        self.schema(schema)?
            .tables
            .iter()
            .find(|table| table.name == name)
    }

    pub fn table_mut(&mut self, schema: &SchemaReference, name: &str) -> Option<&mut Table> {
        self.schema_mut(schema)?
            .tables
            .iter_mut()
            .find(|table| table.name == name)
    }

    pub fn contains_table(&self, schema: &SchemaReference, name: &str) -> bool {
        self.table(schema, name).is_some()
    }
}
