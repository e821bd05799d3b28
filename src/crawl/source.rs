//! The metadata source seam.
//!
//! A [`MetadataSource`] is anything that can answer driver-level metadata
//! calls: a live database connection adapter, or a snapshot-backed offline
//! source. The crawler, reducer, and command chain never know which backs
//! them. Retrieval methods return plain row structs mirroring what a driver
//! metadata call yields; the crawler assembles them into the catalog model.

use crate::error::Result;
use crate::identifiers::IdentifierCase;
use crate::model::{RoutineKind, SchemaReference};

/// Database product identity reported by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseProduct {
    pub name: String,
    pub version: String,
}

/// One schema as reported by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRow {
    pub catalog_name: Option<String>,
    pub schema_name: String,
}

impl SchemaRow {
    pub fn reference(&self) -> SchemaReference {
        SchemaReference::new(self.catalog_name.as_deref(), &self.schema_name)
    }
}

/// One table within the schema being retrieved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub name: String,
    pub table_type: String,
    pub remarks: Option<String>,
}

/// One column row; `table` identifies the owner within the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    pub table: String,
    pub name: String,
    pub ordinal_position: u32,
    pub type_name: String,
    pub nullable: bool,
}

/// One primary key column row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyRow {
    pub table: String,
    pub key_name: Option<String>,
    pub column: String,
    pub key_sequence: u32,
}

/// One index column row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub table: String,
    pub index_name: String,
    pub column: String,
    pub ordinal_position: u32,
    pub unique: bool,
}

/// One foreign key column pairing; endpoints may live in other schemas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRow {
    pub name: String,
    pub key_sequence: u32,
    pub primary_key_schema: SchemaReference,
    pub primary_key_table: String,
    pub primary_key_column: String,
    pub foreign_key_schema: SchemaReference,
    pub foreign_key_table: String,
    pub foreign_key_column: String,
}

/// One routine (procedure or function) row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineRow {
    pub name: String,
    pub specific_name: Option<String>,
    pub kind: RoutineKind,
    pub remarks: Option<String>,
}

/// One sequence row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRow {
    pub name: String,
    pub start_value: i64,
    pub increment: i64,
    pub minimum_value: Option<i64>,
    pub maximum_value: Option<i64>,
    pub cycles: bool,
}

/// One synonym row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymRow {
    pub name: String,
    pub referenced_object: String,
}

/// Driver-level metadata interface.
///
/// All calls are synchronous and read-only. Where a method takes
/// `table: Option<&str>`, `None` asks for one bulk result covering the whole
/// schema and `Some` asks for a single table's rows. Where a method takes
/// `override_sql`, a dialect-specific query has already been expanded by the
/// template engine and the adapter is expected to execute it instead of its
/// native metadata call; sources without an execution path ignore it.
pub trait MetadataSource {
    fn database_product(&self) -> Result<DatabaseProduct>;
    fn supports_schemas(&self) -> Result<bool>;
    fn supports_catalogs(&self) -> Result<bool>;
    fn identifier_quote_string(&self) -> Result<String>;
    fn stored_identifier_case(&self) -> Result<IdentifierCase>;

    fn schemas(&self) -> Result<Vec<SchemaRow>>;
    fn tables(&self, schema: &SchemaReference, override_sql: Option<&str>)
        -> Result<Vec<TableRow>>;
    fn columns(&self, schema: &SchemaReference, table: Option<&str>) -> Result<Vec<ColumnRow>>;
    fn primary_key(&self, schema: &SchemaReference, table: &str) -> Result<Vec<PrimaryKeyRow>>;
    fn indexes(&self, schema: &SchemaReference, table: Option<&str>) -> Result<Vec<IndexRow>>;
    fn foreign_keys(
        &self,
        schema: &SchemaReference,
        table: Option<&str>,
    ) -> Result<Vec<ForeignKeyRow>>;
    fn routines(&self, schema: &SchemaReference, kind: RoutineKind) -> Result<Vec<RoutineRow>>;
    fn sequences(
        &self,
        schema: &SchemaReference,
        override_sql: Option<&str>,
    ) -> Result<Vec<SequenceRow>>;
    fn synonyms(
        &self,
        schema: &SchemaReference,
        override_sql: Option<&str>,
    ) -> Result<Vec<SynonymRow>>;
}
