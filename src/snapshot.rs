//! Catalog snapshots: a compressed archive for disconnected reuse.
//!
//! The archive is a ZIP with exactly one meaningful entry, fixed name
//! `schemacrawler.data`, holding the JSON-serialized catalog. Any conforming
//! reader can locate the entry without external metadata. Save and load fail
//! closed: a corrupt or entry-less archive never yields a partial catalog.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::crawl::{
    ColumnRow, DatabaseProduct, ForeignKeyRow, IndexRow, MetadataSource, PrimaryKeyRow,
    RoutineRow, SchemaRow, SequenceRow, SynonymRow, TableRow,
};
use crate::error::{Result, SchemaScanError};
use crate::identifiers::IdentifierCase;
use crate::model::{Catalog, RoutineKind, SchemaReference, Table};

/// Fixed name of the single catalog entry inside a snapshot archive
pub const SNAPSHOT_ENTRY: &str = "schemacrawler.data";

fn write_error(
    path: &Path,
    err: impl std::error::Error + Send + Sync + 'static,
) -> SchemaScanError {
    SchemaScanError::SnapshotWrite {
        path: path.to_path_buf(),
        source: Box::new(err),
    }
}

fn read_error(
    path: &Path,
    err: impl std::error::Error + Send + Sync + 'static,
) -> SchemaScanError {
    SchemaScanError::SnapshotRead {
        path: path.to_path_buf(),
        source: Box::new(err),
    }
}

/// Serializes the complete catalog graph into a snapshot archive.
pub fn save_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| write_error(path, err))?;
        }
    }
    let file = File::create(path).map_err(|err| write_error(path, err))?;

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(SNAPSHOT_ENTRY, options)?;

    let payload = serde_json::to_vec(catalog).map_err(|err| write_error(path, err))?;
    zip.write_all(&payload).map_err(|err| write_error(path, err))?;
    zip.finish()?;
    Ok(())
}

/// Reconstructs a catalog from a snapshot archive.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let file = File::open(path).map_err(|err| read_error(path, err))?;
    let mut archive = ZipArchive::new(file).map_err(|err| read_error(path, err))?;
    let mut entry = match archive.by_name(SNAPSHOT_ENTRY) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(SchemaScanError::SnapshotEntryMissing {
                path: path.to_path_buf(),
            })
        }
        Err(err) => return Err(read_error(path, err)),
    };
    let mut payload = Vec::new();
    entry
        .read_to_end(&mut payload)
        .map_err(|err| read_error(path, err))?;
    serde_json::from_slice(&payload).map_err(|err| read_error(path, err))
}

/// A metadata source backed by a loaded catalog: the offline "virtual
/// connection". The crawler, reducer, and command chain run unmodified
/// against it.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    catalog: Catalog,
}

impl SnapshotSource {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            catalog: load_catalog(path)?,
        })
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn schema_tables(&self, schema: &SchemaReference) -> Vec<&Table> {
        self.catalog
            .schema(schema)
            .map(|schema| schema.tables.iter().collect())
            .unwrap_or_default()
    }
}

impl MetadataSource for SnapshotSource {
    fn database_product(&self) -> Result<DatabaseProduct> {
        Ok(DatabaseProduct {
            name: self.catalog.crawl_info.database_product.clone(),
            version: self.catalog.crawl_info.database_version.clone(),
        })
    }

    fn supports_schemas(&self) -> Result<bool> {
        Ok(true)
    }

    fn supports_catalogs(&self) -> Result<bool> {
        Ok(true)
    }

    fn identifier_quote_string(&self) -> Result<String> {
        // Standard SQL quoting; the original quote string is not recorded
        // in the snapshot.
        Ok(String::from("\""))
    }

    fn stored_identifier_case(&self) -> Result<IdentifierCase> {
        Ok(IdentifierCase::Mixed)
    }

    fn schemas(&self) -> Result<Vec<SchemaRow>> {
        Ok(self
            .catalog
            .schemas
            .iter()
            .map(|schema| SchemaRow {
                catalog_name: schema.catalog_name.clone(),
                schema_name: schema.name.clone(),
            })
            .collect())
    }

    fn tables(
        &self,
        schema: &SchemaReference,
        _override_sql: Option<&str>,
    ) -> Result<Vec<TableRow>> {
        Ok(self
            .schema_tables(schema)
            .into_iter()
            .map(|table| TableRow {
                name: table.name.clone(),
                table_type: table.table_type.as_str().to_string(),
                remarks: table.remarks.clone(),
            })
            .collect())
    }

    fn columns(&self, schema: &SchemaReference, table: Option<&str>) -> Result<Vec<ColumnRow>> {
        Ok(self
            .schema_tables(schema)
            .into_iter()
            .filter(|t| table.is_none_or(|name| t.name == name))
            .flat_map(|t| {
                t.columns.iter().map(|column| ColumnRow {
                    table: t.name.clone(),
                    name: column.name.clone(),
                    ordinal_position: column.ordinal_position,
                    type_name: column.data_type.type_name.clone(),
                    nullable: column.nullable,
                })
            })
            .collect())
    }

    fn primary_key(&self, schema: &SchemaReference, table: &str) -> Result<Vec<PrimaryKeyRow>> {
        Ok(self
            .catalog
            .table(schema, table)
            .and_then(|t| t.primary_key.as_ref())
            .map(|primary_key| {
                primary_key
                    .columns
                    .iter()
                    .enumerate()
                    .map(|(position, column)| PrimaryKeyRow {
                        table: table.to_string(),
                        key_name: primary_key.name.clone(),
                        column: column.clone(),
                        key_sequence: position as u32 + 1,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn indexes(&self, schema: &SchemaReference, table: Option<&str>) -> Result<Vec<IndexRow>> {
        Ok(self
            .schema_tables(schema)
            .into_iter()
            .filter(|t| table.is_none_or(|name| t.name == name))
            .flat_map(|t| {
                t.indexes.iter().flat_map(|index| {
                    index
                        .columns
                        .iter()
                        .enumerate()
                        .map(|(position, column)| IndexRow {
                            table: t.name.clone(),
                            index_name: index.name.clone(),
                            column: column.clone(),
                            ordinal_position: position as u32 + 1,
                            unique: index.unique,
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect())
    }

    fn foreign_keys(
        &self,
        schema: &SchemaReference,
        table: Option<&str>,
    ) -> Result<Vec<ForeignKeyRow>> {
        Ok(self
            .schema_tables(schema)
            .into_iter()
            .filter(|t| table.is_none_or(|name| t.name == name))
            .flat_map(|t| {
                t.foreign_keys.iter().flat_map(|foreign_key| {
                    foreign_key
                        .column_references
                        .iter()
                        .enumerate()
                        .map(|(position, reference)| ForeignKeyRow {
                            name: foreign_key.name.clone(),
                            key_sequence: position as u32 + 1,
                            primary_key_schema: reference.primary_key_column.schema.clone(),
                            primary_key_table: reference.primary_key_column.table.clone(),
                            primary_key_column: reference.primary_key_column.column.clone(),
                            foreign_key_schema: reference.foreign_key_column.schema.clone(),
                            foreign_key_table: reference.foreign_key_column.table.clone(),
                            foreign_key_column: reference.foreign_key_column.column.clone(),
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect())
    }

    fn routines(&self, schema: &SchemaReference, kind: RoutineKind) -> Result<Vec<RoutineRow>> {
        Ok(self
            .catalog
            .schema(schema)
            .map(|schema| {
                schema
                    .routines
                    .iter()
                    .filter(|routine| routine.kind == kind)
                    .map(|routine| RoutineRow {
                        name: routine.name.clone(),
                        specific_name: routine.specific_name.clone(),
                        kind: routine.kind,
                        remarks: routine.remarks.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn sequences(
        &self,
        schema: &SchemaReference,
        _override_sql: Option<&str>,
    ) -> Result<Vec<SequenceRow>> {
        Ok(self
            .catalog
            .schema(schema)
            .map(|schema| {
                schema
                    .sequences
                    .iter()
                    .map(|sequence| SequenceRow {
                        name: sequence.name.clone(),
                        start_value: sequence.start_value,
                        increment: sequence.increment,
                        minimum_value: sequence.minimum_value,
                        maximum_value: sequence.maximum_value,
                        cycles: sequence.cycles,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn synonyms(
        &self,
        schema: &SchemaReference,
        _override_sql: Option<&str>,
    ) -> Result<Vec<SynonymRow>> {
        Ok(self
            .catalog
            .schema(schema)
            .map(|schema| {
                schema
                    .synonyms
                    .iter()
                    .map(|synonym| SynonymRow {
                        name: synonym.name.clone(),
                        referenced_object: synonym.referenced_object.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
