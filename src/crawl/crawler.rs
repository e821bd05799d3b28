//! The catalog builder.
//!
//! Drives retrieval per the resolved strategies and assembles the
//! Schema/Table/Column graph. Per-entity retrieval failures are logged and
//! skipped (partial catalog); only the initial schema retrieval is fatal.
//! Foreign keys are resolved in a second pass after every table in scope is
//! built, so forward references across schemas never dangle.

use tracing::{debug, info_span, warn};

use crate::error::{Result, SchemaScanError};
use crate::filter::FilterOptions;
use crate::model::{
    Catalog, Column, ColumnDataType, ColumnReference, CrawlInfo, ForeignKey,
    ForeignKeyColumnReference, Index, NamedObject, PrimaryKey, Routine, RoutineKind, Schema,
    SchemaReference, Sequence, Synonym, Table, TableType,
};
use crate::query::expand_for_schemas;

use super::source::{ColumnRow, ForeignKeyRow, IndexRow, MetadataSource, SchemaRow};
use super::strategy::{
    CrawlOverrides, DatabaseSpecificOptions, MetadataCategory, RetrievalStrategy,
};

/// Builds a catalog from a metadata source.
pub fn crawl(
    source: &dyn MetadataSource,
    overrides: &CrawlOverrides,
    rules: &FilterOptions,
) -> Result<Catalog> {
    let options = DatabaseSpecificOptions::resolve(source, overrides);
    let span = info_span!("crawl", database = %options.database_product);
    let _span = span.enter();

    let mut catalog = Catalog::new(CrawlInfo::new(
        &options.database_product,
        &options.database_version,
    ));

    // Schema-level retrieval failure invalidates the whole crawl.
    let mut schema_rows = source
        .schemas()
        .map_err(|err| SchemaScanError::crawl("could not retrieve schemas", err))?;
    if schema_rows.is_empty() && !options.supports_schemas {
        // Schema-less databases get one anonymous schema holding everything.
        schema_rows.push(SchemaRow {
            catalog_name: None,
            schema_name: String::new(),
        });
    }

    let mut foreign_key_rows: Vec<ForeignKeyRow> = Vec::new();

    for schema_row in schema_rows {
        let reference = schema_row.reference();
        if !rules.schemas.test(&reference.full_name()) {
            debug!(schema = %reference.full_name(), "Schema excluded from crawl");
            continue;
        }
        let mut schema = Schema::new(schema_row.catalog_name.as_deref(), &schema_row.schema_name);
        crawl_tables(
            source,
            &options,
            overrides,
            rules,
            &mut schema,
            &mut foreign_key_rows,
        );
        crawl_routines(source, &options, &mut schema);
        crawl_sequences(source, &options, overrides, rules, &mut schema);
        crawl_synonyms(source, &options, overrides, rules, &mut schema);
        catalog.schemas.push(schema);
    }

    // Second pass: every first-pass table is built, so cross-schema and
    // circular references can now be resolved.
    resolve_foreign_keys(&mut catalog, foreign_key_rows);

    Ok(catalog)
}

fn crawl_tables(
    source: &dyn MetadataSource,
    options: &DatabaseSpecificOptions,
    overrides: &CrawlOverrides,
    rules: &FilterOptions,
    schema: &mut Schema,
    foreign_key_rows: &mut Vec<ForeignKeyRow>,
) {
    let reference = schema.reference();
    if options.strategy(MetadataCategory::Tables) == RetrievalStrategy::None {
        debug!(schema = %reference.full_name(), "Table retrieval is disabled");
        return;
    }

    let override_sql = overrides
        .tables_query
        .as_ref()
        .map(|query| expand_for_schemas(query, &rules.schemas));
    let table_rows = match source.tables(&reference, override_sql.as_deref()) {
        Ok(rows) => rows,
        Err(err) => {
            warn!(schema = %reference.full_name(), error = %err, "Skipping tables for schema");
            return;
        }
    };

    let mut tables: Vec<Table> = table_rows
        .into_iter()
        .map(|row| {
            let mut table = Table::new(
                reference.clone(),
                &row.name,
                TableType::from_metadata(&row.table_type),
            );
            table.remarks = row.remarks;
            table
        })
        .collect();

    crawl_columns(source, options, &reference, &mut tables);
    crawl_primary_keys(source, options, &reference, &mut tables);
    crawl_indexes(source, options, &reference, &mut tables);

    match options.strategy(MetadataCategory::ForeignKeys) {
        RetrievalStrategy::None => {}
        RetrievalStrategy::MetadataBulk => match source.foreign_keys(&reference, None) {
            Ok(rows) => foreign_key_rows.extend(rows),
            Err(err) => {
                warn!(schema = %reference.full_name(), error = %err, "Skipping foreign keys for schema");
            }
        },
        RetrievalStrategy::MetadataPerObject => {
            for table in &tables {
                match source.foreign_keys(&reference, Some(&table.name)) {
                    Ok(rows) => foreign_key_rows.extend(rows),
                    Err(err) => {
                        warn!(table = %table.full_name(), error = %err, "Skipping foreign keys for table");
                    }
                }
            }
        }
    }

    schema.tables = tables;
}

fn crawl_columns(
    source: &dyn MetadataSource,
    options: &DatabaseSpecificOptions,
    reference: &SchemaReference,
    tables: &mut Vec<Table>,
) {
    match options.strategy(MetadataCategory::Columns) {
        RetrievalStrategy::None => {}
        RetrievalStrategy::MetadataBulk => match source.columns(reference, None) {
            Ok(rows) => assign_columns(tables, rows),
            Err(err) => {
                warn!(schema = %reference.full_name(), error = %err, "Skipping columns for schema");
            }
        },
        RetrievalStrategy::MetadataPerObject => {
            let mut failed: Vec<String> = Vec::new();
            for table in tables.iter_mut() {
                match source.columns(reference, Some(&table.name)) {
                    Ok(rows) => assign_columns(std::slice::from_mut(table), rows),
                    Err(err) => {
                        warn!(table = %table.full_name(), error = %err, "Skipping table");
                        failed.push(table.name.clone());
                    }
                }
            }
            tables.retain(|table| !failed.contains(&table.name));
        }
    }
}

fn assign_columns(tables: &mut [Table], rows: Vec<ColumnRow>) {
    for row in rows {
        if let Some(table) = tables.iter_mut().find(|table| table.name == row.table) {
            table.columns.push(Column {
                name: row.name,
                ordinal_position: row.ordinal_position,
                data_type: ColumnDataType::from_type_name(&row.type_name),
                nullable: row.nullable,
            });
        }
    }
    // Deterministic initial order regardless of driver row order
    for table in tables {
        table.sort_columns(false);
    }
}

fn crawl_primary_keys(
    source: &dyn MetadataSource,
    options: &DatabaseSpecificOptions,
    reference: &SchemaReference,
    tables: &mut [Table],
) {
    // Driver primary key calls are per table for either metadata strategy.
    if options.strategy(MetadataCategory::PrimaryKeys) == RetrievalStrategy::None {
        return;
    }
    for table in tables.iter_mut() {
        match source.primary_key(reference, &table.name) {
            Ok(mut rows) if !rows.is_empty() => {
                rows.sort_by_key(|row| row.key_sequence);
                table.primary_key = Some(PrimaryKey {
                    name: rows[0].key_name.clone(),
                    columns: rows.into_iter().map(|row| row.column).collect(),
                });
            }
            Ok(_) => {}
            Err(err) => {
                warn!(table = %table.full_name(), error = %err, "Skipping primary key");
            }
        }
    }
}

fn crawl_indexes(
    source: &dyn MetadataSource,
    options: &DatabaseSpecificOptions,
    reference: &SchemaReference,
    tables: &mut [Table],
) {
    match options.strategy(MetadataCategory::Indexes) {
        RetrievalStrategy::None => {}
        RetrievalStrategy::MetadataBulk => match source.indexes(reference, None) {
            Ok(rows) => assign_indexes(tables, rows),
            Err(err) => {
                warn!(schema = %reference.full_name(), error = %err, "Skipping indexes for schema");
            }
        },
        RetrievalStrategy::MetadataPerObject => {
            for table in tables.iter_mut() {
                match source.indexes(reference, Some(&table.name)) {
                    Ok(rows) => assign_indexes(std::slice::from_mut(table), rows),
                    Err(err) => {
                        warn!(table = %table.full_name(), error = %err, "Skipping indexes for table");
                    }
                }
            }
        }
    }
}

fn assign_indexes(tables: &mut [Table], rows: Vec<IndexRow>) {
    // Group column rows by (table, index), preserving first-seen order
    let mut groups: Vec<((String, String), Vec<IndexRow>)> = Vec::new();
    for row in rows {
        let key = (row.table.clone(), row.index_name.clone());
        match groups.iter_mut().find(|(group_key, _)| *group_key == key) {
            Some((_, group)) => group.push(row),
            None => groups.push((key, vec![row])),
        }
    }
    for ((table_name, index_name), mut group) in groups {
        group.sort_by_key(|row| row.ordinal_position);
        let unique = group.first().is_some_and(|row| row.unique);
        if let Some(table) = tables.iter_mut().find(|table| table.name == table_name) {
            table.indexes.push(Index {
                name: index_name,
                unique,
                columns: group.into_iter().map(|row| row.column).collect(),
            });
        }
    }
}

fn crawl_routines(
    source: &dyn MetadataSource,
    options: &DatabaseSpecificOptions,
    schema: &mut Schema,
) {
    let reference = schema.reference();
    let categories = [
        (RoutineKind::Procedure, MetadataCategory::Procedures),
        (RoutineKind::Function, MetadataCategory::Functions),
    ];
    for (kind, category) in categories {
        if options.strategy(category) == RetrievalStrategy::None {
            continue;
        }
        match source.routines(&reference, kind) {
            Ok(rows) => {
                schema.routines.extend(rows.into_iter().map(|row| Routine {
                    schema: reference.clone(),
                    name: row.name,
                    specific_name: row.specific_name,
                    kind: row.kind,
                    remarks: row.remarks,
                }));
            }
            Err(err) => {
                warn!(schema = %reference.full_name(), kind = ?kind, error = %err, "Skipping routines");
            }
        }
    }
}

fn crawl_sequences(
    source: &dyn MetadataSource,
    options: &DatabaseSpecificOptions,
    overrides: &CrawlOverrides,
    rules: &FilterOptions,
    schema: &mut Schema,
) {
    let reference = schema.reference();
    if options.strategy(MetadataCategory::Sequences) == RetrievalStrategy::None {
        return;
    }
    let override_sql = overrides
        .sequences_query
        .as_ref()
        .map(|query| expand_for_schemas(query, &rules.schemas));
    match source.sequences(&reference, override_sql.as_deref()) {
        Ok(rows) => {
            schema.sequences.extend(rows.into_iter().map(|row| Sequence {
                schema: reference.clone(),
                name: row.name,
                start_value: row.start_value,
                increment: row.increment,
                minimum_value: row.minimum_value,
                maximum_value: row.maximum_value,
                cycles: row.cycles,
            }));
        }
        Err(err) => {
            warn!(schema = %reference.full_name(), error = %err, "Skipping sequences");
        }
    }
}

fn crawl_synonyms(
    source: &dyn MetadataSource,
    options: &DatabaseSpecificOptions,
    overrides: &CrawlOverrides,
    rules: &FilterOptions,
    schema: &mut Schema,
) {
    let reference = schema.reference();
    if options.strategy(MetadataCategory::Synonyms) == RetrievalStrategy::None {
        return;
    }
    let override_sql = overrides
        .synonyms_query
        .as_ref()
        .map(|query| expand_for_schemas(query, &rules.schemas));
    match source.synonyms(&reference, override_sql.as_deref()) {
        Ok(rows) => {
            schema.synonyms.extend(rows.into_iter().map(|row| Synonym {
                schema: reference.clone(),
                name: row.name,
                referenced_object: row.referenced_object,
            }));
        }
        Err(err) => {
            warn!(schema = %reference.full_name(), error = %err, "Skipping synonyms");
        }
    }
}

/// Attaches collected foreign key rows to their referencing tables. Rows
/// whose endpoints are not both in the catalog are dropped with a warning.
fn resolve_foreign_keys(catalog: &mut Catalog, rows: Vec<ForeignKeyRow>) {
    // Group column rows per key, preserving first-seen key order
    let mut groups: Vec<((SchemaReference, String, String), Vec<ForeignKeyRow>)> = Vec::new();
    for row in rows {
        let key = (
            row.foreign_key_schema.clone(),
            row.foreign_key_table.clone(),
            row.name.clone(),
        );
        match groups.iter_mut().find(|(group_key, _)| *group_key == key) {
            Some((_, group)) => group.push(row),
            None => groups.push((key, vec![row])),
        }
    }

    for ((fk_schema, fk_table, name), mut group) in groups {
        group.sort_by_key(|row| row.key_sequence);
        let endpoints_exist = catalog.contains_table(&fk_schema, &fk_table)
            && group.iter().all(|row| {
                catalog.contains_table(&row.primary_key_schema, &row.primary_key_table)
            });
        if !endpoints_exist {
            warn!(
                foreign_key = %name,
                table = %format!("{}.{}", fk_schema.full_name(), fk_table),
                "Dropping foreign key with unresolved endpoint"
            );
            continue;
        }
        let foreign_key = ForeignKey {
            name,
            column_references: group
                .into_iter()
                .map(|row| ForeignKeyColumnReference {
                    primary_key_column: ColumnReference {
                        schema: row.primary_key_schema,
                        table: row.primary_key_table,
                        column: row.primary_key_column,
                    },
                    foreign_key_column: ColumnReference {
                        schema: row.foreign_key_schema,
                        table: row.foreign_key_table,
                        column: row.foreign_key_column,
                    },
                })
                .collect(),
        };
        if let Some(table) = catalog.table_mut(&fk_schema, &fk_table) {
            table.foreign_keys.push(foreign_key);
        }
    }
}
