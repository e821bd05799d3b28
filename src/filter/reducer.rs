//! Consistency-preserving catalog reduction.
//!
//! Entities failing their inclusion rule are removed from their owning
//! collection; foreign keys never dangle across a reduction pass. Reduction
//! is idempotent and never reorders survivors.

use std::collections::HashSet;

use tracing::debug;

use crate::model::{Catalog, NamedObject, SchemaReference};

use super::{FilterOptions, InclusionRule};

/// Reducible entity kinds, in the order reduction passes must run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Schema,
    Table,
    Routine,
    Synonym,
    Sequence,
}

/// Later kinds' scoping depends on schemas surviving the earlier passes, so
/// `reduce_all` applies the kinds in this declared order.
pub const REDUCTION_ORDER: [EntityKind; 5] = [
    EntityKind::Schema,
    EntityKind::Table,
    EntityKind::Routine,
    EntityKind::Synonym,
    EntityKind::Sequence,
];

/// Applies one inclusion rule to one entity kind.
pub fn reduce(catalog: &mut Catalog, kind: EntityKind, rule: &InclusionRule) {
    match kind {
        EntityKind::Schema => {
            catalog.schemas.retain(|schema| {
                let keep = rule.test(&schema.full_name());
                if !keep {
                    debug!(schema = %schema.full_name(), "Removing schema");
                }
                keep
            });
            remove_dangling_foreign_keys(catalog);
        }
        EntityKind::Table => {
            for schema in &mut catalog.schemas {
                schema.tables.retain(|table| rule.test(&table.full_name()));
            }
            remove_dangling_foreign_keys(catalog);
        }
        EntityKind::Routine => {
            for schema in &mut catalog.schemas {
                schema
                    .routines
                    .retain(|routine| rule.test(&routine.full_name()));
            }
        }
        EntityKind::Synonym => {
            for schema in &mut catalog.schemas {
                schema
                    .synonyms
                    .retain(|synonym| rule.test(&synonym.full_name()));
            }
        }
        EntityKind::Sequence => {
            for schema in &mut catalog.schemas {
                schema
                    .sequences
                    .retain(|sequence| rule.test(&sequence.full_name()));
            }
        }
    }
}

/// Runs every reduction pass in declared order.
pub fn reduce_all(catalog: &mut Catalog, options: &FilterOptions) {
    for kind in REDUCTION_ORDER {
        reduce(catalog, kind, options.rule_for(kind));
    }
}

/// Drops every foreign key with an endpoint table no longer in the catalog.
fn remove_dangling_foreign_keys(catalog: &mut Catalog) {
    let surviving: HashSet<(SchemaReference, String)> = catalog
        .schemas
        .iter()
        .flat_map(|schema| {
            schema
                .tables
                .iter()
                .map(move |table| (schema.reference(), table.name.clone()))
        })
        .collect();

    for schema in &mut catalog.schemas {
        for table in &mut schema.tables {
            table.foreign_keys.retain(|foreign_key| {
                foreign_key.column_references.iter().all(|reference| {
                    surviving.contains(&(
                        reference.primary_key_column.schema.clone(),
                        reference.primary_key_column.table.clone(),
                    )) && surviving.contains(&(
                        reference.foreign_key_column.schema.clone(),
                        reference.foreign_key_column.table.clone(),
                    ))
                })
            });
        }
    }
}
