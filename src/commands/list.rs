//! Plain-text and JSON catalog listing

use std::fmt::Write as _;

use crate::crawl::{DatabaseSpecificOptions, MetadataSource};
use crate::error::{Result, SchemaScanError};
use crate::identifiers::Identifiers;
use crate::model::{Catalog, NamedObject, RoutineKind};
use crate::output::{OutputFormat, OutputOptions};

use super::CatalogCommand;

/// Writes a structural listing of the catalog through the configured output
pub struct ListCommand {
    output: OutputOptions,
    database_options: Option<DatabaseSpecificOptions>,
}

impl ListCommand {
    pub fn new(output: OutputOptions) -> Self {
        Self {
            output,
            database_options: None,
        }
    }

    fn render_text(&self, catalog: &Catalog) -> String {
        // Names that need quoting are shown quoted, per the shared options
        let identifiers = self
            .database_options
            .as_ref()
            .map(|options| options.identifiers.clone())
            .unwrap_or_else(Identifiers::unquoted);
        let mut text = String::new();
        let _ = writeln!(
            text,
            "Database: {} {}",
            catalog.crawl_info.database_product, catalog.crawl_info.database_version
        );
        for schema in &catalog.schemas {
            let _ = writeln!(text, "Schema: {}", schema.full_name());
            for table in &schema.tables {
                let _ = writeln!(
                    text,
                    "  {}: {}",
                    table.table_type.as_str(),
                    identifiers.quote_name(&table.name)
                );
                for column in &table.columns {
                    let _ = writeln!(
                        text,
                        "    {} {}{}",
                        identifiers.quote_name(&column.name),
                        column.data_type.type_name,
                        if column.nullable { "" } else { " not null" }
                    );
                }
                if let Some(primary_key) = &table.primary_key {
                    let _ = writeln!(
                        text,
                        "    primary key ({})",
                        primary_key.columns.join(", ")
                    );
                }
                for index in &table.indexes {
                    let _ = writeln!(
                        text,
                        "    {}index {} ({})",
                        if index.unique { "unique " } else { "" },
                        index.name,
                        index.columns.join(", ")
                    );
                }
                for foreign_key in &table.foreign_keys {
                    for reference in &foreign_key.column_references {
                        let _ = writeln!(
                            text,
                            "    foreign key {} ({} -> {}.{})",
                            foreign_key.name,
                            reference.foreign_key_column.column,
                            reference.primary_key_column.table_full_name(),
                            reference.primary_key_column.column
                        );
                    }
                }
            }
            for routine in &schema.routines {
                let kind = match routine.kind {
                    RoutineKind::Procedure => "procedure",
                    RoutineKind::Function => "function",
                };
                let _ = writeln!(text, "  {}: {}", kind, routine.name);
            }
            for sequence in &schema.sequences {
                let _ = writeln!(text, "  sequence: {}", sequence.name);
            }
            for synonym in &schema.synonyms {
                let _ = writeln!(
                    text,
                    "  synonym: {} -> {}",
                    synonym.name, synonym.referenced_object
                );
            }
        }
        text
    }
}

impl CatalogCommand for ListCommand {
    fn name(&self) -> &str {
        "list"
    }

    fn set_database_options(&mut self, options: &DatabaseSpecificOptions) {
        self.database_options = Some(options.clone());
    }

    fn execute(&mut self, catalog: &Catalog, _source: &dyn MetadataSource) -> Result<()> {
        let rendered = match self.output.output_format {
            OutputFormat::Text => self.render_text(catalog),
            OutputFormat::Json => serde_json::to_string_pretty(catalog).map_err(|err| {
                SchemaScanError::CommandExecution {
                    command: String::from("list"),
                    message: err.to_string(),
                }
            })?,
        };
        self.output.write_string(&rendered)
    }
}
