//! Common test utilities: an in-memory metadata source playing the driver
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use rust_schemascan::crawl::{
    self, ColumnRow, CrawlOverrides, DatabaseProduct, ForeignKeyRow, IndexRow, MetadataSource,
    PrimaryKeyRow, RoutineRow, SchemaRow, SequenceRow, SynonymRow, TableRow,
};
use rust_schemascan::error::{Result, SchemaScanError};
use rust_schemascan::filter::FilterOptions;
use rust_schemascan::identifiers::IdentifierCase;
use rust_schemascan::model::{Catalog, RoutineKind, SchemaReference};

/// A scriptable in-memory metadata source. Rows are keyed by schema name;
/// every retrieval call is logged so tests can assert on strategy behavior.
pub struct FakeSource {
    pub product: DatabaseProduct,
    pub schema_rows: Vec<SchemaRow>,
    pub table_rows: HashMap<String, Vec<TableRow>>,
    pub column_rows: HashMap<String, Vec<ColumnRow>>,
    pub primary_key_rows: HashMap<String, Vec<PrimaryKeyRow>>,
    pub index_rows: HashMap<String, Vec<IndexRow>>,
    pub foreign_key_rows: HashMap<String, Vec<ForeignKeyRow>>,
    pub routine_rows: HashMap<String, Vec<RoutineRow>>,
    pub sequence_rows: HashMap<String, Vec<SequenceRow>>,
    pub synonym_rows: HashMap<String, Vec<SynonymRow>>,
    /// Simulate a fatal schema-level retrieval failure
    pub fail_schemas: bool,
    /// Simulate a driver that cannot answer capability probes
    pub fail_probes: bool,
    /// Simulate a per-table column retrieval failure for this table
    pub fail_columns_for_table: Option<String>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeSource {
    pub fn empty() -> Self {
        Self {
            product: DatabaseProduct {
                name: "testdb".to_string(),
                version: "1.0".to_string(),
            },
            schema_rows: Vec::new(),
            table_rows: HashMap::new(),
            column_rows: HashMap::new(),
            primary_key_rows: HashMap::new(),
            index_rows: HashMap::new(),
            foreign_key_rows: HashMap::new(),
            routine_rows: HashMap::new(),
            sequence_rows: HashMap::new(),
            synonym_rows: HashMap::new(),
            fail_schemas: false,
            fail_probes: false,
            fail_columns_for_table: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Two schemas, PUBLIC and HR, with a cross-schema foreign key from
    /// PUBLIC.ORDERS to HR.EMPLOYEES that only resolves on the second pass.
    pub fn fixture() -> Self {
        let mut source = Self::empty();
        let public = SchemaReference::new(None, "PUBLIC");
        let hr = SchemaReference::new(None, "HR");

        source.schema_rows = vec![
            SchemaRow {
                catalog_name: None,
                schema_name: "PUBLIC".to_string(),
            },
            SchemaRow {
                catalog_name: None,
                schema_name: "HR".to_string(),
            },
        ];

        source.table_rows.insert(
            "PUBLIC".to_string(),
            vec![
                table_row("CUSTOMERS", "TABLE"),
                table_row("ORDERS", "TABLE"),
            ],
        );
        source
            .table_rows
            .insert("HR".to_string(), vec![table_row("EMPLOYEES", "TABLE")]);

        source.column_rows.insert(
            "PUBLIC".to_string(),
            vec![
                column_row("CUSTOMERS", "ID", 1, "INTEGER", false),
                column_row("CUSTOMERS", "NAME", 2, "VARCHAR", false),
                column_row("ORDERS", "ID", 1, "INTEGER", false),
                column_row("ORDERS", "CUSTOMER_ID", 2, "INTEGER", true),
                column_row("ORDERS", "EMPLOYEE_ID", 3, "INTEGER", true),
                column_row("ORDERS", "NOTES", 4, "CLOB", true),
            ],
        );
        source.column_rows.insert(
            "HR".to_string(),
            vec![
                column_row("EMPLOYEES", "ID", 1, "INTEGER", false),
                column_row("EMPLOYEES", "MANAGER_ID", 2, "INTEGER", true),
                column_row("EMPLOYEES", "TITLE", 3, "VARCHAR", true),
            ],
        );

        source.primary_key_rows.insert(
            "PUBLIC".to_string(),
            vec![
                primary_key_row("CUSTOMERS", "PK_CUSTOMERS", "ID", 1),
                primary_key_row("ORDERS", "PK_ORDERS", "ID", 1),
            ],
        );
        source.primary_key_rows.insert(
            "HR".to_string(),
            vec![primary_key_row("EMPLOYEES", "PK_EMPLOYEES", "ID", 1)],
        );

        source.index_rows.insert(
            "PUBLIC".to_string(),
            vec![
                IndexRow {
                    table: "ORDERS".to_string(),
                    index_name: "IDX_ORDERS_CUSTOMER".to_string(),
                    column: "CUSTOMER_ID".to_string(),
                    ordinal_position: 1,
                    unique: false,
                },
                IndexRow {
                    table: "CUSTOMERS".to_string(),
                    index_name: "UQ_CUSTOMERS_NAME".to_string(),
                    column: "NAME".to_string(),
                    ordinal_position: 1,
                    unique: true,
                },
            ],
        );

        source.foreign_key_rows.insert(
            "PUBLIC".to_string(),
            vec![
                foreign_key_row(
                    "FK_ORDERS_CUSTOMERS",
                    1,
                    &public,
                    "CUSTOMERS",
                    "ID",
                    &public,
                    "ORDERS",
                    "CUSTOMER_ID",
                ),
                // Forward reference: HR.EMPLOYEES is not built yet when
                // PUBLIC is crawled
                foreign_key_row(
                    "FK_ORDERS_EMPLOYEES",
                    1,
                    &hr,
                    "EMPLOYEES",
                    "ID",
                    &public,
                    "ORDERS",
                    "EMPLOYEE_ID",
                ),
            ],
        );
        source.foreign_key_rows.insert(
            "HR".to_string(),
            vec![foreign_key_row(
                "FK_EMP_MANAGER",
                1,
                &hr,
                "EMPLOYEES",
                "ID",
                &hr,
                "EMPLOYEES",
                "MANAGER_ID",
            )],
        );

        source.routine_rows.insert(
            "PUBLIC".to_string(),
            vec![RoutineRow {
                name: "NEW_ORDER".to_string(),
                specific_name: Some("NEW_ORDER_1".to_string()),
                kind: RoutineKind::Procedure,
                remarks: None,
            }],
        );
        source.routine_rows.insert(
            "HR".to_string(),
            vec![RoutineRow {
                name: "EMP_COUNT".to_string(),
                specific_name: None,
                kind: RoutineKind::Function,
                remarks: Some("Head count".to_string()),
            }],
        );

        source.sequence_rows.insert(
            "PUBLIC".to_string(),
            vec![SequenceRow {
                name: "ORDER_SEQ".to_string(),
                start_value: 1,
                increment: 1,
                minimum_value: Some(1),
                maximum_value: None,
                cycles: false,
            }],
        );

        source.synonym_rows.insert(
            "PUBLIC".to_string(),
            vec![SynonymRow {
                name: "ORD".to_string(),
                referenced_object: "PUBLIC.ORDERS".to_string(),
            }],
        );

        source
    }

    fn log(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn rows_for<T: Clone>(&self, rows: &HashMap<String, Vec<T>>, schema: &SchemaReference) -> Vec<T> {
        rows.get(&schema.full_name()).cloned().unwrap_or_default()
    }
}

impl MetadataSource for FakeSource {
    fn database_product(&self) -> Result<DatabaseProduct> {
        Ok(self.product.clone())
    }

    fn supports_schemas(&self) -> Result<bool> {
        if self.fail_probes {
            return Err(SchemaScanError::retrieval("supports_schemas", "driver hung up"));
        }
        Ok(true)
    }

    fn supports_catalogs(&self) -> Result<bool> {
        if self.fail_probes {
            return Err(SchemaScanError::retrieval("supports_catalogs", "driver hung up"));
        }
        Ok(false)
    }

    fn identifier_quote_string(&self) -> Result<String> {
        if self.fail_probes {
            return Err(SchemaScanError::retrieval(
                "identifier_quote_string",
                "driver hung up",
            ));
        }
        Ok("\"".to_string())
    }

    fn stored_identifier_case(&self) -> Result<IdentifierCase> {
        if self.fail_probes {
            return Err(SchemaScanError::retrieval(
                "stored_identifier_case",
                "driver hung up",
            ));
        }
        Ok(IdentifierCase::Upper)
    }

    fn schemas(&self) -> Result<Vec<SchemaRow>> {
        if self.fail_schemas {
            return Err(SchemaScanError::retrieval("schemas", "connection closed"));
        }
        Ok(self.schema_rows.clone())
    }

    fn tables(
        &self,
        schema: &SchemaReference,
        override_sql: Option<&str>,
    ) -> Result<Vec<TableRow>> {
        self.log(format!(
            "tables:{}:{}",
            schema.full_name(),
            override_sql.unwrap_or("-")
        ));
        Ok(self.rows_for(&self.table_rows, schema))
    }

    fn columns(&self, schema: &SchemaReference, table: Option<&str>) -> Result<Vec<ColumnRow>> {
        self.log(format!(
            "columns:{}:{}",
            schema.full_name(),
            table.unwrap_or("*")
        ));
        if let (Some(failing), Some(requested)) = (&self.fail_columns_for_table, table) {
            if failing == requested {
                return Err(SchemaScanError::retrieval(requested, "table is locked"));
            }
        }
        Ok(self
            .rows_for(&self.column_rows, schema)
            .into_iter()
            .filter(|row| table.is_none_or(|name| row.table == name))
            .collect())
    }

    fn primary_key(&self, schema: &SchemaReference, table: &str) -> Result<Vec<PrimaryKeyRow>> {
        self.log(format!("primary_key:{}:{}", schema.full_name(), table));
        Ok(self
            .rows_for(&self.primary_key_rows, schema)
            .into_iter()
            .filter(|row| row.table == table)
            .collect())
    }

    fn indexes(&self, schema: &SchemaReference, table: Option<&str>) -> Result<Vec<IndexRow>> {
        self.log(format!(
            "indexes:{}:{}",
            schema.full_name(),
            table.unwrap_or("*")
        ));
        Ok(self
            .rows_for(&self.index_rows, schema)
            .into_iter()
            .filter(|row| table.is_none_or(|name| row.table == name))
            .collect())
    }

    fn foreign_keys(
        &self,
        schema: &SchemaReference,
        table: Option<&str>,
    ) -> Result<Vec<ForeignKeyRow>> {
        self.log(format!(
            "foreign_keys:{}:{}",
            schema.full_name(),
            table.unwrap_or("*")
        ));
        Ok(self
            .rows_for(&self.foreign_key_rows, schema)
            .into_iter()
            .filter(|row| table.is_none_or(|name| row.foreign_key_table == name))
            .collect())
    }

    fn routines(&self, schema: &SchemaReference, kind: RoutineKind) -> Result<Vec<RoutineRow>> {
        self.log(format!("routines:{}:{:?}", schema.full_name(), kind));
        Ok(self
            .rows_for(&self.routine_rows, schema)
            .into_iter()
            .filter(|row| row.kind == kind)
            .collect())
    }

    fn sequences(
        &self,
        schema: &SchemaReference,
        override_sql: Option<&str>,
    ) -> Result<Vec<SequenceRow>> {
        self.log(format!(
            "sequences:{}:{}",
            schema.full_name(),
            override_sql.unwrap_or("-")
        ));
        Ok(self.rows_for(&self.sequence_rows, schema))
    }

    fn synonyms(
        &self,
        schema: &SchemaReference,
        override_sql: Option<&str>,
    ) -> Result<Vec<SynonymRow>> {
        self.log(format!(
            "synonyms:{}:{}",
            schema.full_name(),
            override_sql.unwrap_or("-")
        ));
        Ok(self.rows_for(&self.synonym_rows, schema))
    }
}

/// Crawls the standard fixture with default options and no filtering.
pub fn fixture_catalog() -> Catalog {
    let source = FakeSource::fixture();
    crawl::crawl(
        &source,
        &CrawlOverrides::new(),
        &FilterOptions::default(),
    )
    .expect("fixture crawl should succeed")
}

fn table_row(name: &str, table_type: &str) -> TableRow {
    TableRow {
        name: name.to_string(),
        table_type: table_type.to_string(),
        remarks: None,
    }
}

fn column_row(table: &str, name: &str, ordinal: u32, type_name: &str, nullable: bool) -> ColumnRow {
    ColumnRow {
        table: table.to_string(),
        name: name.to_string(),
        ordinal_position: ordinal,
        type_name: type_name.to_string(),
        nullable,
    }
}

fn primary_key_row(table: &str, key_name: &str, column: &str, sequence: u32) -> PrimaryKeyRow {
    PrimaryKeyRow {
        table: table.to_string(),
        key_name: Some(key_name.to_string()),
        column: column.to_string(),
        key_sequence: sequence,
    }
}

#[allow(clippy::too_many_arguments)]
fn foreign_key_row(
    name: &str,
    sequence: u32,
    pk_schema: &SchemaReference,
    pk_table: &str,
    pk_column: &str,
    fk_schema: &SchemaReference,
    fk_table: &str,
    fk_column: &str,
) -> ForeignKeyRow {
    ForeignKeyRow {
        name: name.to_string(),
        key_sequence: sequence,
        primary_key_schema: pk_schema.clone(),
        primary_key_table: pk_table.to_string(),
        primary_key_column: pk_column.to_string(),
        foreign_key_schema: fk_schema.clone(),
        foreign_key_table: fk_table.to_string(),
        foreign_key_column: fk_column.to_string(),
    }
}
