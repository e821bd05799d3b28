//! Catalog entity types

use serde::{Deserialize, Serialize};

use super::NamedObject;

/// Identifies the schema an entity belongs to: (catalog name, schema name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaReference {
    pub catalog_name: Option<String>,
    pub name: String,
}

impl SchemaReference {
    pub fn new(catalog_name: Option<&str>, name: &str) -> Self {
        Self {
            catalog_name: catalog_name.map(|c| c.to_string()),
            name: name.to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        match &self.catalog_name {
            Some(catalog) if !catalog.is_empty() => format!("{}.{}", catalog, self.name),
            _ => self.name.clone(),
        }
    }
}

/// A database schema and everything scoped to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub catalog_name: Option<String>,
    pub name: String,
    pub tables: Vec<Table>,
    pub routines: Vec<Routine>,
    pub sequences: Vec<Sequence>,
    pub synonyms: Vec<Synonym>,
}

impl Schema {
    pub fn new(catalog_name: Option<&str>, name: &str) -> Self {
        Self {
            catalog_name: catalog_name.map(|c| c.to_string()),
            name: name.to_string(),
            tables: Vec::new(),
            routines: Vec::new(),
            sequences: Vec::new(),
            synonyms: Vec::new(),
        }
    }

    pub fn reference(&self) -> SchemaReference {
        SchemaReference {
            catalog_name: self.catalog_name.clone(),
            name: self.name.clone(),
        }
    }
}

impl NamedObject for Schema {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> String {
        self.reference().full_name()
    }
}

/// Table type tag as reported by the driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableType {
    Table,
    View,
    Other(String),
}

impl TableType {
    /// Maps a driver-reported table type string to a tag.
    pub fn from_metadata(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "TABLE" | "BASE TABLE" => TableType::Table,
            "VIEW" => TableType::View,
            _ => TableType::Other(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TableType::Table => "TABLE",
            TableType::View => "VIEW",
            TableType::Other(value) => value,
        }
    }
}

/// A table or view, with its owned columns, keys, and outgoing foreign keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub schema: SchemaReference,
    pub name: String,
    pub table_type: TableType,
    pub remarks: Option<String>,
    pub columns: Vec<Column>,
    pub primary_key: Option<PrimaryKey>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn new(schema: SchemaReference, name: &str, table_type: TableType) -> Self {
        Self {
            schema,
            name: name.to_string(),
            table_type,
            remarks: None,
            columns: Vec::new(),
            primary_key: None,
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Materializes column order ahead of query templating, either
    /// alphabetically or by ordinal position. Idempotent; this is the only
    /// place column order changes after the crawl.
    pub fn sort_columns(&mut self, alphabetical: bool) {
        if alphabetical {
            self.columns.sort_by(|a, b| a.name.cmp(&b.name));
        } else {
            self.columns.sort_by_key(|column| column.ordinal_position);
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

impl NamedObject for Table {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> String {
        format!("{}.{}", self.schema.full_name(), self.name)
    }
}

/// Coarse classification of a column's data type.
///
/// `LargeObject` and `Object` are the opaque groups excluded from templated
/// column lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeGroup {
    Character,
    Numeric,
    Temporal,
    Boolean,
    Binary,
    LargeObject,
    Object,
    Other,
}

impl TypeGroup {
    pub fn is_opaque(&self) -> bool {
        matches!(self, TypeGroup::LargeObject | TypeGroup::Object)
    }
}

/// A column data type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDataType {
    pub type_name: String,
    pub type_group: TypeGroup,
}

impl ColumnDataType {
    /// Classifies a driver-reported type name into a coarse type group.
    pub fn from_type_name(type_name: &str) -> Self {
        let upper = type_name.to_ascii_uppercase();
        let type_group = if ["BLOB", "CLOB", "NCLOB", "TEXT", "NTEXT", "BYTEA", "IMAGE"]
            .iter()
            .any(|lob| upper.contains(lob))
        {
            TypeGroup::LargeObject
        } else if ["XML", "JSON", "STRUCT", "OBJECT", "ARRAY", "VARIANT", "GEOMETRY"]
            .iter()
            .any(|opaque| upper.contains(opaque))
        {
            TypeGroup::Object
        } else if ["CHAR", "STRING"].iter().any(|c| upper.contains(c)) {
            TypeGroup::Character
        } else if [
            "INT", "DECIMAL", "NUMERIC", "NUMBER", "FLOAT", "REAL", "DOUBLE", "MONEY", "SERIAL",
        ]
        .iter()
        .any(|n| upper.contains(n))
        {
            TypeGroup::Numeric
        } else if ["DATE", "TIME", "YEAR", "INTERVAL"]
            .iter()
            .any(|t| upper.contains(t))
        {
            TypeGroup::Temporal
        } else if upper == "BIT" || upper.contains("BOOL") {
            TypeGroup::Boolean
        } else if upper.contains("BINARY") || upper == "RAW" {
            TypeGroup::Binary
        } else {
            TypeGroup::Other
        };
        Self {
            type_name: type_name.to_string(),
            type_group,
        }
    }
}

/// A table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub ordinal_position: u32,
    pub data_type: ColumnDataType,
    pub nullable: bool,
}

/// A table's primary key; columns are ordered by key sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub name: Option<String>,
    pub columns: Vec<String>,
}

/// A table index; columns are ordered by position within the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub unique: bool,
    pub columns: Vec<String>,
}

/// One endpoint of a foreign key column pairing, addressed by value so
/// snapshots stay self-contained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnReference {
    pub schema: SchemaReference,
    pub table: String,
    pub column: String,
}

impl ColumnReference {
    pub fn table_full_name(&self) -> String {
        format!("{}.{}", self.schema.full_name(), self.table)
    }
}

/// A primary-key/foreign-key column pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyColumnReference {
    /// Referenced (primary key side) column
    pub primary_key_column: ColumnReference,
    /// Referencing (foreign key side) column
    pub foreign_key_column: ColumnReference,
}

/// A foreign key between two tables, possibly across schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub name: String,
    pub column_references: Vec<ForeignKeyColumnReference>,
}

impl ForeignKey {
    /// True when either endpoint of this key lives on the given table.
    pub fn references_table(&self, schema: &SchemaReference, table: &str) -> bool {
        self.column_references.iter().any(|reference| {
            (reference.primary_key_column.schema == *schema
                && reference.primary_key_column.table == table)
                || (reference.foreign_key_column.schema == *schema
                    && reference.foreign_key_column.table == table)
        })
    }
}

/// Routine kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutineKind {
    Procedure,
    Function,
}

/// A stored procedure or function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub schema: SchemaReference,
    pub name: String,
    pub specific_name: Option<String>,
    pub kind: RoutineKind,
    pub remarks: Option<String>,
}

impl NamedObject for Routine {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> String {
        format!("{}.{}", self.schema.full_name(), self.name)
    }
}

/// A database sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub schema: SchemaReference,
    pub name: String,
    pub start_value: i64,
    pub increment: i64,
    pub minimum_value: Option<i64>,
    pub maximum_value: Option<i64>,
    pub cycles: bool,
}

impl NamedObject for Sequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> String {
        format!("{}.{}", self.schema.full_name(), self.name)
    }
}

/// A synonym (alias) for another database object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub schema: SchemaReference,
    pub name: String,
    pub referenced_object: String,
}

impl NamedObject for Synonym {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> String {
        format!("{}.{}", self.schema.full_name(), self.name)
    }
}
