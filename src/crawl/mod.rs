//! Metadata retrieval: source seam, strategy selection, catalog building

mod crawler;
mod source;
mod strategy;

pub use crawler::crawl;
pub use source::{
    ColumnRow, DatabaseProduct, ForeignKeyRow, IndexRow, MetadataSource, PrimaryKeyRow,
    RoutineRow, SchemaRow, SequenceRow, SynonymRow, TableRow,
};
pub use strategy::{
    CrawlOverrides, DatabaseSpecificOptions, MetadataCategory, RetrievalStrategy,
};
