//! rust-schemascan: A fast Rust crawler for relational database schema metadata
//!
//! This library retrieves structural metadata (schemas, tables, columns,
//! keys, routines, sequences, synonyms) through a driver-level
//! [`crawl::MetadataSource`], assembles it into a normalized [`model::Catalog`],
//! filters the catalog under inclusion rules while keeping references
//! consistent, and hands it to a chain of output commands sharing one
//! retrieval pass. A built catalog can be saved to a snapshot archive and
//! reused offline without a live connection.

pub mod commands;
pub mod config;
pub mod crawl;
pub mod error;
pub mod filter;
pub mod identifiers;
pub mod model;
pub mod output;
pub mod query;
pub mod snapshot;

pub use error::SchemaScanError;

use crawl::{CrawlOverrides, MetadataSource};
use filter::FilterOptions;
use model::Catalog;

/// Crawl a metadata source and reduce the catalog in one step.
///
/// The catalog is built once and reduced in place exactly once; hand the
/// result to a [`commands::CommandChain`] for output.
pub fn scan(
    source: &dyn MetadataSource,
    overrides: &CrawlOverrides,
    rules: &FilterOptions,
) -> error::Result<Catalog> {
    // Step 1: crawl the source into a catalog
    let mut catalog = crawl::crawl(source, overrides, rules)?;

    // Step 2: prune it per the inclusion rules
    filter::reduce_all(&mut catalog, rules);

    Ok(catalog)
}
