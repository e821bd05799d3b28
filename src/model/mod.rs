//! In-memory catalog model for crawled database metadata

mod catalog;
mod elements;

pub use catalog::{Catalog, CrawlInfo};
pub use elements::*;

/// An object addressable by a fully-qualified name.
///
/// Inclusion rules are evaluated against `full_name()`, so every entity the
/// reducer can prune implements this.
pub trait NamedObject {
    fn name(&self) -> &str;

    /// Dot-joined fully qualified name, without identifier quoting.
    fn full_name(&self) -> String;
}
