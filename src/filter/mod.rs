//! Catalog filtering: inclusion rules and the consistency-preserving reducer

mod inclusion;
mod reducer;

pub use inclusion::InclusionRule;
pub use reducer::{reduce, reduce_all, EntityKind, REDUCTION_ORDER};

/// One inclusion rule per reducible entity kind.
///
/// The same options drive schema scoping during the crawl and the reduction
/// passes afterwards.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub schemas: InclusionRule,
    pub tables: InclusionRule,
    pub routines: InclusionRule,
    pub synonyms: InclusionRule,
    pub sequences: InclusionRule,
}

impl FilterOptions {
    pub fn rule_for(&self, kind: EntityKind) -> &InclusionRule {
        match kind {
            EntityKind::Schema => &self.schemas,
            EntityKind::Table => &self.tables,
            EntityKind::Routine => &self.routines,
            EntityKind::Synonym => &self.synonyms,
            EntityKind::Sequence => &self.sequences,
        }
    }
}
