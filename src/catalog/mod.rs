//! Product catalog module
//!
//! Catalog rows come from an external product database through the
//! [`CatalogSource`] capability; the matcher ranks them by color closeness.

pub mod entry;
pub mod matcher;

pub use entry::{CatalogEntry, CatalogFilter, CatalogSource, EntryId, ProductCategory, StaticCatalog};
pub use matcher::{match_by_category, match_catalog, score_entry, CategorizedMatches, ScoredEntry};
