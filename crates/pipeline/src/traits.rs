//! Core trait for the quality-filter pipeline.
//!
//! This module defines the Filter trait that decides whether an enriched
//! catalog entry is good enough to keep.

use catalog_store::CatalogEntry;

/// Core trait for filtering catalog entries.
///
/// ## Design Note
/// - `Send + Sync` so one pipeline can be shared by every enrichment task
/// - A filter only inspects the entry; deleting rejected entries from the
///   store is the orchestrator's job
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// True when the entry passes this filter.
    fn accepts(&self, entry: &CatalogEntry) -> bool;

    /// Keep only the entries this filter accepts.
    fn apply(&self, entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
        entries.into_iter().filter(|e| self.accepts(e)).collect()
    }
}
