//! The FilterPipeline chains quality filters.
//!
//! This module provides the FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use catalog_store::CatalogEntry;

use crate::filters::RatingsPresentFilter;
use crate::traits::Filter;

/// Chains multiple filters together; an entry survives only if every filter
/// accepts it.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(RatingsPresentFilter)
///     .add_filter(MinimumImdbRatingFilter::new(6.0));
///
/// if !pipeline.accepts(&entry) {
///     store.delete_by_id(&entry.id)?;
/// }
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The pipeline the enrichment step uses unless told otherwise:
    /// both ratings must be present.
    pub fn quality_default() -> Self {
        Self::new().add_filter(RatingsPresentFilter)
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Append every filter of `other` after this pipeline's filters.
    pub fn chain(mut self, other: FilterPipeline) -> Self {
        self.filters.extend(other.filters);
        self
    }

    /// Names of the filters, in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// True when every filter accepts the entry.
    ///
    /// Stops at the first rejecting filter and logs its name.
    pub fn accepts(&self, entry: &CatalogEntry) -> bool {
        match self.filters.iter().find(|f| !f.accepts(entry)) {
            Some(filter) => {
                tracing::debug!("Entry {} rejected by {}", entry.id, filter.name());
                false
            }
            None => true,
        }
    }

    /// Apply all filters in sequence to a batch of entries.
    pub fn apply(&self, entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
        let mut current = entries;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPipeline")
            .field("filters", &self.filter_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_store::ExternalRatings;

    fn rated(id: &str, imdb: &str, rt: &str) -> CatalogEntry {
        let mut entry = CatalogEntry::new(id, "popular");
        let mut ratings = ExternalRatings::new(id, format!("tt{}", id));
        ratings.imdb_rating = imdb.to_string();
        ratings.rotten_tomatoes_score = rt.to_string();
        entry.attach_ratings(ratings);
        entry
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();

        let entries = vec![rated("1", "N/A", ""), CatalogEntry::new("2", "popular")];

        assert!(pipeline.accepts(&entries[0]));
        assert_eq!(pipeline.apply(entries).len(), 2);
    }

    #[test]
    fn test_quality_default() {
        let pipeline = FilterPipeline::quality_default();
        assert_eq!(pipeline.filter_names(), vec!["RatingsPresentFilter"]);

        let entries = vec![
            rated("1", "7.4", "88%"),
            rated("2", "N/A", "88%"),
            rated("3", "6.0", ""),
        ];

        let kept = pipeline.apply(entries);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "1");
    }

    #[test]
    fn test_chain_keeps_quality_rule_first() {
        let extra = FilterPipeline::new().add_filter(crate::filters::MinimumImdbRatingFilter::new(7.0));
        let pipeline = FilterPipeline::quality_default().chain(extra);

        assert_eq!(
            pipeline.filter_names(),
            vec!["RatingsPresentFilter", "MinimumImdbRatingFilter"]
        );
        assert!(pipeline.accepts(&rated("1", "7.4", "88%")));
        assert!(!pipeline.accepts(&rated("2", "6.9", "88%")));
        assert!(!pipeline.accepts(&rated("3", "N/A", "88%")));
    }
}
