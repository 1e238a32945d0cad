//! Filter enforcing the ratings-quality rule.
//!
//! An entry is worth keeping only if the ratings database knows both its
//! IMDb rating and its Rotten Tomatoes score.

use crate::traits::Filter;
use catalog_store::CatalogEntry;

/// Rejects entries whose fetched ratings are missing or placeholders.
///
/// ## Rule
/// 1. The entry must carry `ExternalRatings`
/// 2. `imdb_rating` must be non-empty and not "N/A"
/// 3. `rotten_tomatoes_score` must be non-empty
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingsPresentFilter;

impl Filter for RatingsPresentFilter {
    fn name(&self) -> &str {
        "RatingsPresentFilter"
    }

    fn accepts(&self, entry: &CatalogEntry) -> bool {
        entry
            .ratings
            .as_ref()
            .is_some_and(|ratings| ratings.has_quality_ratings())
    }
}
