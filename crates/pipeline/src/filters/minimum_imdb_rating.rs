//! Filter to ensure a minimum IMDb rating.

use crate::traits::Filter;
use catalog_store::CatalogEntry;

/// Removes entries rated below a threshold on IMDb.
///
/// Entries without a numeric IMDb rating are rejected as well, so this filter
/// is stricter than `RatingsPresentFilter` on the IMDb side.
#[derive(Debug, Clone, Copy)]
pub struct MinimumImdbRatingFilter {
    min_rating: f32,
}

impl MinimumImdbRatingFilter {
    /// # Arguments
    /// * `min_rating` - Lowest accepted IMDb rating, on IMDb's 0-10 scale
    pub fn new(min_rating: f32) -> Self {
        Self { min_rating }
    }
}

impl Filter for MinimumImdbRatingFilter {
    fn name(&self) -> &str {
        "MinimumImdbRatingFilter"
    }

    fn accepts(&self, entry: &CatalogEntry) -> bool {
        entry
            .ratings
            .as_ref()
            .and_then(|r| r.imdb_rating())
            .and_then(|rating| rating.parse::<f32>().ok())
            .is_some_and(|rating| rating >= self.min_rating)
    }
}
