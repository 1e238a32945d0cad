//! Filter implementations for the quality pipeline.
//!
//! This module contains the concrete filters that can be composed into a
//! FilterPipeline.

pub mod minimum_imdb_rating;
pub mod ratings_present;

// Re-export for convenience
pub use minimum_imdb_rating::MinimumImdbRatingFilter;
pub use ratings_present::RatingsPresentFilter;
