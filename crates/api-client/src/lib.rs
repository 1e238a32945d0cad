//! Remote API clients for the movie catalog.
//!
//! This crate talks to the two remote services the catalog is enriched from,
//! plus the image CDN:
//! - `TmdbClient` (`CatalogClient`): trailers and external identifiers
//! - `OmdbClient` (`RatingsSource`): IMDb and Rotten Tomatoes ratings
//! - `PosterFetcher`: blocking poster download
//!
//! The async clients sit behind object-safe traits so the enrichment
//! orchestrator can be driven by test doubles.

pub mod catalog;
pub mod config;
pub mod error;
mod http;
pub mod poster;
pub mod ratings;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use catalog::{CatalogClient, IdentifierData, TmdbClient};
pub use config::FetchConfig;
pub use error::{ClientError, Result};
pub use poster::PosterFetcher;
pub use ratings::{OmdbClient, RatingsSource};
