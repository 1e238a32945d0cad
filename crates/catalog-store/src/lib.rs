//! # Catalog Store Crate
//!
//! This crate holds the persisted side of the movie catalog.
//!
//! ## Main Components
//!
//! - **types**: Domain records (CatalogEntry, Trailer, ExternalRatings, RatingsApiResponse)
//! - **store**: The `RecordStore` trait and the in-memory `CatalogStore`
//! - **parser**: JSON file load/save for `CatalogStore`
//! - **error**: Error types for store access
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog_store::{CatalogStore, EntryField, RecordStore};
//! use std::path::Path;
//!
//! let store = CatalogStore::load_from_file(Path::new("data/catalog.json"))?;
//! let popular = store.get_all_where(EntryField::Type, "popular")?;
//!
//! println!("{} popular movies", popular.len());
//! ```

pub mod error;
pub mod parser;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::{CatalogStore, EntryField, RecordStore};
pub use types::{
    CatalogEntry,
    CatalogId,
    ExternalRatings,
    RatingSource,
    RatingsApiResponse,
    Trailer,
    NOT_AVAILABLE,
    ROTTEN_TOMATOES_SOURCE,
};
