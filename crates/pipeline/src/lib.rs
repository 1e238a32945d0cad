//! Quality filtering for enriched catalog entries.
//!
//! This crate provides:
//! - Filter trait and implementations for judging catalog entries
//! - FilterPipeline for composing filters
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//! use pipeline::filters::*;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(RatingsPresentFilter)
//!     .add_filter(MinimumImdbRatingFilter::new(6.5));
//!
//! let keep = pipeline.accepts(&entry);
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use traits::Filter;
