//! Enrichment crate for the movie catalog.
//!
//! This crate contains the orchestrator that pulls trailers, external
//! identifiers and ratings for a batch of catalog entries, merges them into
//! the record store, and prunes entries that fail the quality filters.

pub mod orchestrator;

pub use orchestrator::{CatalogOrchestrator, EntryOutcome, SyncReport};
