//! Integration tests for the quality pipeline.
//!
//! These tests run filters against entries stored in a real `CatalogStore`,
//! the way the enrichment orchestrator uses them.

use catalog_store::{CatalogEntry, CatalogStore, EntryField, ExternalRatings, RecordStore};
use pipeline::filters::*;
use pipeline::{Filter, FilterPipeline};

fn create_test_store() -> CatalogStore {
    let entries = vec![
        // Well rated on both sites: should pass
        rated("603", "The Matrix", "8.7", "83%"),
        // IMDb placeholder: should be filtered
        rated("13", "Forrest Gump", "N/A", "71%"),
        // No Rotten Tomatoes score: should be filtered
        rated("680", "Pulp Fiction", "8.9", ""),
        // Both present but low IMDb rating
        rated("10196", "The Last Airbender", "4.0", "5%"),
        // Never enriched
        CatalogEntry::new("550", "popular").with_title("Fight Club"),
    ];
    CatalogStore::from_entries(entries).unwrap()
}

fn rated(id: &str, title: &str, imdb: &str, rt: &str) -> CatalogEntry {
    let mut entry = CatalogEntry::new(id, "popular").with_title(title);
    let mut ratings = ExternalRatings::new(id, format!("tt{:0>7}", id));
    ratings.imdb_rating = imdb.to_string();
    ratings.rotten_tomatoes_score = rt.to_string();
    entry.attach_ratings(ratings);
    entry
}

#[test]
fn test_quality_default_keeps_fully_rated_entries() {
    let store = create_test_store();
    let batch = store.get_all_where(EntryField::Type, "popular").unwrap();

    let kept = FilterPipeline::quality_default().apply(batch);

    let mut ids: Vec<_> = kept.iter().map(|e| e.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["10196", "603"]);
}

#[test]
fn test_threshold_on_top_of_quality_rule() {
    let store = create_test_store();
    let batch = store.get_all_where(EntryField::Type, "popular").unwrap();

    let pipeline = FilterPipeline::quality_default().add_filter(MinimumImdbRatingFilter::new(6.0));
    let kept = pipeline.apply(batch);

    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].title.as_deref(), Some("The Matrix"));
}

#[test]
fn test_pruning_rejected_entries_from_store() {
    let store = create_test_store();
    let pipeline = FilterPipeline::quality_default();

    for entry in store.get_all_where(EntryField::Type, "popular").unwrap() {
        if entry.ratings.is_some() && !pipeline.accepts(&entry) {
            store.delete_by_id(&entry.id).unwrap();
        }
    }

    let mut deleted = store.deleted_ids();
    deleted.sort();
    assert_eq!(deleted, vec!["13".to_string(), "680".to_string()]);
    // Unenriched entries are never pruned by the quality rule alone.
    assert!(store.get_by_id("550").unwrap().is_some());
}

#[test]
fn test_filter_trait_objects() {
    let filters: Vec<Box<dyn Filter>> = vec![
        Box::new(RatingsPresentFilter),
        Box::new(MinimumImdbRatingFilter::new(8.0)),
    ];
    let entry = rated("603", "The Matrix", "8.7", "83%");

    assert!(filters.iter().all(|f| f.accepts(&entry)));
}
