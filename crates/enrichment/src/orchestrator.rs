//! # Catalog Enrichment Orchestrator
//!
//! This module coordinates the fetch-merge-filter pipeline for one batch:
//! 1. Load every entry of a given type from the record store
//! 2. For each entry, concurrently:
//!    a. fetch its trailer and attach it
//!    b. fetch its external identifier, attach an `ExternalRatings` link,
//!       then fetch the ratings through that link
//! 3. Apply the quality filters to the rated entry; delete it on rejection
//! 4. Wait until every entry's task has finished (the join barrier)
//! 5. Return the surviving entries as they are now stored
//!
//! ## Failure model
//!
//! Nothing below `fetch_movie_data` propagates to the caller. Transport and
//! decode errors are logged and treated as "nothing to attach"; every remote
//! call is bounded by `call_timeout`, so each entry task always finishes and
//! the barrier always drains. The only removal path is the quality check.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use api_client::{
    CatalogClient, ClientError, FetchConfig, OmdbClient, PosterFetcher, RatingsSource, TmdbClient,
};
use catalog_store::{CatalogEntry, CatalogId, EntryField, ExternalRatings, RecordStore};
use pipeline::FilterPipeline;

/// What happened to one entry during a sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryOutcome {
    /// Ratings fetched and the entry passed the quality filters
    Retained,
    /// Ratings fetched, the entry failed the quality filters and was deleted
    Pruned,
    /// Identifier found but no ratings arrived (error or timeout)
    Unrated,
    /// The catalog had no external identifier for this movie
    NoIdentifier,
    /// The entry id is not a catalog id; no remote calls were made
    Skipped,
    /// The entry disappeared from the store before its ratings could be attached
    Missing,
    /// The entry failed the quality filters but could not be deleted
    DeleteFailed,
}

/// Result of one entry task
#[derive(Debug, Clone, Copy)]
struct EntryReport {
    outcome: EntryOutcome,
    trailer_attached: bool,
}

/// Everything a sync produced
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Surviving entries in their final stored state, in batch order
    pub entries: Vec<CatalogEntry>,
    /// Outcome per entry id
    pub outcomes: BTreeMap<String, EntryOutcome>,
    pub trailers_attached: usize,
    /// Entry tasks that panicked
    pub failed_tasks: usize,
}

impl SyncReport {
    pub fn count(&self, outcome: EntryOutcome) -> usize {
        self.outcomes.values().filter(|o| **o == outcome).count()
    }

    /// Ids deleted by the quality filters during this sync
    pub fn pruned_ids(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| **o == EntryOutcome::Pruned)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

/// Coordinates catalog lookups, ratings enrichment and quality pruning.
///
/// Cheap to clone: every component sits behind an `Arc`, which is how each
/// spawned entry task gets its own handle.
#[derive(Clone)]
pub struct CatalogOrchestrator {
    store: Arc<dyn RecordStore>,
    catalog: Arc<dyn CatalogClient>,
    ratings: Arc<dyn RatingsSource>,
    filters: Arc<FilterPipeline>,
    posters: Option<PosterFetcher>,
    call_timeout: Duration,
}

impl CatalogOrchestrator {
    /// Create an orchestrator over explicit collaborators.
    ///
    /// Fetched ratings always go through `FilterPipeline::quality_default`.
    pub fn new(
        store: Arc<dyn RecordStore>,
        catalog: Arc<dyn CatalogClient>,
        ratings: Arc<dyn RatingsSource>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            store,
            catalog,
            ratings,
            filters: Arc::new(FilterPipeline::quality_default()),
            posters: None,
            call_timeout,
        }
    }

    /// Create an orchestrator wired to the real HTTP clients.
    pub fn from_config(store: Arc<dyn RecordStore>, config: &FetchConfig) -> Result<Self> {
        let catalog = TmdbClient::new(config).context("Failed to create catalog client")?;
        let ratings = OmdbClient::new(config).context("Failed to create ratings client")?;

        // The per-call bound sits just above the HTTP timeout so the client
        // reports its own timeout first.
        let call_timeout = config.request_timeout + Duration::from_secs(1);

        Ok(Self::new(store, Arc::new(catalog), Arc::new(ratings), call_timeout)
            .with_poster_fetcher(PosterFetcher::new(config)))
    }

    /// Run `extra` after the quality rule, replacing any earlier extras.
    ///
    /// The quality rule itself cannot be removed.
    pub fn with_extra_filters(mut self, extra: FilterPipeline) -> Self {
        self.filters = Arc::new(FilterPipeline::quality_default().chain(extra));
        self
    }

    pub fn with_poster_fetcher(mut self, posters: PosterFetcher) -> Self {
        self.posters = Some(posters);
        self
    }

    /// Enrich and prune every entry of `type_filter`.
    ///
    /// # Returns
    /// The surviving entries, re-read from the store after all work is done.
    /// Entries deleted by the quality filters are not included.
    pub async fn fetch_movie_data(&self, type_filter: &str) -> Result<Vec<CatalogEntry>> {
        Ok(self.fetch_movie_data_with_report(type_filter).await?.entries)
    }

    /// Same as `fetch_movie_data`, with per-entry outcomes.
    pub async fn fetch_movie_data_with_report(&self, type_filter: &str) -> Result<SyncReport> {
        let start_time = Instant::now();

        let batch = self
            .store
            .get_all_where(EntryField::Type, type_filter)
            .with_context(|| format!("Failed to load entries of type {:?}", type_filter))?;
        info!("Loaded {} entries of type {:?}", batch.len(), type_filter);

        // One task per entry; draining the set is the join barrier.
        let mut barrier = JoinSet::new();
        for entry in &batch {
            let this = self.clone();
            let id = entry.id.clone();
            let movie_id = entry.catalog_id();
            barrier.spawn(async move {
                let report = this.enrich_entry(&id, movie_id).await;
                (id, report)
            });
        }

        let mut report = SyncReport::default();
        while let Some(joined) = barrier.join_next().await {
            match joined {
                Ok((id, entry_report)) => {
                    if entry_report.trailer_attached {
                        report.trailers_attached += 1;
                    }
                    report.outcomes.insert(id, entry_report.outcome);
                }
                Err(e) => {
                    warn!("Enrichment task failed: {}", e);
                    report.failed_tasks += 1;
                }
            }
        }

        // Re-read so the caller sees attached data and no deleted entries.
        for entry in &batch {
            if let Some(current) = self
                .store
                .get_by_id(&entry.id)
                .with_context(|| format!("Failed to re-read entry {}", entry.id))?
            {
                report.entries.push(current);
            }
        }

        info!(
            "Synced {:?}: {} retained, {} pruned, {} unrated, {} without identifier, {} skipped, {} missing, {} not deleted, {} trailers in {:.2?}",
            type_filter,
            report.count(EntryOutcome::Retained),
            report.count(EntryOutcome::Pruned),
            report.count(EntryOutcome::Unrated),
            report.count(EntryOutcome::NoIdentifier),
            report.count(EntryOutcome::Skipped),
            report.count(EntryOutcome::Missing),
            report.count(EntryOutcome::DeleteFailed),
            report.trailers_attached,
            start_time.elapsed()
        );

        Ok(report)
    }

    /// Download a poster on a blocking thread.
    ///
    /// `None` when no poster fetcher is configured or the download failed.
    pub async fn fetch_poster(&self, path: &str) -> Option<Vec<u8>> {
        let fetcher = self.posters.clone()?;
        let path = path.to_string();
        match tokio::task::spawn_blocking(move || fetcher.fetch_poster(&path)).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Poster task failed: {}", e);
                None
            }
        }
    }

    /// Run both enrichment branches for one entry and wait for both.
    async fn enrich_entry(&self, id: &str, movie_id: Option<CatalogId>) -> EntryReport {
        let Some(movie_id) = movie_id else {
            warn!("Entry {:?} has no numeric catalog id, skipping", id);
            return EntryReport {
                outcome: EntryOutcome::Skipped,
                trailer_attached: false,
            };
        };

        let (trailer_attached, outcome) =
            tokio::join!(self.attach_trailer(movie_id), self.attach_ratings(movie_id));

        EntryReport {
            outcome,
            trailer_attached,
        }
    }

    /// Fetch the trailer and attach it to the entry matching its id.
    async fn attach_trailer(&self, movie_id: CatalogId) -> bool {
        let fetched = self
            .bounded("trailer", movie_id, self.catalog.fetch_trailers(movie_id))
            .await
            .flatten();
        let Some(trailer) = fetched else {
            debug!("No trailer for movie {}", movie_id);
            return false;
        };

        let owner = trailer.id.clone();
        let mut trailer = Some(trailer);
        self.update_entry(&owner, &mut |entry| {
            if let Some(trailer) = trailer.take() {
                entry.attach_trailer(trailer);
            }
        })
    }

    /// Identifier, then ratings, then the quality check.
    async fn attach_ratings(&self, movie_id: CatalogId) -> EntryOutcome {
        let identifier = self
            .bounded("identifier", movie_id, self.catalog.fetch_identifier(movie_id))
            .await
            .flatten();
        let Some(identifier) = identifier else {
            debug!("No external identifier for movie {}", movie_id);
            return EntryOutcome::NoIdentifier;
        };

        let mut ratings = ExternalRatings::new(identifier.id, identifier.imdb_id);
        let mut link = Some(ratings.clone());
        let linked = self.update_entry(&ratings.id, &mut |entry| {
            if let Some(link) = link.take() {
                entry.attach_ratings(link);
            }
        });
        if !linked {
            debug!("Entry {} vanished before its identifier arrived", ratings.id);
            return EntryOutcome::Missing;
        }

        let Some(response) = self
            .bounded("ratings", movie_id, self.ratings.fetch_ratings(&ratings.path))
            .await
        else {
            return EntryOutcome::Unrated;
        };
        ratings.apply(&response);

        let owner = ratings.id.clone();
        let mut snapshot = None;
        self.update_entry(&owner, &mut |entry| {
            entry.attach_ratings(ratings.clone());
            snapshot = Some(entry.clone());
        });
        let Some(snapshot) = snapshot else {
            debug!("Entry {} vanished before its ratings arrived", owner);
            return EntryOutcome::Missing;
        };

        if self.filters.accepts(&snapshot) {
            return EntryOutcome::Retained;
        }

        match self.store.delete_by_id(&owner) {
            Ok(true) => {
                info!(
                    "Pruned entry {} (imdb={:?}, rotten tomatoes={:?})",
                    owner, ratings.imdb_rating, ratings.rotten_tomatoes_score
                );
                EntryOutcome::Pruned
            }
            Ok(false) => EntryOutcome::Missing,
            Err(e) => {
                warn!("Failed to delete entry {}: {}", owner, e);
                EntryOutcome::DeleteFailed
            }
        }
    }

    /// Await a remote call under the per-call timeout.
    ///
    /// Errors and timeouts are logged and collapse to `None`.
    async fn bounded<T>(
        &self,
        what: &str,
        movie_id: CatalogId,
        call: impl Future<Output = Result<T, ClientError>>,
    ) -> Option<T> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!("{} fetch for movie {} failed: {}", what, movie_id, e);
                None
            }
            Err(_) => {
                warn!(
                    "{} fetch for movie {} timed out after {:?}",
                    what, movie_id, self.call_timeout
                );
                None
            }
        }
    }

    fn update_entry(&self, id: &str, f: &mut dyn FnMut(&mut CatalogEntry)) -> bool {
        match self.store.update(id, f) {
            Ok(found) => found,
            Err(e) => {
                warn!("Failed to update entry {}: {}", id, e);
                false
            }
        }
    }
}

impl std::fmt::Debug for CatalogOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogOrchestrator")
            .field("filters", &self.filters)
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}
