//! Catalog client for the TMDB movie database.
//!
//! Two lookups per movie feed the enrichment pipeline:
//! - `fetch_trailers`: the movie's video list, reduced to one `Trailer`
//! - `fetch_identifier`: the movie details, reduced to its IMDb id

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use catalog_store::{CatalogId, Trailer};

use crate::config::FetchConfig;
use crate::error::Result;
use crate::http;

/// External-identifier data for one movie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierData {
    /// Catalog id of the movie, as a string (matches `CatalogEntry::id`)
    pub id: String,
    /// External identifier understood by the ratings API
    pub imdb_id: String,
    pub title: Option<String>,
}

/// Remote movie catalog.
///
/// `Ok(None)` means the catalog had nothing to offer for this movie; it is
/// not an error.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_trailers(&self, movie_id: CatalogId) -> Result<Option<Trailer>>;

    async fn fetch_identifier(&self, movie_id: CatalogId) -> Result<Option<IdentifierData>>;
}

// Wire types: only the fields we read.

#[derive(Debug, Deserialize)]
struct VideoList {
    id: CatalogId,
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    key: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    site: String,
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct MovieDetails {
    id: CatalogId,
    #[serde(default)]
    imdb_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

/// Pick the video to attach: the first YouTube trailer, else the first video.
fn select_trailer(list: VideoList) -> Option<Trailer> {
    let id = list.id.to_string();
    let mut videos = list.results;
    let index = videos
        .iter()
        .position(|v| v.kind == "Trailer" && v.site == "YouTube")
        .or_else(|| (!videos.is_empty()).then_some(0))?;
    let video = videos.swap_remove(index);

    Some(Trailer {
        id,
        key: video.key,
        name: video.name,
        site: video.site,
        kind: video.kind,
    })
}

fn identifier_from(details: MovieDetails) -> Option<IdentifierData> {
    let imdb_id = details.imdb_id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())?;
    Some(IdentifierData {
        id: details.id.to_string(),
        imdb_id,
        title: details.title,
    })
}

/// HTTP client for the TMDB v3 API
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        FetchConfig::require_key(&config.catalog_api_key, "Catalog")?;
        Ok(Self {
            client: http::build_client(config)?,
            base_url: config.catalog_base_url.trim_end_matches('/').to_string(),
            api_key: config.catalog_api_key.clone(),
        })
    }

    fn query(&self) -> [(&str, &str); 1] {
        [("api_key", self.api_key.as_str())]
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn fetch_trailers(&self, movie_id: CatalogId) -> Result<Option<Trailer>> {
        let url = format!("{}/movie/{}/videos", self.base_url, movie_id);
        let list: VideoList = http::get_json(&self.client, &url, &self.query()).await?;

        let trailer = select_trailer(list);
        if trailer.is_none() {
            debug!("No videos for movie {}", movie_id);
        }
        Ok(trailer)
    }

    async fn fetch_identifier(&self, movie_id: CatalogId) -> Result<Option<IdentifierData>> {
        let url = format!("{}/movie/{}", self.base_url, movie_id);
        let details: MovieDetails = http::get_json(&self.client, &url, &self.query()).await?;

        let identifier = identifier_from(details);
        if identifier.is_none() {
            debug!("No external identifier for movie {}", movie_id);
        }
        Ok(identifier)
    }
}
