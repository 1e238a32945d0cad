//! Endpoints, keys and timeouts shared by the remote clients.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Ratings database (OMDb) host
pub const DEFAULT_RATINGS_BASE_URL: &str = "https://www.omdbapi.com";

/// Movie catalog (TMDB) API root
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Poster CDN host; posters live under `/t/p/w500/`
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org";

/// Poster size segment appended to the image host
pub const POSTER_SIZE_PATH: &str = "t/p/w500";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for every remote client.
///
/// The CLI fills this from flags and environment variables; tests point the
/// base URLs at a local mock server.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub ratings_base_url: String,
    pub ratings_api_key: String,
    pub catalog_base_url: String,
    pub catalog_api_key: String,
    pub image_base_url: String,
    /// Upper bound for a single HTTP request, connect included
    pub request_timeout: Duration,
}

impl FetchConfig {
    /// Config for the public hosts with the given API keys.
    pub fn new(ratings_api_key: impl Into<String>, catalog_api_key: impl Into<String>) -> Self {
        Self {
            ratings_base_url: DEFAULT_RATINGS_BASE_URL.to_string(),
            ratings_api_key: ratings_api_key.into(),
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            catalog_api_key: catalog_api_key.into(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Point every client at one base URL (used with local mock servers).
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.ratings_base_url = base.to_string();
        self.catalog_base_url = base.to_string();
        self.image_base_url = base.to_string();
        self
    }

    /// Full poster URL for a relative poster path.
    ///
    /// `"/abc.jpg"` and `"abc.jpg"` map to the same URL.
    pub fn poster_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.image_base_url.trim_end_matches('/'),
            POSTER_SIZE_PATH,
            path.trim_start_matches('/')
        )
    }

    pub(crate) fn require_key(key: &str, name: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(ClientError::Config(format!("{} API key is empty", name)));
        }
        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new("", "")
    }
}
