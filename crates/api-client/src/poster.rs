//! Blocking poster download from the image CDN.
//!
//! This is the one synchronous call in the crate. Async callers must run it
//! on a blocking thread (`tokio::task::spawn_blocking`): the blocking reqwest
//! client owns an internal runtime and panics if created or dropped inside
//! an async context, so a fresh client is built per call.

use tracing::debug;

use crate::config::FetchConfig;

/// Downloads poster images as raw bytes
#[derive(Debug, Clone)]
pub struct PosterFetcher {
    config: FetchConfig,
}

impl PosterFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Fetch the poster at `path` (e.g. "/abc.jpg").
    ///
    /// Any failure yields `None`; nothing is surfaced to the caller.
    pub fn fetch_poster(&self, path: &str) -> Option<Vec<u8>> {
        let url = self.config.poster_url(path);

        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.request_timeout)
            .build()
            .inspect_err(|e| debug!("Failed to build poster client: {}", e))
            .ok()?;

        let response = client
            .get(&url)
            .send()
            .inspect_err(|e| debug!("Poster request {} failed: {}", url, e))
            .ok()?;

        if !response.status().is_success() {
            debug!("Poster request {} returned {}", url, response.status());
            return None;
        }

        let bytes = response
            .bytes()
            .inspect_err(|e| debug!("Poster body {} unreadable: {}", url, e))
            .ok()?;
        Some(bytes.to_vec())
    }
}
