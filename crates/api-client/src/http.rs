//! Thin GET-and-decode helper shared by the async clients.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::FetchConfig;
use crate::error::{ClientError, Result};

/// Build an async HTTP client bounded by the configured request timeout.
pub(crate) fn build_client(config: &FetchConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// GET `url` with query parameters and decode the JSON body.
///
/// Query values are not included in logs or errors, since they carry API keys.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T> {
    debug!("GET {}", url);

    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source: source.without_url(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| ClientError::Transport {
        url: url.to_string(),
        source: source.without_url(),
    })?;

    serde_json::from_str(&body).map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })
}
