//! Ratings fetcher for the OMDb ratings database.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use catalog_store::RatingsApiResponse;

use crate::config::FetchConfig;
use crate::error::{ClientError, Result};
use crate::http;

/// Source of movie ratings, keyed by external (IMDb) identifier.
#[async_trait]
pub trait RatingsSource: Send + Sync {
    async fn fetch_ratings(&self, external_id: &str) -> Result<RatingsApiResponse>;
}

/// HTTP client for the ratings API.
///
/// Issues `GET {base}/?i=<external_id>&apikey=<key>`. No retries, no caching.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        FetchConfig::require_key(&config.ratings_api_key, "Ratings")?;
        Ok(Self {
            client: http::build_client(config)?,
            base_url: config.ratings_base_url.trim_end_matches('/').to_string(),
            api_key: config.ratings_api_key.clone(),
        })
    }
}

#[async_trait]
impl RatingsSource for OmdbClient {
    async fn fetch_ratings(&self, external_id: &str) -> Result<RatingsApiResponse> {
        let url = format!("{}/", self.base_url);
        let response: RatingsApiResponse = http::get_json(
            &self.client,
            &url,
            &[("i", external_id), ("apikey", self.api_key.as_str())],
        )
        .await?;

        if let Some(message) = response.api_error() {
            return Err(ClientError::Api {
                id: external_id.to_string(),
                message: message.to_string(),
            });
        }

        debug!(
            "Ratings for {}: imdb={:?} rt={:?}",
            external_id,
            response.imdb_rating,
            response.rotten_tomatoes_score()
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockRoute, MockServer};

    const MATRIX: &str = r#"{
        "Title": "The Matrix",
        "imdbRating": "8.7",
        "imdbID": "tt0133093",
        "Ratings": [
            {"Source": "Internet Movie Database", "Value": "8.7/10"},
            {"Source": "Rotten Tomatoes", "Value": "83%"}
        ],
        "Response": "True"
    }"#;

    fn client_for(server: &MockServer) -> OmdbClient {
        let config = FetchConfig::new("test-key", "unused").with_base_url(&server.base_url);
        OmdbClient::new(&config).expect("Failed to build client")
    }

    #[tokio::test]
    async fn test_fetch_ratings_sends_id_and_key() {
        let server = MockServer::start(vec![MockRoute::json("/", MATRIX)]).await;
        let client = client_for(&server);

        let response = client.fetch_ratings("tt0133093").await.unwrap();
        assert_eq!(response.id, "tt0133093");
        assert_eq!(response.imdb_rating, "8.7");
        assert_eq!(response.rotten_tomatoes_score(), "83%");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].contains("i=tt0133093"));
        assert!(requests[0].contains("apikey=test-key"));
    }

    #[tokio::test]
    async fn test_fetch_ratings_decode_error() {
        let server = MockServer::start(vec![MockRoute::json("/", "<html>oops</html>")]).await;
        let client = client_for(&server);

        let result = client.fetch_ratings("tt0133093").await;
        assert!(matches!(result, Err(ClientError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_fetch_ratings_api_error() {
        let body = r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#;
        let server = MockServer::start(vec![MockRoute::json("/", body)]).await;
        let client = client_for(&server);

        let result = client.fetch_ratings("tt0000000").await;
        assert!(matches!(result, Err(ClientError::Api { ref message, .. }) if message == "Incorrect IMDb ID."));
    }

    #[tokio::test]
    async fn test_fetch_ratings_http_status() {
        let server = MockServer::start(vec![MockRoute::status("/", 401)]).await;
        let client = client_for(&server);

        let result = client.fetch_ratings("tt0133093").await;
        assert!(matches!(result, Err(ClientError::Status { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_transport_error_when_server_is_gone() {
        let base_url = {
            let server = MockServer::start(vec![]).await;
            server.base_url.clone()
        };
        tokio::task::yield_now().await;

        let config = FetchConfig::new("test-key", "unused")
            .with_base_url(&base_url)
            .with_request_timeout(std::time::Duration::from_millis(500));
        let client = OmdbClient::new(&config).unwrap();

        let result = client.fetch_ratings("tt0133093").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_new_requires_key() {
        let result = OmdbClient::new(&FetchConfig::default());
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
