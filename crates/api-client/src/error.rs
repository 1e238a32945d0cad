//! Errors that can occur when talking to the remote APIs.

use thiserror::Error;

/// Errors raised by the catalog, ratings and poster clients.
///
/// Callers in the enrichment pipeline never propagate these; they log them
/// and treat the result as absent.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network failure, TLS failure, or the client-side timeout fired
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body was not the JSON we expected
    #[error("Invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The ratings API reported a lookup failure in its payload
    #[error("Ratings API error for {id}: {message}")]
    Api { id: String, message: String },

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
