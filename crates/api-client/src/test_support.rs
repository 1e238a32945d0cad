//! Mock HTTP server for client tests.
//!
//! An axum router bound to `127.0.0.1:0`. Every request is answered by the
//! first route whose path equals the request path and whose query pairs are
//! all present in the request; anything else gets a 404. The server records
//! each request target (path + query) it saw.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One canned response
#[derive(Debug, Clone)]
pub struct MockRoute {
    pub path: String,
    /// Query pairs the request must carry, e.g. `i=tt0133093`
    pub query: Vec<(String, String)>,
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub delay: Option<Duration>,
}

impl MockRoute {
    /// A 200 JSON response for `target` ("/path" or "/path?key=value").
    pub fn json(target: &str, body: &str) -> Self {
        Self::new(target, 200, "application/json", body.as_bytes())
    }

    pub fn bytes(target: &str, content_type: &'static str, body: &[u8]) -> Self {
        Self::new(target, 200, content_type, body)
    }

    pub fn status(target: &str, status: u16) -> Self {
        Self::new(target, status, "application/json", b"")
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn new(target: &str, status: u16, content_type: &'static str, body: &[u8]) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (key.to_string(), value.to_string())
            })
            .collect();
        Self {
            path: path.to_string(),
            query,
            status,
            content_type,
            body: body.to_vec(),
            delay: None,
        }
    }

    fn matches(&self, path: &str, query: &HashMap<String, String>) -> bool {
        self.path == path
            && self
                .query
                .iter()
                .all(|(key, value)| query.get(key) == Some(value))
    }
}

#[derive(Clone)]
struct MockState {
    routes: Arc<Vec<MockRoute>>,
    requests: Arc<Mutex<Vec<String>>>,
}

/// A running mock server
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Start a mock server on a random port
    pub async fn start(routes: Vec<MockRoute>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Failed to get local address");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            routes: Arc::new(routes),
            requests: requests.clone(),
        };
        let app = Router::new().fallback(respond).with_state(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock server failed");
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            handle,
        }
    }

    /// Request targets (path + query) received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(
    State(state): State<MockState>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    state.requests.lock().push(target);

    let Some(route) = state.routes.iter().find(|r| r.matches(uri.path(), &query)) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(delay) = route.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, route.content_type)],
        route.body.clone(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_matches_exact_path_only() {
        let route = MockRoute::json("/movie/13", "{}");
        let none = HashMap::new();

        assert!(route.matches("/movie/13", &none));
        assert!(!route.matches("/movie/130", &none));
        assert!(!route.matches("/movie/13/videos", &none));
    }

    #[test]
    fn test_route_query_pairs_must_be_present() {
        let route = MockRoute::json("/?i=tt0133093", "{}");
        let mut query = HashMap::new();
        query.insert("apikey".to_string(), "k".to_string());

        assert!(!route.matches("/", &query));
        query.insert("i".to_string(), "tt0133093".to_string());
        assert!(route.matches("/", &query));
    }

    #[tokio::test]
    async fn test_server_answers_exact_route_and_404s_the_rest() {
        let server = MockServer::start(vec![MockRoute::json("/movie/13", r#"{"id": 13}"#)]).await;
        let client = reqwest::Client::new();

        let found = client
            .get(format!("{}/movie/13", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(found.status(), 200);
        assert_eq!(found.text().await.unwrap(), r#"{"id": 13}"#);

        let other = client
            .get(format!("{}/movie/130?api_key=x", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(other.status(), 404);

        assert_eq!(server.requests(), vec!["/movie/13", "/movie/130?api_key=x"]);
    }
}
