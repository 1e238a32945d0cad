//! Core domain types for the movie catalog.
//!
//! This module defines the records that the enrichment pipeline loads,
//! mutates and prunes:
//! - `CatalogEntry`: one persisted movie
//! - `Trailer`: video metadata attached by the catalog client
//! - `ExternalRatings`: the external-identifier link plus fetched ratings
//! - `RatingsApiResponse`: the transient payload of the ratings API
//!
//! Ownership model: a `CatalogEntry` owns its `Trailer` and `ExternalRatings`
//! directly (`Option<T>` fields), so attaching or dropping an entry never
//! leaves a dangling child record behind.

use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Placeholder the ratings API returns when a movie has no IMDb rating.
pub const NOT_AVAILABLE: &str = "N/A";

/// `Source` label of the Rotten Tomatoes score in the ratings payload.
pub const ROTTEN_TOMATOES_SOURCE: &str = "Rotten Tomatoes";

/// Numeric identifier used by the remote movie catalog (TMDB)
pub type CatalogId = u64;

// =============================================================================
// Catalog Entry
// =============================================================================

/// Represents one movie in the local catalog.
///
/// The `id` doubles as the remote catalog identifier, which is why it is a
/// string that usually holds a number (e.g. `"603"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable key of the record
    pub id: String,

    /// Category tag used to select batches (e.g. "popular", "upcoming")
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Relative poster path on the image CDN (e.g. "/abc.jpg")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer: Option<Trailer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings: Option<ExternalRatings>,
}

impl CatalogEntry {
    /// Create a bare entry with no enrichment attached.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            title: None,
            poster_path: None,
            trailer: None,
            ratings: None,
        }
    }

    /// Builder-style title setter, mostly handy in tests and fixtures.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The id interpreted as a remote catalog identifier.
    ///
    /// Returns `None` for ids that are not plain numbers; such entries cannot
    /// be looked up remotely.
    pub fn catalog_id(&self) -> Option<CatalogId> {
        self.id.trim().parse().ok()
    }

    /// Attach trailer data, replacing any previous trailer.
    pub fn attach_trailer(&mut self, trailer: Trailer) {
        self.trailer = Some(trailer);
    }

    /// Attach the external ratings link, replacing any previous one.
    pub fn attach_ratings(&mut self, ratings: ExternalRatings) {
        self.ratings = Some(ratings);
    }
}

// =============================================================================
// Trailer
// =============================================================================

/// Video metadata for a movie, as returned by the catalog client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailer {
    /// Id of the owning `CatalogEntry`
    pub id: String,
    /// Video key on the hosting site
    pub key: String,
    pub name: String,
    /// Hosting site, e.g. "YouTube"
    pub site: String,
    /// Video category, e.g. "Trailer" or "Teaser"
    pub kind: String,
}

impl Trailer {
    /// Public watch URL, when the hosting site is known.
    pub fn watch_url(&self) -> Option<String> {
        match self.site.as_str() {
            "YouTube" => Some(format!("https://www.youtube.com/watch?v={}", self.key)),
            "Vimeo" => Some(format!("https://vimeo.com/{}", self.key)),
            _ => None,
        }
    }
}

// =============================================================================
// External Ratings
// =============================================================================

/// Link between a catalog entry and the ratings database, plus the ratings
/// fetched through it.
///
/// Created as soon as the external identifier is known; the rating fields
/// stay empty until the ratings response arrives and `apply` is called.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRatings {
    /// Id of the owning `CatalogEntry`
    pub id: String,
    /// External identifier (IMDb id, e.g. "tt0133093") used as the ratings-API key
    pub path: String,
    /// Empty or "N/A" means absent
    #[serde(default)]
    pub imdb_rating: String,
    /// Empty means absent
    #[serde(default)]
    pub rotten_tomatoes_score: String,
}

impl ExternalRatings {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Copy the fetched rating values into this record.
    pub fn apply(&mut self, response: &RatingsApiResponse) {
        self.imdb_rating = response.imdb_rating.clone();
        self.rotten_tomatoes_score = response.rotten_tomatoes_score();
    }

    /// IMDb rating, unless empty or the "N/A" placeholder.
    pub fn imdb_rating(&self) -> Option<&str> {
        let rating = self.imdb_rating.as_str();
        if rating.is_empty() || rating == NOT_AVAILABLE {
            None
        } else {
            Some(rating)
        }
    }

    /// Rotten Tomatoes score, unless empty.
    pub fn rotten_tomatoes_score(&self) -> Option<&str> {
        let score = self.rotten_tomatoes_score.as_str();
        (!score.is_empty()).then_some(score)
    }

    /// True when both rating values are present.
    ///
    /// An entry whose fetched ratings fail this check is deleted from the store.
    pub fn has_quality_ratings(&self) -> bool {
        self.imdb_rating().is_some() && self.rotten_tomatoes_score().is_some()
    }
}

// =============================================================================
// Ratings API payload
// =============================================================================

/// One `{ "Source", "Value" }` pair of the ratings payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSource {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Decoded body of a ratings API call.
///
/// Only the fields the pipeline reads are modelled; everything else in the
/// payload is ignored by serde.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingsApiResponse {
    #[serde(rename = "imdbID", default)]
    pub id: String,

    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,

    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<RatingSource>,

    /// "True" or "False"; the API reports lookup failures in-band
    #[serde(rename = "Response", default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RatingsApiResponse {
    /// Rotten Tomatoes score from the `Ratings` list, or an empty string.
    pub fn rotten_tomatoes_score(&self) -> String {
        self.ratings
            .iter()
            .find(|r| r.source == ROTTEN_TOMATOES_SOURCE)
            .map(|r| r.value.clone())
            .unwrap_or_default()
    }

    /// The error message when the API answered `"Response": "False"`.
    pub fn api_error(&self) -> Option<&str> {
        match self.response.as_deref() {
            Some(r) if r.eq_ignore_ascii_case("false") => {
                Some(self.error.as_deref().unwrap_or("unknown ratings API error"))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(imdb: &str, rt: Option<&str>) -> RatingsApiResponse {
        RatingsApiResponse {
            id: "tt1234567".to_string(),
            imdb_rating: imdb.to_string(),
            ratings: rt
                .map(|v| {
                    vec![RatingSource {
                        source: ROTTEN_TOMATOES_SOURCE.to_string(),
                        value: v.to_string(),
                    }]
                })
                .unwrap_or_default(),
            ..RatingsApiResponse::default()
        }
    }

    #[test]
    fn test_catalog_id_parsing() {
        assert_eq!(CatalogEntry::new("603", "popular").catalog_id(), Some(603));
        assert_eq!(CatalogEntry::new("abc", "popular").catalog_id(), None);
        assert_eq!(CatalogEntry::new("", "popular").catalog_id(), None);
    }

    #[test]
    fn test_apply_copies_exact_values() {
        let mut ratings = ExternalRatings::new("603", "tt1234567");
        ratings.apply(&response("8.1", Some("90%")));

        assert_eq!(ratings.imdb_rating, "8.1");
        assert_eq!(ratings.rotten_tomatoes_score, "90%");
        assert!(ratings.has_quality_ratings());
    }

    #[test]
    fn test_placeholder_and_empty_ratings_fail_quality() {
        let mut ratings = ExternalRatings::new("1", "tt1");

        ratings.apply(&response("N/A", Some("88%")));
        assert!(!ratings.has_quality_ratings());

        ratings.apply(&response("", Some("88%")));
        assert!(!ratings.has_quality_ratings());

        ratings.apply(&response("7.4", None));
        assert!(!ratings.has_quality_ratings());
    }

    #[test]
    fn test_whitespace_ratings_count_as_present() {
        let mut ratings = ExternalRatings::new("1", "tt1");
        ratings.apply(&response("7.4", Some(" ")));

        assert_eq!(ratings.rotten_tomatoes_score(), Some(" "));
        assert!(ratings.has_quality_ratings());
    }

    #[test]
    fn test_decode_ratings_payload() {
        let body = r#"{
            "Title": "The Matrix",
            "imdbRating": "8.7",
            "imdbID": "tt0133093",
            "Ratings": [
                {"Source": "Internet Movie Database", "Value": "8.7/10"},
                {"Source": "Rotten Tomatoes", "Value": "83%"}
            ],
            "Response": "True"
        }"#;

        let decoded: RatingsApiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.id, "tt0133093");
        assert_eq!(decoded.imdb_rating, "8.7");
        assert_eq!(decoded.rotten_tomatoes_score(), "83%");
        assert_eq!(decoded.api_error(), None);
    }

    #[test]
    fn test_api_error_payload() {
        let body = r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#;
        let decoded: RatingsApiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.api_error(), Some("Incorrect IMDb ID."));
    }

    #[test]
    fn test_trailer_watch_url() {
        let trailer = Trailer {
            id: "603".to_string(),
            key: "vKQi3bBA1y8".to_string(),
            name: "Official Trailer".to_string(),
            site: "YouTube".to_string(),
            kind: "Trailer".to_string(),
        };
        assert_eq!(
            trailer.watch_url().as_deref(),
            Some("https://www.youtube.com/watch?v=vKQi3bBA1y8")
        );
    }
}
