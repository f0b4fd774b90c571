use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::ContentType;

/// A saved watchlist entry. Catalog metadata is snapshotted at add time so
/// the list renders without further catalog calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub content_id: i64,
    pub kind: ContentType,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub added_at: DateTime<Utc>,
}

/// Payload for adding a title to the watchlist
#[derive(Debug, Clone, Deserialize)]
pub struct NewWatchlistEntry {
    pub content_id: i64,
    pub kind: ContentType,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}
