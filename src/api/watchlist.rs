use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{NewWatchlistEntry, WatchlistEntry},
};

use super::AppState;

/// List a user's watchlist, newest first
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<WatchlistEntry>>> {
    let entries = state.watchlist.list(&user_id).await?;
    Ok(Json(entries))
}

/// Add a title to a user's watchlist, replacing any existing snapshot
pub async fn add(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(entry): Json<NewWatchlistEntry>,
) -> AppResult<(StatusCode, Json<WatchlistEntry>)> {
    let stored = state.watchlist.add(&user_id, entry).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Fetch a single watchlist entry
pub async fn get_entry(
    State(state): State<AppState>,
    Path((user_id, content_id)): Path<(String, i64)>,
) -> AppResult<Json<WatchlistEntry>> {
    let entry = state
        .watchlist
        .get(&user_id, content_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No watchlist entry for content {}", content_id))
        })?;
    Ok(Json(entry))
}

/// Remove a watchlist entry
pub async fn remove(
    State(state): State<AppState>,
    Path((user_id, content_id)): Path<(String, i64)>,
) -> AppResult<StatusCode> {
    let removed = state.watchlist.remove(&user_id, content_id).await?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "No watchlist entry for content {}",
            content_id
        )))
    }
}
