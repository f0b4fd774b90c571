use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogCard, ContentType, DiscoverFilters, Genre, ProviderSummary, SearchHit, TrendingKind},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    query: String,
}

/// Handler for multi search across movies and series
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<SearchHit>>> {
    if params.query.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }
    let hits = state.catalog.search(&params.query).await?;
    Ok(Json(hits))
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    #[serde(rename = "type")]
    kind: Option<TrendingKind>,
}

/// Handler for the trending listing. Without a `type` the mixed
/// movie-and-series feed is returned.
pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingQuery>,
) -> AppResult<Json<Vec<CatalogCard>>> {
    let kind = params.kind.unwrap_or(TrendingKind::All);
    let cards = state.catalog.trending(kind).await?;
    Ok(Json(cards))
}

#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    #[serde(rename = "type")]
    kind: ContentType,
    genre: Option<String>,
    year: Option<String>,
    sort_by: Option<String>,
}

/// Handler for filtered discovery listings
pub async fn discover(
    State(state): State<AppState>,
    Query(params): Query<DiscoverQuery>,
) -> AppResult<Json<Vec<CatalogCard>>> {
    let filters = DiscoverFilters {
        genre: params.genre,
        year: params.year,
        sort_by: params.sort_by,
    };
    let cards = state.catalog.discover(params.kind, filters).await?;
    Ok(Json(cards))
}

#[derive(Debug, Deserialize)]
pub struct GenresQuery {
    #[serde(rename = "type")]
    kind: ContentType,
}

/// Handler for the genre list of a content kind
pub async fn genres(
    State(state): State<AppState>,
    Query(params): Query<GenresQuery>,
) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.catalog.genres(params.kind).await?;
    Ok(Json(genres))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DetailsKind {
    Movie,
    Tv,
    Season,
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    #[serde(rename = "type")]
    kind: DetailsKind,
    id: i64,
    season: Option<i32>,
}

/// Handler for detail pages. Movie and series lookups return a full
/// title view; season lookups return the episode list and require the
/// `season` parameter.
pub async fn details(
    State(state): State<AppState>,
    Query(params): Query<DetailsQuery>,
) -> AppResult<Response> {
    match params.kind {
        DetailsKind::Movie => {
            let details = state.catalog.movie_details(params.id).await?;
            Ok(Json(details).into_response())
        }
        DetailsKind::Tv => {
            let details = state.catalog.tv_details(params.id).await?;
            Ok(Json(details).into_response())
        }
        DetailsKind::Season => {
            let season = params.season.ok_or_else(|| {
                AppError::InvalidInput("Season lookups require a season number".to_string())
            })?;
            let episodes = state.catalog.season_episodes(params.id, season).await?;
            Ok(Json(episodes).into_response())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProvidersQuery {
    id: i64,
    #[serde(rename = "type")]
    kind: ContentType,
}

/// Handler for the watch-provider summary of a title
pub async fn providers(
    State(state): State<AppState>,
    Query(params): Query<ProvidersQuery>,
) -> AppResult<Json<ProviderSummary>> {
    let summary = state.catalog.watch_providers(params.id, params.kind).await?;
    Ok(Json(summary))
}
