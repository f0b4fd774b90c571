//! Catalog gateway abstraction
//!
//! The reminder sync and the HTTP listing endpoints both read from a remote
//! media catalog. The gateway trait keeps that dependency behind a seam so
//! the sync engine can be exercised against scripted catalogs in tests.
//!
//! The two release-state reads used by the nightly sync bypass the cache:
//! a stale answer there would delay a notification by a full day.

use crate::{
    error::AppResult,
    models::{
        CatalogCard, ContentType, DiscoverFilters, EpisodeDetail, Genre, MovieReleaseInfo,
        ProviderSummary, SearchHit, SeasonEpisode, TitleDetails, TrendingKind,
    },
};

pub mod tmdb;

pub use tmdb::TmdbCatalog;

/// Read access to the media catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogGateway: Send + Sync {
    /// US release entries for a movie, fetched fresh on every call.
    async fn movie_release_info(&self, id: i64) -> AppResult<MovieReleaseInfo>;

    /// The most recently aired (season, episode) of a series, fetched fresh
    /// on every call. `None` when the catalog reports no aired episode yet.
    async fn series_latest_episode(&self, id: i64) -> AppResult<Option<SeasonEpisode>>;

    /// Mixed movie and series search.
    async fn search(&self, query: &str) -> AppResult<Vec<SearchHit>>;

    /// Trending listing for the given scope.
    async fn trending(&self, kind: TrendingKind) -> AppResult<Vec<CatalogCard>>;

    /// Filtered discovery listing.
    async fn discover(
        &self,
        kind: ContentType,
        filters: DiscoverFilters,
    ) -> AppResult<Vec<CatalogCard>>;

    /// Genre list for movies or series.
    async fn genres(&self, kind: ContentType) -> AppResult<Vec<Genre>>;

    /// Full detail view for a movie.
    async fn movie_details(&self, id: i64) -> AppResult<TitleDetails>;

    /// Full detail view for a series.
    async fn tv_details(&self, id: i64) -> AppResult<TitleDetails>;

    /// Episodes of one season of a series.
    async fn season_episodes(&self, id: i64, season_number: i32)
        -> AppResult<Vec<EpisodeDetail>>;

    /// Watch provider summary for a title.
    async fn watch_providers(&self, id: i64, kind: ContentType) -> AppResult<ProviderSummary>;
}
