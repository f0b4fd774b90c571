//! TMDB catalog gateway
//!
//! Talks to The Movie Database v3 API. Listing and detail lookups are cached
//! in Redis; the release-state reads used by the reminder sync go straight
//! to the API.
//!
//! API flow:
//! 1. Listings: /search/multi, /trending/{scope}/{window}, /discover/{kind}
//! 2. Details: /movie/{id} and /tv/{id} with append_to_response for
//!    providers, credits and release dates in a single round trip
//! 3. Release state: /movie/{id}?append_to_response=release_dates and the
//!    last_episode_to_air field of /tv/{id}

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        CastMember, CatalogCard, ContentType, DiscoverFilters, EpisodeDetail, Genre, LastEpisode,
        MovieReleaseInfo, ProviderSummary, SearchHit, SeasonEpisode, SeasonSummary, TitleDetails,
        TrendingKind, WatchProvider,
    },
    services::catalog::CatalogGateway,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::collections::HashMap;

const LISTING_CACHE_TTL: u64 = 3600; // 1 hour
const DETAIL_CACHE_TTL: u64 = 3600; // 1 hour
const GENRE_CACHE_TTL: u64 = 604800; // 1 week

const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

const MAX_SEARCH_RESULTS: usize = 8;
const FEATURED_COUNT: usize = 5;
const MAX_CAST_CREDITS: usize = 10;
const MAX_PROVIDER_BADGES: usize = 3;
const OVERVIEW_PREVIEW_CHARS: usize = 120;

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl TmdbCatalog {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
        }
    }

    /// GET a path under the API base URL and deserialize the JSON body.
    /// The api_key is always appended to the query string.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Catalog(format!(
                "TMDB API returned status {} for {}: {}",
                status, path, body
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::Catalog(format!("Failed to parse TMDB response for {}: {}", path, e))
        })
    }
}

#[async_trait::async_trait]
impl CatalogGateway for TmdbCatalog {
    async fn movie_release_info(&self, id: i64) -> AppResult<MovieReleaseInfo> {
        let detail: TmdbMovieReleases = self
            .get_json(
                &format!("/movie/{}", id),
                &[("append_to_response", "release_dates".to_string())],
            )
            .await?;

        Ok(MovieReleaseInfo {
            us_release_types: us_release_types(detail.release_dates.as_ref()),
        })
    }

    async fn series_latest_episode(&self, id: i64) -> AppResult<Option<SeasonEpisode>> {
        let detail: TmdbTvAiring = self.get_json(&format!("/tv/{}", id), &[]).await?;

        Ok(detail
            .last_episode_to_air
            .map(|ep| SeasonEpisode::new(ep.season_number, ep.episode_number)))
    }

    async fn search(&self, query: &str) -> AppResult<Vec<SearchHit>> {
        cached!(
            self.cache,
            CacheKey::Search(query.to_string()),
            LISTING_CACHE_TTL,
            async move {
                let page: TmdbResultsPage = self
                    .get_json(
                        "/search/multi",
                        &[
                            ("query", query.to_string()),
                            ("language", "en-US".to_string()),
                            ("page", "1".to_string()),
                            ("include_adult", "false".to_string()),
                        ],
                    )
                    .await?;

                let hits: Vec<SearchHit> = page
                    .results
                    .into_iter()
                    .filter_map(search_hit)
                    .take(MAX_SEARCH_RESULTS)
                    .collect();

                tracing::info!(query = %query, results = hits.len(), "Catalog search completed");

                Ok::<_, AppError>(hits)
            }
        )
    }

    async fn trending(&self, kind: TrendingKind) -> AppResult<Vec<CatalogCard>> {
        cached!(
            self.cache,
            CacheKey::Trending(kind),
            LISTING_CACHE_TTL,
            async move {
                // Weekly window for movies, daily for the rest
                let window = match kind {
                    TrendingKind::Movie => "week",
                    TrendingKind::Series | TrendingKind::All => "day",
                };

                let page: TmdbResultsPage = self
                    .get_json(
                        &format!("/trending/{}/{}", kind.as_str(), window),
                        &[("language", "en-US".to_string())],
                    )
                    .await?;

                let cards: Vec<CatalogCard> = match kind {
                    TrendingKind::Movie => page
                        .results
                        .into_iter()
                        .map(|entry| list_card(entry, ContentType::Movie))
                        .collect(),
                    TrendingKind::Series => page
                        .results
                        .into_iter()
                        .map(|entry| list_card(entry, ContentType::Series))
                        .collect(),
                    TrendingKind::All => page
                        .results
                        .into_iter()
                        .filter_map(featured_card)
                        .take(FEATURED_COUNT)
                        .collect(),
                };

                tracing::info!(kind = %kind.as_str(), results = cards.len(), "Trending listing fetched");

                Ok::<_, AppError>(cards)
            }
        )
    }

    async fn discover(
        &self,
        kind: ContentType,
        filters: DiscoverFilters,
    ) -> AppResult<Vec<CatalogCard>> {
        let sort_by = filters
            .sort_by
            .clone()
            .unwrap_or_else(|| "popularity.desc".to_string());
        let fingerprint = format!(
            "{}:{}:{}",
            filters.genre.as_deref().unwrap_or("any"),
            filters.year.as_deref().unwrap_or("any"),
            sort_by
        );
        let cache_key = CacheKey::Discover(kind, fingerprint);

        cached!(
            self.cache,
            cache_key,
            LISTING_CACHE_TTL,
            async move {
                let mut params: Vec<(&str, String)> = vec![
                    ("language", "en-US".to_string()),
                    ("page", "1".to_string()),
                    ("include_adult", "false".to_string()),
                    ("sort_by", sort_by),
                ];

                if let Some(genre) = &filters.genre {
                    params.push(("with_genres", genre.clone()));
                }

                match kind {
                    ContentType::Movie => {
                        params.push(("include_video", "false".to_string()));
                        if let Some(year) = &filters.year {
                            params.push(("primary_release_year", year.clone()));
                        }
                    }
                    ContentType::Series => {
                        params.push(("include_null_first_air_dates", "false".to_string()));
                        if let Some(year) = &filters.year {
                            params.push(("first_air_date_year", year.clone()));
                        }
                    }
                }

                let page: TmdbResultsPage = self
                    .get_json(&format!("/discover/{}", kind.as_str()), &params)
                    .await?;

                let cards: Vec<CatalogCard> = page
                    .results
                    .into_iter()
                    .map(|entry| list_card(entry, kind))
                    .collect();

                tracing::info!(kind = %kind, results = cards.len(), "Discover listing fetched");

                Ok::<_, AppError>(cards)
            }
        )
    }

    async fn genres(&self, kind: ContentType) -> AppResult<Vec<Genre>> {
        cached!(
            self.cache,
            CacheKey::Genres(kind),
            GENRE_CACHE_TTL,
            async move {
                let list: TmdbGenreList = self
                    .get_json(
                        &format!("/genre/{}/list", kind.as_str()),
                        &[("language", "en-US".to_string())],
                    )
                    .await?;

                Ok::<_, AppError>(list.genres)
            }
        )
    }

    async fn movie_details(&self, id: i64) -> AppResult<TitleDetails> {
        cached!(
            self.cache,
            CacheKey::Details(ContentType::Movie, id),
            DETAIL_CACHE_TTL,
            async move {
                let detail: TmdbMovieDetail = self
                    .get_json(
                        &format!("/movie/{}", id),
                        &[
                            ("language", "en-US".to_string()),
                            (
                                "append_to_response",
                                "watch/providers,credits,release_dates".to_string(),
                            ),
                        ],
                    )
                    .await?;

                Ok::<_, AppError>(movie_details_view(detail))
            }
        )
    }

    async fn tv_details(&self, id: i64) -> AppResult<TitleDetails> {
        cached!(
            self.cache,
            CacheKey::Details(ContentType::Series, id),
            DETAIL_CACHE_TTL,
            async move {
                let detail: TmdbTvDetail = self
                    .get_json(
                        &format!("/tv/{}", id),
                        &[
                            ("language", "en-US".to_string()),
                            ("append_to_response", "watch/providers,credits".to_string()),
                        ],
                    )
                    .await?;

                Ok::<_, AppError>(tv_details_view(detail))
            }
        )
    }

    async fn season_episodes(
        &self,
        id: i64,
        season_number: i32,
    ) -> AppResult<Vec<EpisodeDetail>> {
        cached!(
            self.cache,
            CacheKey::Season(id, season_number),
            DETAIL_CACHE_TTL,
            async move {
                let season: TmdbSeasonDetail = self
                    .get_json(
                        &format!("/tv/{}/season/{}", id, season_number),
                        &[("language", "en-US".to_string())],
                    )
                    .await?;

                let episodes: Vec<EpisodeDetail> =
                    season.episodes.into_iter().map(episode_view).collect();

                Ok::<_, AppError>(episodes)
            }
        )
    }

    async fn watch_providers(&self, id: i64, kind: ContentType) -> AppResult<ProviderSummary> {
        cached!(
            self.cache,
            CacheKey::Providers(kind, id),
            DETAIL_CACHE_TTL,
            async move {
                let summary = match kind {
                    ContentType::Movie => {
                        let detail: TmdbMovieDetail = self
                            .get_json(
                                &format!("/movie/{}", id),
                                &[(
                                    "append_to_response",
                                    "watch/providers,release_dates".to_string(),
                                )],
                            )
                            .await?;

                        let (_, providers) = us_provider_view(detail.watch_providers.as_ref());
                        ProviderSummary {
                            providers: providers.into_iter().take(MAX_PROVIDER_BADGES).collect(),
                            is_hd: Some(
                                MovieReleaseInfo {
                                    us_release_types: us_release_types(
                                        detail.release_dates.as_ref(),
                                    ),
                                }
                                .has_hd_release(),
                            ),
                            last_episode: None,
                        }
                    }
                    ContentType::Series => {
                        let detail: TmdbTvDetail = self
                            .get_json(
                                &format!("/tv/{}", id),
                                &[("append_to_response", "watch/providers".to_string())],
                            )
                            .await?;

                        let (_, providers) = us_provider_view(detail.watch_providers.as_ref());
                        ProviderSummary {
                            providers: providers.into_iter().take(MAX_PROVIDER_BADGES).collect(),
                            is_hd: None,
                            last_episode: detail.last_episode_to_air.map(last_episode_view),
                        }
                    }
                };

                Ok::<_, AppError>(summary)
            }
        )
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbResultsPage {
    #[serde(default)]
    results: Vec<TmdbListEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct TmdbListEntry {
    id: i64,
    #[serde(default)]
    media_type: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    first_air_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    backdrop_path: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetail {
    id: i64,
    title: String,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    runtime: Option<i32>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    budget: Option<i64>,
    #[serde(default)]
    revenue: Option<i64>,
    #[serde(default, rename = "watch/providers")]
    watch_providers: Option<TmdbProvidersEnvelope>,
    #[serde(default)]
    credits: Option<TmdbCredits>,
    #[serde(default)]
    release_dates: Option<TmdbReleaseDatesEnvelope>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvDetail {
    id: i64,
    name: String,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    first_air_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    backdrop_path: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    tagline: Option<String>,
    #[serde(default)]
    seasons: Vec<TmdbSeasonSummary>,
    #[serde(default)]
    last_episode_to_air: Option<TmdbEpisodeStamp>,
    #[serde(default, rename = "watch/providers")]
    watch_providers: Option<TmdbProvidersEnvelope>,
    #[serde(default)]
    credits: Option<TmdbCredits>,
}

/// Minimal shape for the fresh movie release-state read
#[derive(Debug, Deserialize)]
struct TmdbMovieReleases {
    #[serde(default)]
    release_dates: Option<TmdbReleaseDatesEnvelope>,
}

/// Minimal shape for the fresh series release-state read
#[derive(Debug, Deserialize)]
struct TmdbTvAiring {
    #[serde(default)]
    last_episode_to_air: Option<TmdbEpisodeStamp>,
}

#[derive(Debug, Deserialize)]
struct TmdbEpisodeStamp {
    season_number: i32,
    episode_number: i32,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbReleaseDatesEnvelope {
    #[serde(default)]
    results: Vec<TmdbCountryReleases>,
}

#[derive(Debug, Deserialize)]
struct TmdbCountryReleases {
    iso_3166_1: String,
    #[serde(default)]
    release_dates: Vec<TmdbReleaseStamp>,
}

#[derive(Debug, Deserialize)]
struct TmdbReleaseStamp {
    #[serde(rename = "type")]
    type_code: i32,
}

#[derive(Debug, Deserialize)]
struct TmdbProvidersEnvelope {
    #[serde(default)]
    results: HashMap<String, TmdbCountryProviders>,
}

#[derive(Debug, Deserialize)]
struct TmdbCountryProviders {
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    flatrate: Vec<TmdbProviderEntry>,
}

#[derive(Debug, Deserialize)]
struct TmdbProviderEntry {
    provider_id: i64,
    provider_name: String,
    #[serde(default)]
    logo_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbCredits {
    #[serde(default)]
    cast: Vec<TmdbCastEntry>,
}

#[derive(Debug, Deserialize)]
struct TmdbCastEntry {
    id: i64,
    name: String,
    #[serde(default)]
    character: String,
    #[serde(default)]
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbSeasonSummary {
    id: i64,
    name: String,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    poster_path: Option<String>,
    season_number: i32,
    #[serde(default)]
    episode_count: i32,
    #[serde(default)]
    air_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbSeasonDetail {
    #[serde(default)]
    episodes: Vec<TmdbEpisodeEntry>,
}

#[derive(Debug, Deserialize)]
struct TmdbEpisodeEntry {
    id: i64,
    name: String,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    still_path: Option<String>,
    episode_number: i32,
    #[serde(default)]
    air_date: Option<String>,
    #[serde(default)]
    runtime: Option<i32>,
}

// ============================================================================
// Mapping helpers
// ============================================================================

fn image_url(path: &Option<String>, size: &str) -> Option<String> {
    path.as_ref()
        .map(|p| format!("{}/{}{}", IMAGE_BASE_URL, size, p))
}

/// Year component of a catalog date string ("2024-05-17" -> "2024")
fn year_of(date: Option<&str>, fallback: &str) -> String {
    date.and_then(|d| d.split('-').next())
        .filter(|year| !year.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| fallback.to_string())
}

fn rating_of(vote_average: Option<f64>) -> String {
    format!("{:.1}", vote_average.unwrap_or(0.0))
}

fn truncate_chars(text: String, limit: usize) -> String {
    if text.chars().count() <= limit {
        text
    } else {
        text.chars().take(limit).collect()
    }
}

/// Release type codes of every US entry in a release_dates envelope
fn us_release_types(envelope: Option<&TmdbReleaseDatesEnvelope>) -> Vec<i32> {
    envelope
        .into_iter()
        .flat_map(|e| e.results.iter())
        .find(|country| country.iso_3166_1 == "US")
        .map(|country| {
            country
                .release_dates
                .iter()
                .map(|entry| entry.type_code)
                .collect()
        })
        .unwrap_or_default()
}

/// Map a multi-search entry. People and other non-title results are dropped.
fn search_hit(entry: TmdbListEntry) -> Option<SearchHit> {
    let kind = match entry.media_type.as_deref() {
        Some("movie") => ContentType::Movie,
        Some("tv") => ContentType::Series,
        _ => return None,
    };

    Some(SearchHit {
        id: entry.id,
        title: entry.title.or(entry.name).unwrap_or_default(),
        year: year_of(
            entry
                .release_date
                .as_deref()
                .or(entry.first_air_date.as_deref()),
            "",
        ),
        image: image_url(&entry.poster_path, "w92"),
        rating: rating_of(entry.vote_average),
        kind,
        overview: truncate_chars(entry.overview.unwrap_or_default(), OVERVIEW_PREVIEW_CHARS),
    })
}

/// Map a trending or discover entry whose kind is fixed by the request path
fn list_card(entry: TmdbListEntry, kind: ContentType) -> CatalogCard {
    let (title, date) = match kind {
        ContentType::Movie => (entry.title, entry.release_date),
        ContentType::Series => (entry.name, entry.first_air_date),
    };

    CatalogCard {
        id: entry.id,
        title: title.unwrap_or_default(),
        year: year_of(date.as_deref(), "N/A"),
        rating: rating_of(entry.vote_average),
        image: image_url(&entry.poster_path, "w500"),
        backdrop: image_url(&entry.backdrop_path, "w780"),
        description: entry.overview,
        kind,
    }
}

/// Map a mixed trending entry for the featured carousel. The carousel renders
/// the full-width backdrop as its primary image.
fn featured_card(entry: TmdbListEntry) -> Option<CatalogCard> {
    let kind = match entry.media_type.as_deref() {
        Some("movie") => ContentType::Movie,
        Some("tv") => ContentType::Series,
        _ => return None,
    };

    Some(CatalogCard {
        id: entry.id,
        title: entry.title.or(entry.name).unwrap_or_default(),
        year: year_of(
            entry
                .release_date
                .as_deref()
                .or(entry.first_air_date.as_deref()),
            "N/A",
        ),
        rating: rating_of(entry.vote_average),
        image: image_url(&entry.backdrop_path, "original"),
        backdrop: image_url(&entry.backdrop_path, "original"),
        description: entry.overview,
        kind,
    })
}

/// US provider link plus the flatrate entries
fn us_provider_view(
    envelope: Option<&TmdbProvidersEnvelope>,
) -> (Option<String>, Vec<WatchProvider>) {
    let Some(us) = envelope.and_then(|p| p.results.get("US")) else {
        return (None, Vec::new());
    };

    let providers = us.flatrate.iter().map(provider_view).collect();
    (us.link.clone(), providers)
}

fn provider_view(entry: &TmdbProviderEntry) -> WatchProvider {
    WatchProvider {
        id: entry.provider_id,
        name: entry.provider_name.clone(),
        logo: image_url(&entry.logo_path, "original"),
    }
}

fn cast_view(entry: TmdbCastEntry) -> CastMember {
    CastMember {
        id: entry.id,
        name: entry.name,
        character: entry.character,
        profile_path: image_url(&entry.profile_path, "w200"),
    }
}

fn last_episode_view(ep: TmdbEpisodeStamp) -> LastEpisode {
    LastEpisode {
        season: ep.season_number,
        episode: ep.episode_number,
        name: ep.name,
    }
}

fn season_view(season: TmdbSeasonSummary) -> SeasonSummary {
    SeasonSummary {
        id: season.id,
        name: season.name,
        overview: season.overview,
        poster_path: image_url(&season.poster_path, "w500"),
        season_number: season.season_number,
        episode_count: season.episode_count,
        air_date: season.air_date,
    }
}

fn episode_view(episode: TmdbEpisodeEntry) -> EpisodeDetail {
    EpisodeDetail {
        id: episode.id,
        name: episode.name,
        overview: episode.overview,
        still_path: image_url(&episode.still_path, "w300"),
        episode_number: episode.episode_number,
        air_date: episode.air_date,
        runtime: episode.runtime,
    }
}

fn movie_details_view(detail: TmdbMovieDetail) -> TitleDetails {
    let (provider_link, providers) = us_provider_view(detail.watch_providers.as_ref());
    let is_hd = MovieReleaseInfo {
        us_release_types: us_release_types(detail.release_dates.as_ref()),
    }
    .has_hd_release();
    let cast = detail
        .credits
        .map(|credits| {
            credits
                .cast
                .into_iter()
                .take(MAX_CAST_CREDITS)
                .map(cast_view)
                .collect()
        })
        .unwrap_or_default();

    TitleDetails {
        id: detail.id,
        title: detail.title,
        year: year_of(detail.release_date.as_deref(), "N/A"),
        rating: format!("{:.1}", detail.vote_average),
        image: image_url(&detail.poster_path, "w500"),
        backdrop: image_url(&detail.backdrop_path, "original"),
        description: detail.overview,
        kind: ContentType::Movie,
        genres: detail.genres,
        runtime: detail.runtime,
        status: detail.status,
        tagline: None,
        budget: detail.budget,
        revenue: detail.revenue,
        seasons: Vec::new(),
        provider_link,
        providers,
        cast,
        is_hd: Some(is_hd),
        last_episode: None,
    }
}

fn tv_details_view(detail: TmdbTvDetail) -> TitleDetails {
    let (provider_link, providers) = us_provider_view(detail.watch_providers.as_ref());
    let cast = detail
        .credits
        .map(|credits| {
            credits
                .cast
                .into_iter()
                .take(MAX_CAST_CREDITS)
                .map(cast_view)
                .collect()
        })
        .unwrap_or_default();

    TitleDetails {
        id: detail.id,
        title: detail.name,
        year: year_of(detail.first_air_date.as_deref(), "N/A"),
        rating: format!("{:.1}", detail.vote_average),
        image: image_url(&detail.poster_path, "w500"),
        backdrop: image_url(&detail.backdrop_path, "original"),
        description: detail.overview,
        kind: ContentType::Series,
        genres: detail.genres,
        runtime: None,
        status: detail.status,
        tagline: detail.tagline,
        budget: None,
        revenue: None,
        seasons: detail.seasons.into_iter().map(season_view).collect(),
        provider_link,
        providers,
        cast,
        is_hd: None,
        last_episode: detail.last_episode_to_air.map(last_episode_view),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_entry(media_type: Option<&str>) -> TmdbListEntry {
        TmdbListEntry {
            id: 550,
            media_type: media_type.map(str::to_owned),
            title: Some("Fight Club".to_string()),
            name: None,
            release_date: Some("1999-10-15".to_string()),
            first_air_date: None,
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: Some("/backdrop.jpg".to_string()),
            overview: Some("An insomniac office worker.".to_string()),
            vote_average: Some(8.43),
        }
    }

    #[test]
    fn test_image_url_joins_size_and_path() {
        assert_eq!(
            image_url(&Some("/abc.jpg".to_string()), "w500"),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg".to_string())
        );
        assert_eq!(image_url(&None, "w500"), None);
    }

    #[test]
    fn test_year_of_takes_leading_component() {
        assert_eq!(year_of(Some("2024-05-17"), "N/A"), "2024");
        assert_eq!(year_of(Some(""), "N/A"), "N/A");
        assert_eq!(year_of(None, "N/A"), "N/A");
        assert_eq!(year_of(None, ""), "");
    }

    #[test]
    fn test_rating_formats_one_decimal() {
        assert_eq!(rating_of(Some(8.43)), "8.4");
        assert_eq!(rating_of(None), "0.0");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte_boundaries() {
        let text = "é".repeat(200);
        let truncated = truncate_chars(text, OVERVIEW_PREVIEW_CHARS);
        assert_eq!(truncated.chars().count(), OVERVIEW_PREVIEW_CHARS);

        let short = truncate_chars("short".to_string(), OVERVIEW_PREVIEW_CHARS);
        assert_eq!(short, "short");
    }

    #[test]
    fn test_us_release_types_ignores_other_countries() {
        let json = r#"{
            "results": [
                { "iso_3166_1": "FR", "release_dates": [{ "type": 4 }] },
                { "iso_3166_1": "US", "release_dates": [{ "type": 1 }, { "type": 3 }] }
            ]
        }"#;
        let envelope: TmdbReleaseDatesEnvelope = serde_json::from_str(json).unwrap();

        assert_eq!(us_release_types(Some(&envelope)), vec![1, 3]);
        assert_eq!(us_release_types(None), Vec::<i32>::new());
    }

    #[test]
    fn test_search_hit_drops_person_entries() {
        assert!(search_hit(list_entry(Some("person"))).is_none());
        assert!(search_hit(list_entry(None)).is_none());
    }

    #[test]
    fn test_search_hit_maps_movie_fields() {
        let hit = search_hit(list_entry(Some("movie"))).unwrap();
        assert_eq!(hit.id, 550);
        assert_eq!(hit.title, "Fight Club");
        assert_eq!(hit.year, "1999");
        assert_eq!(hit.rating, "8.4");
        assert_eq!(hit.kind, ContentType::Movie);
        assert_eq!(
            hit.image,
            Some("https://image.tmdb.org/t/p/w92/poster.jpg".to_string())
        );
    }

    #[test]
    fn test_list_card_reads_series_fields() {
        let entry = TmdbListEntry {
            id: 1399,
            media_type: None,
            title: None,
            name: Some("Game of Thrones".to_string()),
            release_date: None,
            first_air_date: Some("2011-04-17".to_string()),
            poster_path: None,
            backdrop_path: None,
            overview: None,
            vote_average: None,
        };

        let card = list_card(entry, ContentType::Series);
        assert_eq!(card.title, "Game of Thrones");
        assert_eq!(card.year, "2011");
        assert_eq!(card.rating, "0.0");
        assert_eq!(card.kind, ContentType::Series);
        assert_eq!(card.image, None);
    }

    #[test]
    fn test_featured_card_uses_backdrop_as_image() {
        let card = featured_card(list_entry(Some("movie"))).unwrap();
        assert_eq!(
            card.image,
            Some("https://image.tmdb.org/t/p/original/backdrop.jpg".to_string())
        );
        assert_eq!(card.image, card.backdrop);
    }

    #[test]
    fn test_episode_stamp_deserialization() {
        let json = r#"{
            "last_episode_to_air": {
                "season_number": 2,
                "episode_number": 6,
                "name": "The Red Door"
            }
        }"#;
        let airing: TmdbTvAiring = serde_json::from_str(json).unwrap();
        let stamp = airing.last_episode_to_air.unwrap();

        assert_eq!(stamp.season_number, 2);
        assert_eq!(stamp.episode_number, 6);
        assert_eq!(stamp.name, "The Red Door");
    }

    #[test]
    fn test_tv_airing_tolerates_missing_episode() {
        let airing: TmdbTvAiring = serde_json::from_str("{}").unwrap();
        assert!(airing.last_episode_to_air.is_none());
    }

    #[test]
    fn test_movie_details_view_assembles_appended_data() {
        let json = r#"{
            "id": 550,
            "title": "Fight Club",
            "overview": "An insomniac office worker.",
            "release_date": "1999-10-15",
            "poster_path": "/poster.jpg",
            "backdrop_path": "/backdrop.jpg",
            "vote_average": 8.43,
            "genres": [{ "id": 18, "name": "Drama" }],
            "runtime": 139,
            "status": "Released",
            "budget": 63000000,
            "revenue": 100853753,
            "watch/providers": {
                "results": {
                    "US": {
                        "link": "https://www.themoviedb.org/movie/550/watch",
                        "flatrate": [
                            { "provider_id": 8, "provider_name": "Netflix", "logo_path": "/n.jpg" }
                        ]
                    },
                    "FR": {
                        "link": "https://example.test",
                        "flatrate": [
                            { "provider_id": 99, "provider_name": "Canal+", "logo_path": null }
                        ]
                    }
                }
            },
            "credits": {
                "cast": [
                    { "id": 819, "name": "Edward Norton", "character": "The Narrator", "profile_path": "/e.jpg" }
                ]
            },
            "release_dates": {
                "results": [
                    { "iso_3166_1": "US", "release_dates": [{ "type": 3 }, { "type": 4 }] }
                ]
            }
        }"#;
        let detail: TmdbMovieDetail = serde_json::from_str(json).unwrap();
        let view = movie_details_view(detail);

        assert_eq!(view.title, "Fight Club");
        assert_eq!(view.year, "1999");
        assert_eq!(view.kind, ContentType::Movie);
        assert_eq!(view.is_hd, Some(true));
        assert_eq!(view.runtime, Some(139));
        assert_eq!(view.genres.len(), 1);
        assert_eq!(view.providers.len(), 1);
        assert_eq!(view.providers[0].name, "Netflix");
        assert_eq!(
            view.provider_link,
            Some("https://www.themoviedb.org/movie/550/watch".to_string())
        );
        assert_eq!(view.cast.len(), 1);
        assert_eq!(view.cast[0].character, "The Narrator");
        assert!(view.seasons.is_empty());
        assert_eq!(view.last_episode, None);
    }

    #[test]
    fn test_tv_details_view_carries_seasons_and_last_episode() {
        let json = r#"{
            "id": 1399,
            "name": "Game of Thrones",
            "first_air_date": "2011-04-17",
            "vote_average": 8.456,
            "status": "Ended",
            "tagline": "Winter is coming.",
            "seasons": [
                {
                    "id": 3624,
                    "name": "Season 1",
                    "overview": "Lords of the great houses.",
                    "poster_path": "/s1.jpg",
                    "season_number": 1,
                    "episode_count": 10,
                    "air_date": "2011-04-17"
                }
            ],
            "last_episode_to_air": {
                "season_number": 8,
                "episode_number": 6,
                "name": "The Iron Throne"
            }
        }"#;
        let detail: TmdbTvDetail = serde_json::from_str(json).unwrap();
        let view = tv_details_view(detail);

        assert_eq!(view.kind, ContentType::Series);
        assert_eq!(view.year, "2011");
        assert_eq!(view.tagline, Some("Winter is coming.".to_string()));
        assert_eq!(view.seasons.len(), 1);
        assert_eq!(view.seasons[0].episode_count, 10);
        assert_eq!(
            view.seasons[0].poster_path,
            Some("https://image.tmdb.org/t/p/w500/s1.jpg".to_string())
        );
        let last = view.last_episode.unwrap();
        assert_eq!((last.season, last.episode), (8, 6));
        assert_eq!(last.name, "The Iron Throne");
        assert_eq!(view.is_hd, None);
        assert_eq!(view.runtime, None);
    }

    #[test]
    fn test_us_provider_view_missing_region() {
        let json = r#"{ "results": { "DE": { "link": null, "flatrate": [] } } }"#;
        let envelope: TmdbProvidersEnvelope = serde_json::from_str(json).unwrap();

        let (link, providers) = us_provider_view(Some(&envelope));
        assert_eq!(link, None);
        assert!(providers.is_empty());
    }
}
