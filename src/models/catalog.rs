use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Lowest TMDB release type code that counts as an HD home release.
/// TMDB codes: 1 Premiere, 2 Theatrical (limited), 3 Theatrical,
/// 4 Digital, 5 Physical, 6 TV.
pub const RELEASE_TYPE_DIGITAL: i32 = 4;

/// Kind of catalog content a record refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl ContentType {
    /// Wire and storage representation ("movie" / "tv")
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Series => "tv",
        }
    }

    /// Parse the storage representation. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(ContentType::Movie),
            "tv" => Some(ContentType::Series),
            _ => None,
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scope of a trending listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendingKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
    #[serde(rename = "all")]
    All,
}

impl TrendingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingKind::Movie => "movie",
            TrendingKind::Series => "tv",
            TrendingKind::All => "all",
        }
    }
}

/// A (season, episode) position in a series.
///
/// Ordering is lexicographic: a later season outranks any episode number,
/// and within a season the episode number decides. A new episode has aired
/// exactly when the latest position compares greater than the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeasonEpisode {
    pub season: i32,
    pub episode: i32,
}

impl SeasonEpisode {
    pub fn new(season: i32, episode: i32) -> Self {
        Self { season, episode }
    }
}

/// US release information for a movie, reduced to the release type codes
/// the reminder sync needs to decide HD availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieReleaseInfo {
    pub us_release_types: Vec<i32>,
}

impl MovieReleaseInfo {
    /// True when any US release entry is Digital (4) or later.
    pub fn has_hd_release(&self) -> bool {
        self.us_release_types
            .iter()
            .any(|code| *code >= RELEASE_TYPE_DIGITAL)
    }
}

/// A genre as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Compact result used by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: i64,
    pub title: String,
    pub year: String,
    pub image: Option<String>,
    pub rating: String,
    #[serde(rename = "media_type")]
    pub kind: ContentType,
    pub overview: String,
}

/// Card-sized listing entry for trending and discover results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogCard {
    pub id: i64,
    pub title: String,
    pub year: String,
    pub rating: String,
    pub image: Option<String>,
    pub backdrop: Option<String>,
    pub description: Option<String>,
    pub kind: ContentType,
}

/// Filters accepted by the discover listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DiscoverFilters {
    pub genre: Option<String>,
    pub year: Option<String>,
    pub sort_by: Option<String>,
}

/// A streaming provider offering a title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchProvider {
    pub id: i64,
    pub name: String,
    pub logo: Option<String>,
}

/// Cast credit on a title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

/// Season entry on a series detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub id: i64,
    pub name: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub season_number: i32,
    pub episode_count: i32,
    pub air_date: Option<String>,
}

/// Episode entry on a season listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeDetail {
    pub id: i64,
    pub name: String,
    pub overview: String,
    pub still_path: Option<String>,
    pub episode_number: i32,
    pub air_date: Option<String>,
    pub runtime: Option<i32>,
}

/// Most recently aired episode of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastEpisode {
    pub season: i32,
    pub episode: i32,
    pub name: String,
}

/// Watch provider summary for a single title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub providers: Vec<WatchProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hd: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_episode: Option<LastEpisode>,
}

/// Full detail view for a movie or series. Movie-only and series-only
/// fields are optional and left empty for the other kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDetails {
    pub id: i64,
    pub title: String,
    pub year: String,
    pub rating: String,
    pub image: Option<String>,
    pub backdrop: Option<String>,
    pub description: Option<String>,
    pub kind: ContentType,
    pub genres: Vec<Genre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<i64>,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
    pub provider_link: Option<String>,
    pub providers: Vec<WatchProvider>,
    pub cast: Vec<CastMember>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hd: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_episode: Option<LastEpisode>,
}
