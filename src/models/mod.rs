pub mod catalog;
pub mod reminder;
pub mod watchlist;

pub use catalog::{
    CastMember, CatalogCard, ContentType, DiscoverFilters, EpisodeDetail, Genre, LastEpisode,
    MovieReleaseInfo, ProviderSummary, SearchHit, SeasonEpisode, SeasonSummary, TitleDetails,
    TrendingKind, WatchProvider,
};
pub use reminder::{NewReminder, OwnedReminder, ReminderRecord, ReminderUpdate};
pub use watchlist::{NewWatchlistEntry, WatchlistEntry};
