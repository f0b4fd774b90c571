//! Persistence layer: PostgreSQL stores for user data and the Redis cache
//! for catalog lookups.

use crate::{
    error::AppResult,
    models::{
        NewReminder, NewWatchlistEntry, OwnedReminder, ReminderRecord, ReminderUpdate,
        WatchlistEntry,
    },
};

pub mod postgres;
pub mod redis;

pub use postgres::create_pool;
pub use postgres::PgReminderStore;
pub use postgres::PgWatchlistStore;
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;

/// Store for release reminders
///
/// Reminders are keyed by (owning user, content id). The nightly sync scans
/// the whole table with `list_all` and applies one-way transitions with
/// `apply`; the HTTP handlers use the per-user operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReminderStore: Send + Sync {
    /// Every reminder across all users, in a stable order.
    async fn list_all(&self) -> AppResult<Vec<OwnedReminder>>;

    /// All reminders owned by one user.
    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<ReminderRecord>>;

    /// A single reminder, if present.
    async fn get(&self, user_id: &str, content_id: i64) -> AppResult<Option<ReminderRecord>>;

    /// Create a reminder, or replace it wholesale if one already exists
    /// for the same (user, content) pair.
    async fn upsert(&self, user_id: &str, reminder: NewReminder) -> AppResult<ReminderRecord>;

    /// Apply a sync transition to an existing record and stamp `updated_at`.
    ///
    /// Fails with `NotFound` when the record disappeared between the scan
    /// and the write.
    async fn apply(
        &self,
        user_id: &str,
        content_id: i64,
        update: ReminderUpdate,
    ) -> AppResult<()>;

    /// Delete a reminder. Returns whether a record existed.
    async fn delete(&self, user_id: &str, content_id: i64) -> AppResult<bool>;
}

/// Store for per-user watchlists
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchlistStore: Send + Sync {
    /// All watchlist entries for a user, newest first.
    async fn list(&self, user_id: &str) -> AppResult<Vec<WatchlistEntry>>;

    /// A single entry, if present.
    async fn get(&self, user_id: &str, content_id: i64) -> AppResult<Option<WatchlistEntry>>;

    /// Add an entry, replacing any existing snapshot for the same title.
    async fn add(&self, user_id: &str, entry: NewWatchlistEntry) -> AppResult<WatchlistEntry>;

    /// Remove an entry. Returns whether a record existed.
    async fn remove(&self, user_id: &str, content_id: i64) -> AppResult<bool>;
}
