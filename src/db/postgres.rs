use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

use crate::{
    db::{ReminderStore, WatchlistStore},
    error::{AppError, AppResult},
    models::{
        ContentType, NewReminder, NewWatchlistEntry, OwnedReminder, ReminderRecord,
        ReminderUpdate, WatchlistEntry,
    },
};

/// Opens the Postgres pool shared by both stores
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

const REMINDER_COLUMNS: &str = "user_id, content_id, kind, display_name, notified, \
     last_known_season, last_known_episode, created_at, updated_at";

const WATCHLIST_COLUMNS: &str = "user_id, content_id, kind, title, original_title, overview, \
     poster_path, backdrop_path, release_date, vote_average, added_at";

#[derive(Debug, FromRow)]
struct ReminderRow {
    user_id: String,
    content_id: i64,
    kind: String,
    display_name: String,
    notified: Option<bool>,
    last_known_season: Option<i32>,
    last_known_episode: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl ReminderRow {
    /// Convert a row into a domain record. Rows whose `kind` column holds a
    /// value this version does not understand are dropped with a trace so
    /// one bad row cannot wedge a whole scan.
    fn into_owned(self) -> Option<OwnedReminder> {
        let Some(kind) = ContentType::parse(&self.kind) else {
            tracing::debug!(
                user_id = %self.user_id,
                content_id = self.content_id,
                kind = %self.kind,
                "Dropping reminder row with unrecognized kind"
            );
            return None;
        };

        Some(OwnedReminder {
            owner_id: self.user_id,
            record: ReminderRecord {
                content_id: self.content_id,
                kind,
                display_name: self.display_name,
                notified: self.notified,
                last_known_season: self.last_known_season,
                last_known_episode: self.last_known_episode,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        })
    }

    fn into_record(self) -> Option<ReminderRecord> {
        self.into_owned().map(|owned| owned.record)
    }
}

/// PostgreSQL-backed reminder store
#[derive(Clone)]
pub struct PgReminderStore {
    pool: PgPool,
}

impl PgReminderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ReminderStore for PgReminderStore {
    async fn list_all(&self) -> AppResult<Vec<OwnedReminder>> {
        let rows: Vec<ReminderRow> = sqlx::query_as(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders ORDER BY user_id, content_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(ReminderRow::into_owned).collect())
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<ReminderRecord>> {
        let rows: Vec<ReminderRow> = sqlx::query_as(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE user_id = $1 ORDER BY content_id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(ReminderRow::into_record).collect())
    }

    async fn get(&self, user_id: &str, content_id: i64) -> AppResult<Option<ReminderRecord>> {
        let row: Option<ReminderRow> = sqlx::query_as(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE user_id = $1 AND content_id = $2"
        ))
        .bind(user_id)
        .bind(content_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(ReminderRow::into_record))
    }

    async fn upsert(&self, user_id: &str, reminder: NewReminder) -> AppResult<ReminderRecord> {
        // Normalize per kind: movies carry the latch, series carry the baseline.
        let (notified, season, episode) = match reminder.kind {
            ContentType::Movie => (Some(reminder.notified.unwrap_or(false)), None, None),
            ContentType::Series => (None, reminder.season, reminder.episode),
        };

        let (created_at,): (DateTime<Utc>,) = sqlx::query_as(
            "INSERT INTO reminders \
                 (user_id, content_id, kind, display_name, notified, \
                  last_known_season, last_known_episode, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NULL) \
             ON CONFLICT (user_id, content_id) DO UPDATE SET \
                 kind = EXCLUDED.kind, \
                 display_name = EXCLUDED.display_name, \
                 notified = EXCLUDED.notified, \
                 last_known_season = EXCLUDED.last_known_season, \
                 last_known_episode = EXCLUDED.last_known_episode, \
                 created_at = EXCLUDED.created_at, \
                 updated_at = NULL \
             RETURNING created_at",
        )
        .bind(user_id)
        .bind(reminder.content_id)
        .bind(reminder.kind.as_str())
        .bind(&reminder.display_name)
        .bind(notified)
        .bind(season)
        .bind(episode)
        .fetch_one(&self.pool)
        .await?;

        Ok(ReminderRecord {
            content_id: reminder.content_id,
            kind: reminder.kind,
            display_name: reminder.display_name,
            notified,
            last_known_season: season,
            last_known_episode: episode,
            created_at,
            updated_at: None,
        })
    }

    async fn apply(
        &self,
        user_id: &str,
        content_id: i64,
        update: ReminderUpdate,
    ) -> AppResult<()> {
        let result = match update {
            ReminderUpdate::MarkNotified => {
                sqlx::query(
                    "UPDATE reminders SET notified = TRUE, updated_at = NOW() \
                     WHERE user_id = $1 AND content_id = $2",
                )
                .bind(user_id)
                .bind(content_id)
                .execute(&self.pool)
                .await?
            }
            ReminderUpdate::AdvanceEpisode(latest) => {
                sqlx::query(
                    "UPDATE reminders \
                     SET last_known_season = $3, last_known_episode = $4, updated_at = NOW() \
                     WHERE user_id = $1 AND content_id = $2",
                )
                .bind(user_id)
                .bind(content_id)
                .bind(latest.season)
                .bind(latest.episode)
                .execute(&self.pool)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "No reminder for content {} owned by user {}",
                content_id, user_id
            )));
        }

        Ok(())
    }

    async fn delete(&self, user_id: &str, content_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reminders WHERE user_id = $1 AND content_id = $2")
            .bind(user_id)
            .bind(content_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, FromRow)]
struct WatchlistRow {
    #[allow(dead_code)]
    user_id: String,
    content_id: i64,
    kind: String,
    title: String,
    original_title: Option<String>,
    overview: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    vote_average: f64,
    added_at: DateTime<Utc>,
}

impl WatchlistRow {
    fn into_entry(self) -> Option<WatchlistEntry> {
        let Some(kind) = ContentType::parse(&self.kind) else {
            tracing::debug!(
                content_id = self.content_id,
                kind = %self.kind,
                "Dropping watchlist row with unrecognized kind"
            );
            return None;
        };

        Some(WatchlistEntry {
            content_id: self.content_id,
            kind,
            title: self.title,
            original_title: self.original_title,
            overview: self.overview,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            release_date: self.release_date,
            vote_average: self.vote_average,
            added_at: self.added_at,
        })
    }
}

/// PostgreSQL-backed watchlist store
#[derive(Clone)]
pub struct PgWatchlistStore {
    pool: PgPool,
}

impl PgWatchlistStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl WatchlistStore for PgWatchlistStore {
    async fn list(&self, user_id: &str) -> AppResult<Vec<WatchlistEntry>> {
        let rows: Vec<WatchlistRow> = sqlx::query_as(&format!(
            "SELECT {WATCHLIST_COLUMNS} FROM watchlist WHERE user_id = $1 ORDER BY added_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(WatchlistRow::into_entry).collect())
    }

    async fn get(&self, user_id: &str, content_id: i64) -> AppResult<Option<WatchlistEntry>> {
        let row: Option<WatchlistRow> = sqlx::query_as(&format!(
            "SELECT {WATCHLIST_COLUMNS} FROM watchlist WHERE user_id = $1 AND content_id = $2"
        ))
        .bind(user_id)
        .bind(content_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(WatchlistRow::into_entry))
    }

    async fn add(&self, user_id: &str, entry: NewWatchlistEntry) -> AppResult<WatchlistEntry> {
        let (added_at,): (DateTime<Utc>,) = sqlx::query_as(
            "INSERT INTO watchlist \
                 (user_id, content_id, kind, title, original_title, overview, \
                  poster_path, backdrop_path, release_date, vote_average, added_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW()) \
             ON CONFLICT (user_id, content_id) DO UPDATE SET \
                 kind = EXCLUDED.kind, \
                 title = EXCLUDED.title, \
                 original_title = EXCLUDED.original_title, \
                 overview = EXCLUDED.overview, \
                 poster_path = EXCLUDED.poster_path, \
                 backdrop_path = EXCLUDED.backdrop_path, \
                 release_date = EXCLUDED.release_date, \
                 vote_average = EXCLUDED.vote_average, \
                 added_at = EXCLUDED.added_at \
             RETURNING added_at",
        )
        .bind(user_id)
        .bind(entry.content_id)
        .bind(entry.kind.as_str())
        .bind(&entry.title)
        .bind(&entry.original_title)
        .bind(&entry.overview)
        .bind(&entry.poster_path)
        .bind(&entry.backdrop_path)
        .bind(&entry.release_date)
        .bind(entry.vote_average)
        .fetch_one(&self.pool)
        .await?;

        Ok(WatchlistEntry {
            content_id: entry.content_id,
            kind: entry.kind,
            title: entry.title,
            original_title: entry.original_title,
            overview: entry.overview,
            poster_path: entry.poster_path,
            backdrop_path: entry.backdrop_path,
            release_date: entry.release_date,
            vote_average: entry.vote_average,
            added_at,
        })
    }

    async fn remove(&self, user_id: &str, content_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND content_id = $2")
            .bind(user_id)
            .bind(content_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
