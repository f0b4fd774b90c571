use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{ContentType, SeasonEpisode};

/// A release reminder set by a user on a movie or series.
///
/// Movie reminders carry the `notified` latch: once flipped to `true` the
/// record is never checked or notified again. Series reminders carry the
/// last (season, episode) pair the user has been told about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderRecord {
    pub content_id: i64,
    pub kind: ContentType,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_known_season: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_known_episode: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ReminderRecord {
    /// The stored episode baseline, present only when both halves are set.
    pub fn baseline_episode(&self) -> Option<SeasonEpisode> {
        match (self.last_known_season, self.last_known_episode) {
            (Some(season), Some(episode)) => Some(SeasonEpisode::new(season, episode)),
            _ => None,
        }
    }

    /// Whether the movie notification latch is set. Absent means not notified.
    pub fn is_notified(&self) -> bool {
        self.notified.unwrap_or(false)
    }
}

/// A reminder together with the user that owns it, as produced by the
/// cross-user scan that feeds the nightly sync.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedReminder {
    pub owner_id: String,
    pub record: ReminderRecord,
}

/// Payload for creating or replacing a reminder
#[derive(Debug, Clone, Deserialize)]
pub struct NewReminder {
    pub content_id: i64,
    pub kind: ContentType,
    pub display_name: String,
    #[serde(default)]
    pub notified: Option<bool>,
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub episode: Option<i32>,
}

/// The two one-way transitions the reminder sync may apply to a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderUpdate {
    /// Set the movie notification latch
    MarkNotified,
    /// Move the series baseline forward to the latest aired episode
    AdvanceEpisode(SeasonEpisode),
}
