//! Nightly reminder sync
//!
//! Walks every reminder record across all users, asks the catalog whether
//! the release condition for each record now holds, persists the resulting
//! one-way transition, and tells the notification sink about it when the
//! record belongs to the configured recipient.
//!
//! Failure containment is per record: a catalog or store error on one
//! record is logged and recorded in the run summary while the scan keeps
//! going. Only a failure to list the records at all aborts a run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::ReminderStore,
    error::AppResult,
    models::{ContentType, OwnedReminder, ReminderUpdate},
    services::{catalog::CatalogGateway, notifier::NotificationSink},
};

pub struct ReminderSyncService {
    catalog: Arc<dyn CatalogGateway>,
    store: Arc<dyn ReminderStore>,
    notifier: Arc<dyn NotificationSink>,
    notify_user_id: String,
}

/// Result of one full sync run
#[derive(Debug)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<RecordOutcome>,
}

impl RunSummary {
    pub fn updated_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, RecordStatus::Updated { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, RecordStatus::Skipped(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, RecordStatus::Failed { .. }))
            .count()
    }

    pub fn notified_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o.status,
                    RecordStatus::Updated {
                        notification: NotificationStatus::Sent
                    }
                )
            })
            .count()
    }
}

/// What happened to a single record during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub owner_id: String,
    pub content_id: i64,
    pub status: RecordStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    /// The transition was persisted
    Updated { notification: NotificationStatus },
    /// No transition applied; the record was left untouched
    Skipped(SkipReason),
    /// The record could not be processed; the run continued without it
    Failed { stage: FailureStage, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    Sent,
    /// Delivery failed after the record was already updated
    SendFailed(String),
    /// The owner is not the configured recipient
    NotRecipient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Movie latch already set
    AlreadyNotified,
    /// No US release entry at Digital or later yet
    NotYetInHd,
    /// Latest aired episode does not advance past the stored baseline
    NoNewEpisode,
    /// The catalog reports no aired episode at all
    NoAiredEpisode,
    /// Series record without a stored (season, episode) baseline
    MissingBaseline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    CatalogRead,
    StoreWrite,
}

impl ReminderSyncService {
    pub fn new(
        catalog: Arc<dyn CatalogGateway>,
        store: Arc<dyn ReminderStore>,
        notifier: Arc<dyn NotificationSink>,
        notify_user_id: String,
    ) -> Self {
        Self {
            catalog,
            store,
            notifier,
            notify_user_id,
        }
    }

    /// Run one full reconciliation pass over every reminder record.
    ///
    /// Returns `Err` only when the record scan itself fails; per-record
    /// errors are captured in the summary.
    pub async fn run_once(&self) -> AppResult<RunSummary> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        tracing::info!(run_id = %run_id, "Starting reminder sync run");

        let reminders = self.store.list_all().await?;

        tracing::info!(
            run_id = %run_id,
            records = reminders.len(),
            "Scanned reminder records"
        );

        let mut outcomes = Vec::with_capacity(reminders.len());
        for owned in &reminders {
            let status = self.process_record(owned).await;

            match &status {
                RecordStatus::Updated { notification } => {
                    tracing::info!(
                        run_id = %run_id,
                        user_id = %owned.owner_id,
                        content_id = owned.record.content_id,
                        notification = ?notification,
                        "Reminder record updated"
                    );
                }
                RecordStatus::Skipped(reason) => {
                    tracing::debug!(
                        run_id = %run_id,
                        user_id = %owned.owner_id,
                        content_id = owned.record.content_id,
                        reason = ?reason,
                        "Reminder record skipped"
                    );
                }
                RecordStatus::Failed { stage, message } => {
                    tracing::error!(
                        run_id = %run_id,
                        user_id = %owned.owner_id,
                        content_id = owned.record.content_id,
                        stage = ?stage,
                        error = %message,
                        "Reminder record failed, continuing run"
                    );
                }
            }

            outcomes.push(RecordOutcome {
                owner_id: owned.owner_id.clone(),
                content_id: owned.record.content_id,
                status,
            });
        }

        let summary = RunSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        tracing::info!(
            run_id = %run_id,
            updated = summary.updated_count(),
            skipped = summary.skipped_count(),
            failed = summary.failed_count(),
            notified = summary.notified_count(),
            "Reminder sync run complete"
        );

        Ok(summary)
    }

    async fn process_record(&self, owned: &OwnedReminder) -> RecordStatus {
        let record = &owned.record;

        let (update, message) = match record.kind {
            ContentType::Movie => {
                // The latch makes movie notifications once-only; a latched
                // record never reaches the catalog again.
                if record.is_notified() {
                    return RecordStatus::Skipped(SkipReason::AlreadyNotified);
                }

                let info = match self.catalog.movie_release_info(record.content_id).await {
                    Ok(info) => info,
                    Err(e) => {
                        return RecordStatus::Failed {
                            stage: FailureStage::CatalogRead,
                            message: e.to_string(),
                        }
                    }
                };

                if !info.has_hd_release() {
                    return RecordStatus::Skipped(SkipReason::NotYetInHd);
                }

                (
                    ReminderUpdate::MarkNotified,
                    format!("<b>{}</b> is out now in HD!", record.display_name),
                )
            }
            ContentType::Series => {
                let Some(baseline) = record.baseline_episode() else {
                    return RecordStatus::Skipped(SkipReason::MissingBaseline);
                };

                let latest = match self.catalog.series_latest_episode(record.content_id).await {
                    Ok(latest) => latest,
                    Err(e) => {
                        return RecordStatus::Failed {
                            stage: FailureStage::CatalogRead,
                            message: e.to_string(),
                        }
                    }
                };

                let Some(latest) = latest else {
                    return RecordStatus::Skipped(SkipReason::NoAiredEpisode);
                };

                if latest <= baseline {
                    return RecordStatus::Skipped(SkipReason::NoNewEpisode);
                }

                (
                    ReminderUpdate::AdvanceEpisode(latest),
                    format!(
                        "<b>{}'s</b> new episode dropped: Season {}, Episode {}",
                        record.display_name, latest.season, latest.episode
                    ),
                )
            }
        };

        // The record is committed before delivery is attempted; a sink
        // failure must not bring the transition back next run.
        if let Err(e) = self
            .store
            .apply(&owned.owner_id, record.content_id, update)
            .await
        {
            return RecordStatus::Failed {
                stage: FailureStage::StoreWrite,
                message: e.to_string(),
            };
        }

        let notification = if owned.owner_id == self.notify_user_id {
            match self.notifier.send(&message).await {
                Ok(()) => NotificationStatus::Sent,
                Err(e) => {
                    tracing::error!(
                        user_id = %owned.owner_id,
                        content_id = record.content_id,
                        error = %e,
                        "Notification delivery failed after record update"
                    );
                    NotificationStatus::SendFailed(e.to_string())
                }
            }
        } else {
            NotificationStatus::NotRecipient
        };

        RecordStatus::Updated { notification }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MockReminderStore,
        error::AppError,
        models::{MovieReleaseInfo, NewReminder, ReminderRecord, SeasonEpisode},
        services::{catalog::MockCatalogGateway, notifier::MockNotificationSink},
    };
    use std::collections::HashMap;
    use std::sync::Mutex;

    const RECIPIENT: &str = "user-1";

    fn movie(owner: &str, content_id: i64, name: &str, notified: Option<bool>) -> OwnedReminder {
        OwnedReminder {
            owner_id: owner.to_string(),
            record: ReminderRecord {
                content_id,
                kind: ContentType::Movie,
                display_name: name.to_string(),
                notified,
                last_known_season: None,
                last_known_episode: None,
                created_at: Utc::now(),
                updated_at: None,
            },
        }
    }

    fn series(
        owner: &str,
        content_id: i64,
        name: &str,
        baseline: Option<(i32, i32)>,
    ) -> OwnedReminder {
        OwnedReminder {
            owner_id: owner.to_string(),
            record: ReminderRecord {
                content_id,
                kind: ContentType::Series,
                display_name: name.to_string(),
                notified: None,
                last_known_season: baseline.map(|(s, _)| s),
                last_known_episode: baseline.map(|(_, e)| e),
                created_at: Utc::now(),
                updated_at: None,
            },
        }
    }

    fn service(
        catalog: MockCatalogGateway,
        store: MockReminderStore,
        notifier: MockNotificationSink,
    ) -> ReminderSyncService {
        ReminderSyncService::new(
            Arc::new(catalog),
            Arc::new(store),
            Arc::new(notifier),
            RECIPIENT.to_string(),
        )
    }

    fn release_info(types: Vec<i32>) -> MovieReleaseInfo {
        MovieReleaseInfo {
            us_release_types: types,
        }
    }

    #[tokio::test]
    async fn test_empty_scan_completes() {
        let mut store = MockReminderStore::new();
        store.expect_list_all().returning(|| Ok(Vec::new()));

        let summary = service(MockCatalogGateway::new(), store, MockNotificationSink::new())
            .run_once()
            .await
            .unwrap();

        assert!(summary.outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_notified_movie_is_skipped_without_catalog_read() {
        let mut store = MockReminderStore::new();
        store
            .expect_list_all()
            .returning(|| Ok(vec![movie(RECIPIENT, 550, "Fight Club", Some(true))]));
        store.expect_apply().never();

        // No catalog or sink expectations: any call panics the test.
        let catalog = MockCatalogGateway::new();
        let notifier = MockNotificationSink::new();

        let summary = service(catalog, store, notifier).run_once().await.unwrap();

        assert_eq!(
            summary.outcomes[0].status,
            RecordStatus::Skipped(SkipReason::AlreadyNotified)
        );
        assert_eq!(summary.updated_count(), 0);
    }

    #[tokio::test]
    async fn test_movie_without_hd_release_is_left_untouched() {
        let mut store = MockReminderStore::new();
        store
            .expect_list_all()
            .returning(|| Ok(vec![movie(RECIPIENT, 693134, "Dune: Part Two", Some(false))]));
        store.expect_apply().never();

        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_movie_release_info()
            .times(1)
            .returning(|_| Ok(release_info(vec![1, 3])));

        let mut notifier = MockNotificationSink::new();
        notifier.expect_send().never();

        let summary = service(catalog, store, notifier).run_once().await.unwrap();

        assert_eq!(
            summary.outcomes[0].status,
            RecordStatus::Skipped(SkipReason::NotYetInHd)
        );
    }

    #[tokio::test]
    async fn test_hd_release_marks_notified_and_notifies_recipient() {
        let mut store = MockReminderStore::new();
        store
            .expect_list_all()
            .returning(|| Ok(vec![movie(RECIPIENT, 693134, "Dune: Part Two", None)]));
        store
            .expect_apply()
            .times(1)
            .withf(|user_id, content_id, update| {
                user_id == RECIPIENT
                    && *content_id == 693134
                    && *update == ReminderUpdate::MarkNotified
            })
            .returning(|_, _, _| Ok(()));

        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_movie_release_info()
            .times(1)
            .returning(|_| Ok(release_info(vec![3, 4])));

        let mut notifier = MockNotificationSink::new();
        notifier
            .expect_send()
            .times(1)
            .withf(|text| text == "<b>Dune: Part Two</b> is out now in HD!")
            .returning(|_| Ok(()));

        let summary = service(catalog, store, notifier).run_once().await.unwrap();

        assert_eq!(
            summary.outcomes[0].status,
            RecordStatus::Updated {
                notification: NotificationStatus::Sent
            }
        );
        assert_eq!(summary.notified_count(), 1);
    }

    #[tokio::test]
    async fn test_series_new_episode_advances_baseline() {
        let mut store = MockReminderStore::new();
        store
            .expect_list_all()
            .returning(|| Ok(vec![series(RECIPIENT, 1399, "Game of Thrones", Some((2, 5)))]));
        store
            .expect_apply()
            .times(1)
            .withf(|user_id, content_id, update| {
                user_id == RECIPIENT
                    && *content_id == 1399
                    && *update == ReminderUpdate::AdvanceEpisode(SeasonEpisode::new(2, 6))
            })
            .returning(|_, _, _| Ok(()));

        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_series_latest_episode()
            .times(1)
            .returning(|_| Ok(Some(SeasonEpisode::new(2, 6))));

        let mut notifier = MockNotificationSink::new();
        notifier
            .expect_send()
            .times(1)
            .withf(|text| {
                text == "<b>Game of Thrones's</b> new episode dropped: Season 2, Episode 6"
            })
            .returning(|_| Ok(()));

        let summary = service(catalog, store, notifier).run_once().await.unwrap();

        assert_eq!(summary.updated_count(), 1);
        assert_eq!(summary.notified_count(), 1);
    }

    #[tokio::test]
    async fn test_series_without_newer_episode_is_skipped() {
        // Baselines all at (2, 5); the catalog reports positions that do
        // not advance past it, including an older season with a higher
        // episode number.
        let mut store = MockReminderStore::new();
        store.expect_list_all().returning(|| {
            Ok(vec![
                series(RECIPIENT, 1, "Same Episode", Some((2, 5))),
                series(RECIPIENT, 2, "Older Episode", Some((2, 5))),
                series(RECIPIENT, 3, "Older Season", Some((2, 5))),
            ])
        });
        store.expect_apply().never();

        let mut catalog = MockCatalogGateway::new();
        catalog.expect_series_latest_episode().returning(|id| {
            Ok(Some(match id {
                1 => SeasonEpisode::new(2, 5),
                2 => SeasonEpisode::new(2, 4),
                _ => SeasonEpisode::new(1, 9),
            }))
        });

        let mut notifier = MockNotificationSink::new();
        notifier.expect_send().never();

        let summary = service(catalog, store, notifier).run_once().await.unwrap();

        assert_eq!(summary.skipped_count(), 3);
        for outcome in &summary.outcomes {
            assert_eq!(
                outcome.status,
                RecordStatus::Skipped(SkipReason::NoNewEpisode)
            );
        }
    }

    #[tokio::test]
    async fn test_season_premiere_counts_as_new_episode() {
        let mut store = MockReminderStore::new();
        store
            .expect_list_all()
            .returning(|| Ok(vec![series(RECIPIENT, 94997, "House of the Dragon", Some((2, 9)))]));
        store
            .expect_apply()
            .times(1)
            .withf(|_, _, update| {
                *update == ReminderUpdate::AdvanceEpisode(SeasonEpisode::new(3, 1))
            })
            .returning(|_, _, _| Ok(()));

        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_series_latest_episode()
            .returning(|_| Ok(Some(SeasonEpisode::new(3, 1))));

        let mut notifier = MockNotificationSink::new();
        notifier
            .expect_send()
            .times(1)
            .withf(|text| {
                text == "<b>House of the Dragon's</b> new episode dropped: Season 3, Episode 1"
            })
            .returning(|_| Ok(()));

        let summary = service(catalog, store, notifier).run_once().await.unwrap();

        assert_eq!(summary.updated_count(), 1);
    }

    #[tokio::test]
    async fn test_series_without_baseline_is_skipped_before_catalog_read() {
        let mut store = MockReminderStore::new();
        store
            .expect_list_all()
            .returning(|| Ok(vec![series(RECIPIENT, 456, "The Simpsons", None)]));
        store.expect_apply().never();

        let summary = service(
            MockCatalogGateway::new(),
            store,
            MockNotificationSink::new(),
        )
        .run_once()
        .await
        .unwrap();

        assert_eq!(
            summary.outcomes[0].status,
            RecordStatus::Skipped(SkipReason::MissingBaseline)
        );
    }

    #[tokio::test]
    async fn test_series_with_nothing_aired_is_skipped() {
        let mut store = MockReminderStore::new();
        store
            .expect_list_all()
            .returning(|| Ok(vec![series(RECIPIENT, 222766, "Unaired Pilot", Some((1, 1)))]));
        store.expect_apply().never();

        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_series_latest_episode()
            .returning(|_| Ok(None));

        let summary = service(catalog, store, MockNotificationSink::new())
            .run_once()
            .await
            .unwrap();

        assert_eq!(
            summary.outcomes[0].status,
            RecordStatus::Skipped(SkipReason::NoAiredEpisode)
        );
    }

    #[tokio::test]
    async fn test_catalog_failure_isolates_record() {
        let mut store = MockReminderStore::new();
        store.expect_list_all().returning(|| {
            Ok(vec![
                movie(RECIPIENT, 13, "Broken Lookup", None),
                movie(RECIPIENT, 550, "Fight Club", None),
            ])
        });
        store
            .expect_apply()
            .times(1)
            .withf(|_, content_id, _| *content_id == 550)
            .returning(|_, _, _| Ok(()));

        let mut catalog = MockCatalogGateway::new();
        catalog.expect_movie_release_info().returning(|id| {
            if id == 13 {
                Err(AppError::Catalog("TMDB API returned status 500".to_string()))
            } else {
                Ok(release_info(vec![4]))
            }
        });

        let mut notifier = MockNotificationSink::new();
        notifier.expect_send().times(1).returning(|_| Ok(()));

        let summary = service(catalog, store, notifier).run_once().await.unwrap();

        assert_eq!(summary.failed_count(), 1);
        assert_eq!(summary.updated_count(), 1);
        assert!(matches!(
            summary.outcomes[0].status,
            RecordStatus::Failed {
                stage: FailureStage::CatalogRead,
                ..
            }
        ));
        assert_eq!(
            summary.outcomes[1].status,
            RecordStatus::Updated {
                notification: NotificationStatus::Sent
            }
        );
    }

    #[tokio::test]
    async fn test_store_write_failure_suppresses_notification() {
        let mut store = MockReminderStore::new();
        store
            .expect_list_all()
            .returning(|| Ok(vec![movie(RECIPIENT, 550, "Fight Club", None)]));
        store
            .expect_apply()
            .times(1)
            .returning(|_, content_id, _| {
                Err(AppError::NotFound(format!(
                    "No reminder for content {} owned by user user-1",
                    content_id
                )))
            });

        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_movie_release_info()
            .returning(|_| Ok(release_info(vec![4])));

        let mut notifier = MockNotificationSink::new();
        notifier.expect_send().never();

        let summary = service(catalog, store, notifier).run_once().await.unwrap();

        assert!(matches!(
            summary.outcomes[0].status,
            RecordStatus::Failed {
                stage: FailureStage::StoreWrite,
                ..
            }
        ));
        assert_eq!(summary.notified_count(), 0);
    }

    #[tokio::test]
    async fn test_sink_failure_keeps_record_updated() {
        let mut store = MockReminderStore::new();
        store
            .expect_list_all()
            .returning(|| Ok(vec![movie(RECIPIENT, 550, "Fight Club", None)]));
        store.expect_apply().times(1).returning(|_, _, _| Ok(()));

        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_movie_release_info()
            .returning(|_| Ok(release_info(vec![4])));

        let mut notifier = MockNotificationSink::new();
        notifier.expect_send().times(1).returning(|_| {
            Err(AppError::Notification(
                "Telegram API returned status 502".to_string(),
            ))
        });

        let summary = service(catalog, store, notifier).run_once().await.unwrap();

        assert_eq!(summary.updated_count(), 1);
        assert_eq!(summary.notified_count(), 0);
        assert!(matches!(
            &summary.outcomes[0].status,
            RecordStatus::Updated {
                notification: NotificationStatus::SendFailed(_)
            }
        ));
    }

    #[tokio::test]
    async fn test_only_configured_recipient_is_notified() {
        let mut store = MockReminderStore::new();
        store.expect_list_all().returning(|| {
            Ok(vec![
                movie(RECIPIENT, 550, "Fight Club", None),
                movie("user-2", 680, "Pulp Fiction", None),
            ])
        });
        store.expect_apply().times(2).returning(|_, _, _| Ok(()));

        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_movie_release_info()
            .returning(|_| Ok(release_info(vec![4])));

        // Both records transition, but only the recipient's produces a send.
        let mut notifier = MockNotificationSink::new();
        notifier
            .expect_send()
            .times(1)
            .withf(|text| text.contains("Fight Club"))
            .returning(|_| Ok(()));

        let summary = service(catalog, store, notifier).run_once().await.unwrap();

        assert_eq!(summary.updated_count(), 2);
        assert_eq!(summary.notified_count(), 1);
        assert_eq!(
            summary.outcomes[1].status,
            RecordStatus::Updated {
                notification: NotificationStatus::NotRecipient
            }
        );
    }

    #[tokio::test]
    async fn test_scan_failure_aborts_run() {
        let mut store = MockReminderStore::new();
        store
            .expect_list_all()
            .returning(|| Err(AppError::Internal("connection refused".to_string())));

        let result = service(
            MockCatalogGateway::new(),
            store,
            MockNotificationSink::new(),
        )
        .run_once()
        .await;

        assert!(result.is_err());
    }

    // ------------------------------------------------------------------
    // Stateful fakes for idempotence: two identical runs against the same
    // catalog state must only mutate and notify on the first.
    // ------------------------------------------------------------------

    struct FakeStore {
        rows: Mutex<Vec<OwnedReminder>>,
    }

    impl FakeStore {
        fn new(rows: Vec<OwnedReminder>) -> Self {
            Self {
                rows: Mutex::new(rows),
            }
        }

        fn snapshot(&self) -> Vec<OwnedReminder> {
            self.rows.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ReminderStore for FakeStore {
        async fn list_all(&self) -> AppResult<Vec<OwnedReminder>> {
            Ok(self.snapshot())
        }

        async fn list_for_user(&self, _user_id: &str) -> AppResult<Vec<ReminderRecord>> {
            unimplemented!()
        }

        async fn get(
            &self,
            _user_id: &str,
            _content_id: i64,
        ) -> AppResult<Option<ReminderRecord>> {
            unimplemented!()
        }

        async fn upsert(
            &self,
            _user_id: &str,
            _reminder: NewReminder,
        ) -> AppResult<ReminderRecord> {
            unimplemented!()
        }

        async fn apply(
            &self,
            user_id: &str,
            content_id: i64,
            update: ReminderUpdate,
        ) -> AppResult<()> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|r| r.owner_id == user_id && r.record.content_id == content_id)
                .ok_or_else(|| AppError::NotFound("missing record".to_string()))?;

            match update {
                ReminderUpdate::MarkNotified => row.record.notified = Some(true),
                ReminderUpdate::AdvanceEpisode(latest) => {
                    row.record.last_known_season = Some(latest.season);
                    row.record.last_known_episode = Some(latest.episode);
                }
            }
            row.record.updated_at = Some(Utc::now());
            Ok(())
        }

        async fn delete(&self, _user_id: &str, _content_id: i64) -> AppResult<bool> {
            unimplemented!()
        }
    }

    struct ScriptedCatalog {
        hd_movies: HashMap<i64, bool>,
        latest_episodes: HashMap<i64, SeasonEpisode>,
    }

    #[async_trait::async_trait]
    impl CatalogGateway for ScriptedCatalog {
        async fn movie_release_info(&self, id: i64) -> AppResult<MovieReleaseInfo> {
            let hd = self.hd_movies.get(&id).copied().unwrap_or(false);
            Ok(release_info(if hd { vec![3, 4] } else { vec![3] }))
        }

        async fn series_latest_episode(&self, id: i64) -> AppResult<Option<SeasonEpisode>> {
            Ok(self.latest_episodes.get(&id).copied())
        }

        async fn search(&self, _query: &str) -> AppResult<Vec<crate::models::SearchHit>> {
            unimplemented!()
        }

        async fn trending(
            &self,
            _kind: crate::models::TrendingKind,
        ) -> AppResult<Vec<crate::models::CatalogCard>> {
            unimplemented!()
        }

        async fn discover(
            &self,
            _kind: ContentType,
            _filters: crate::models::DiscoverFilters,
        ) -> AppResult<Vec<crate::models::CatalogCard>> {
            unimplemented!()
        }

        async fn genres(&self, _kind: ContentType) -> AppResult<Vec<crate::models::Genre>> {
            unimplemented!()
        }

        async fn movie_details(&self, _id: i64) -> AppResult<crate::models::TitleDetails> {
            unimplemented!()
        }

        async fn tv_details(&self, _id: i64) -> AppResult<crate::models::TitleDetails> {
            unimplemented!()
        }

        async fn season_episodes(
            &self,
            _id: i64,
            _season_number: i32,
        ) -> AppResult<Vec<crate::models::EpisodeDetail>> {
            unimplemented!()
        }

        async fn watch_providers(
            &self,
            _id: i64,
            _kind: ContentType,
        ) -> AppResult<crate::models::ProviderSummary> {
            unimplemented!()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl NotificationSink for RecordingSink {
        async fn send(&self, text: &str) -> AppResult<()> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_second_run_against_same_catalog_state_changes_nothing() {
        let store = Arc::new(FakeStore::new(vec![
            movie(RECIPIENT, 550, "Fight Club", None),
            series(RECIPIENT, 1399, "Game of Thrones", Some((2, 5))),
            movie("user-2", 680, "Pulp Fiction", None),
        ]));
        let catalog = Arc::new(ScriptedCatalog {
            hd_movies: HashMap::from([(550, true), (680, true)]),
            latest_episodes: HashMap::from([(1399, SeasonEpisode::new(3, 1))]),
        });
        let sink = Arc::new(RecordingSink::default());

        let service = ReminderSyncService::new(
            catalog,
            store.clone(),
            sink.clone(),
            RECIPIENT.to_string(),
        );

        let first = service.run_once().await.unwrap();
        assert_eq!(first.updated_count(), 3);
        // Only the recipient's two records produce messages
        assert_eq!(sink.sent.lock().unwrap().len(), 2);

        let after_first = store.snapshot();
        assert_eq!(after_first[0].record.notified, Some(true));
        assert_eq!(after_first[1].record.baseline_episode(), Some(SeasonEpisode::new(3, 1)));
        assert_eq!(after_first[2].record.notified, Some(true));

        let second = service.run_once().await.unwrap();
        assert_eq!(second.updated_count(), 0);
        assert_eq!(second.skipped_count(), 3);
        // No further deliveries and no further record changes
        assert_eq!(sink.sent.lock().unwrap().len(), 2);
        assert_eq!(store.snapshot(), after_first);
    }
}
