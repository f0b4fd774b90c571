//! Background job wiring
//!
//! The reminder sync runs on a seconds-precision cron schedule. The
//! returned scheduler must be kept alive by the caller; dropping it stops
//! the job.

use std::sync::Arc;

use anyhow::Context;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::services::ReminderSyncService;

pub async fn start_reminder_sync_job(
    service: Arc<ReminderSyncService>,
    schedule: &str,
) -> anyhow::Result<JobScheduler> {
    let sched = JobScheduler::new().await.context("creating job scheduler")?;

    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let service = Arc::clone(&service);
        Box::pin(async move {
            if let Err(e) = service.run_once().await {
                tracing::error!(error = %e, "Reminder sync run aborted");
            }
        })
    })
    .with_context(|| format!("creating reminder sync job for schedule {schedule}"))?;

    sched.add(job).await.context("adding reminder sync job")?;
    sched.start().await.context("starting job scheduler")?;

    Ok(sched)
}
