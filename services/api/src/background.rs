//! Scheduled cleanup of admin order managers

use std::time::Duration;

use anyhow::Result;
use catalog::VideoStore;
use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

use crate::managers::ManagerRegistry;

/// Start a job that drops managers of expired sessions every `every`
///
/// The returned scheduler must be kept alive for the job to keep running.
pub async fn start_session_sweep<S>(
    registry: ManagerRegistry<S>,
    every: Duration,
) -> Result<JobScheduler>
where
    S: VideoStore + Clone + 'static,
{
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_repeated_async(every, move |_, _| {
        let registry = registry.clone();
        Box::pin(async move {
            let dropped = registry.sweep_expired(Utc::now()).await;
            if dropped > 0 {
                info!(
                    "Dropped {} order managers of expired sessions, {} remain",
                    dropped,
                    registry.len().await
                );
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    info!("Started session sweep every {:?}", every);
    Ok(scheduler)
}
