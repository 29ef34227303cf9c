use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{
    error::AppError,
    middleware::rate_limit::RateLimiter,
    service::expiry::{calendar::Clock, ExpiryJob},
};

/// Rate limit windows are swept every five minutes.
const RATE_LIMIT_SWEEP_SCHEDULE: &str = "0 */5 * * * *";

/// Starts the membership scheduler
///
/// Registers two jobs:
/// - The daily membership expiry run on `expiry_schedule`
/// - A sweep of closed rate limit windows every five minutes
///
/// The expiry job shares its run lock with the HTTP triggers, so a scheduled run
/// that overlaps a manual one is skipped and logged.
///
/// # Arguments
/// - `expiry_job`: The membership expiry job
/// - `expiry_schedule`: Six-field cron expression, evaluated in UTC
/// - `rate_limiter`: Rate limiter whose store is swept
/// - `clock`: Source of the current time for sweeps
pub async fn start_scheduler(
    expiry_job: ExpiryJob,
    expiry_schedule: &str,
    rate_limiter: RateLimiter,
    clock: Arc<dyn Clock>,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(expiry_schedule, move |_uuid, _lock| {
        let expiry_job = expiry_job.clone();

        Box::pin(async move {
            tracing::info!("Scheduled membership check starting");

            match expiry_job.run().await {
                Ok(report) => tracing::info!(
                    "Scheduled membership check finished: {} warnings, {} expiries, {} skipped, {} failed",
                    report.warning_sent,
                    report.expiry_sent,
                    report.skipped,
                    report.failed.as_ref().map_or(0, Vec::len)
                ),
                Err(e) => tracing::error!("Scheduled membership check failed: {}", e),
            }
        })
    })?;
    scheduler.add(job).await?;

    let sweep = Job::new_async(RATE_LIMIT_SWEEP_SCHEDULE, move |_uuid, _lock| {
        let rate_limiter = rate_limiter.clone();
        let clock = clock.clone();

        Box::pin(async move {
            let removed = rate_limiter.sweep(clock.now()).await;
            if removed > 0 {
                tracing::debug!("Swept {} closed rate limit windows", removed);
            }
        })
    })?;
    scheduler.add(sweep).await?;

    scheduler.start().await?;

    tracing::info!("Membership scheduler started ({})", expiry_schedule);

    Ok(scheduler)
}
