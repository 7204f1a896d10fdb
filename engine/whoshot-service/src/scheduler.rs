//! Periodic sync scheduling with retry.

use crate::config::{RetryConfig, SchedulerConfig};
use crate::SyncService;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Drives full syncs of the current season on a fixed interval.
pub struct SyncScheduler {
    service: Arc<SyncService>,
    config: SchedulerConfig,
}

impl SyncScheduler {
    pub fn new(service: Arc<SyncService>, config: SchedulerConfig) -> Self {
        Self { service, config }
    }

    /// Start the scheduler (runs indefinitely).
    pub async fn start(&self) -> Result<()> {
        let interval = Duration::from_secs(self.config.sync_interval_hours * 3600);
        info!(
            "Starting sync scheduler; full sync every {} hours",
            self.config.sync_interval_hours
        );

        loop {
            match Self::run_with_retry(
                || {
                    let service = Arc::clone(&self.service);
                    async move { service.run_full_sync(None).await.map_err(anyhow::Error::from) }
                },
                &self.config.retry,
            )
            .await
            {
                Ok(report) => {
                    info!(
                        "Scheduled sync completed: {} teams, {} players, {} player failures",
                        report.teams, report.players, report.player_failures
                    );
                }
                Err(e) => {
                    error!("Scheduled sync failed after retries: {:#}", e);
                }
            }

            sleep(interval).await;
        }
    }

    /// Run a function with retry and exponential backoff.
    async fn run_with_retry<F, Fut, T>(mut f: F, retry_config: &RetryConfig) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut delay = Duration::from_secs(retry_config.initial_delay_secs);
        let attempts = retry_config.max_retries.max(1);

        for attempt in 1..=attempts {
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if attempt == attempts {
                        return Err(e);
                    }

                    warn!("Attempt {} failed: {:#}, retrying in {:?}", attempt, e, delay);
                    sleep(delay).await;

                    delay = Duration::from_secs(
                        (delay.as_secs() as f64 * retry_config.backoff_multiplier)
                            .min(retry_config.max_delay_secs as f64) as u64,
                    );
                }
            }
        }

        unreachable!()
    }
}
