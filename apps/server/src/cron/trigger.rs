//! Timer-driven trigger that runs a job inside a fresh execution context

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use execid_context::{ContextRunner, ContextService, RequestContext};
use futures::FutureExt;
use tokio::{
    sync::watch,
    time::{Instant, MissedTickBehavior},
};
use tracing::Instrument;

use super::job::ScheduledJob;
use crate::config::{CronConfig, MAX_CRON_INTERVAL_MINUTES};

/// What happened during one firing that was not skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireReport {
    pub execution_id: String,
    pub elapsed: Duration,
    pub slow: bool,
    /// Failure message if the job returned an error or panicked.
    pub error: Option<String>,
}

pub struct CronTrigger<R = ContextService> {
    runner: R,
    job: Arc<dyn ScheduledJob>,
    enabled: bool,
    interval: Duration,
    slow_threshold: Duration,
}

impl<R: ContextRunner> CronTrigger<R> {
    pub fn new(runner: R, job: Arc<dyn ScheduledJob>, config: &CronConfig) -> Self {
        Self {
            runner,
            job,
            enabled: config.enabled,
            interval: Duration::from_secs(
                config
                    .interval_minutes
                    .clamp(1, MAX_CRON_INTERVAL_MINUTES)
                    .saturating_mul(60),
            ),
            slow_threshold: Duration::from_millis(config.slow_threshold_ms),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Handle a single timer firing.
    ///
    /// Returns `None` when the trigger is disabled; nothing else happens in
    /// that case. Job failures and panics are logged and reported, never
    /// propagated.
    pub async fn fire(&self) -> Option<FireReport> {
        if !self.enabled {
            tracing::debug!(job = self.job.name(), "Cron job disabled in configuration");
            return None;
        }

        let context = RequestContext::generate();
        let execution_id = context.execution_id().to_string();
        let span = tracing::info_span!("cron_job", job = self.job.name(), execution_id = %execution_id);

        let job = self.job.clone();
        let start = Instant::now();
        let outcome = self
            .runner
            .run_with_context(context, AssertUnwindSafe(job.run()).catch_unwind())
            .instrument(span.clone())
            .await;
        let elapsed = start.elapsed();

        let error = match outcome {
            Ok(Ok(Ok(()))) => None,
            Ok(Ok(Err(e))) => Some(format!("{e:#}")),
            Ok(Err(panic)) => Some(format!("job panicked: {}", panic_message(panic.as_ref()))),
            Err(e) => Some(e.to_string()),
        };
        let slow = elapsed > self.slow_threshold;

        span.in_scope(|| {
            let elapsed_ms = elapsed.as_millis() as u64;
            match &error {
                None => tracing::info!(elapsed_ms, "Cron job completed"),
                Some(message) => tracing::error!(elapsed_ms, error = %message, "Cron job failed"),
            }
            if slow {
                tracing::warn!(
                    elapsed_ms,
                    threshold_ms = self.slow_threshold.as_millis() as u64,
                    "Slow cron job execution"
                );
            }
        });

        Some(FireReport {
            execution_id,
            elapsed,
            slow,
            error,
        })
    }

    /// Fire every `interval` until `shutdown` flips to `true` or its sender is
    /// dropped. The first firing happens one full interval after start.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            job = self.job.name(),
            enabled = self.enabled,
            interval_secs = self.interval.as_secs(),
            "Cron trigger started"
        );

        let start = Instant::now()
            .checked_add(self.interval)
            .unwrap_or_else(Instant::now);
        let mut ticker = tokio::time::interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.fire().await;
                }
            }
        }

        tracing::info!(job = self.job.name(), "Cron trigger stopped");
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
