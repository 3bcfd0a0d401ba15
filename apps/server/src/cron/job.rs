//! Job trait and the built-in heartbeat job

use async_trait::async_trait;
use execid_context::ContextService;

/// Body of a scheduled job.
///
/// Runs inside the execution context the trigger opened for this firing.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    /// Job name for logging
    fn name(&self) -> &str;

    async fn run(&self) -> anyhow::Result<()>;
}

/// Logs the execution id of each firing, read back through the accessor.
#[derive(Debug, Clone)]
pub struct HeartbeatJob {
    context: ContextService,
    interval_minutes: u64,
}

impl HeartbeatJob {
    pub fn new(context: ContextService, interval_minutes: u64) -> Self {
        Self {
            context,
            interval_minutes,
        }
    }
}

#[async_trait]
impl ScheduledJob for HeartbeatJob {
    fn name(&self) -> &str {
        "heartbeat"
    }

    async fn run(&self) -> anyhow::Result<()> {
        let execution_id = self
            .context
            .get_execution_id()
            .ok_or_else(|| anyhow::anyhow!("heartbeat fired outside an execution context"))?;

        tracing::info!(
            execution_id = %execution_id,
            interval_minutes = self.interval_minutes,
            "Cron job executed with execution ID: {} (interval: {} min)",
            execution_id,
            self.interval_minutes
        );
        Ok(())
    }
}
