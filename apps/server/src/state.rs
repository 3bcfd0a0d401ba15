//! Shared application state

use std::sync::Arc;
use std::time::{Duration, Instant};

use execid_context::ContextService;

use crate::{
    config::Config,
    metrics::{MetricsSource, ProcessMetrics},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub context: ContextService,
    pub metrics: Arc<dyn MetricsSource>,
    started_at: Instant,
}

impl AppState {
    /// State backed by real process metrics.
    pub fn new(config: Config, context: ContextService) -> Self {
        Self::with_metrics(config, context, Arc::new(ProcessMetrics))
    }

    pub fn with_metrics(
        config: Config,
        context: ContextService,
        metrics: Arc<dyn MetricsSource>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            context,
            metrics,
            started_at: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
