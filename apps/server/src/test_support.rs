//! Fixtures shared by unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use execid_context::ContextService;

use crate::{
    config::Config,
    metrics::{MetricsError, MetricsSource, ProcessSample},
    state::AppState,
};

pub struct FixedMetrics(pub ProcessSample);

impl MetricsSource for FixedMetrics {
    fn sample(&self) -> Result<ProcessSample, MetricsError> {
        Ok(self.0)
    }
}

pub struct FailingMetrics;

impl MetricsSource for FailingMetrics {
    fn sample(&self) -> Result<ProcessSample, MetricsError> {
        Err(MetricsError("process table unavailable".into()))
    }
}

pub fn test_config() -> Config {
    Config::from_env_map(HashMap::from([("APP_ENV".to_string(), "test".to_string())]))
        .expect("test config")
}

pub fn state_with_sample(sample: ProcessSample) -> AppState {
    AppState::with_metrics(
        test_config(),
        ContextService::new(),
        Arc::new(FixedMetrics(sample)),
    )
}

pub fn failing_state() -> AppState {
    AppState::with_metrics(test_config(), ContextService::new(), Arc::new(FailingMetrics))
}
