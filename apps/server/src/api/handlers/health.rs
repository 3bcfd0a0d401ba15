//! `GET /health` - process and context snapshot

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::{error::AppError, metrics::ProcessSample, state::AppState, Result};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Runtime the binary was built against, reported in `system.runtime`.
pub const RUNTIME: &str = concat!("rust-", env!("CARGO_PKG_RUST_VERSION"));

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: u64,
    pub environment: String,
    pub version: String,
    pub memory: MemoryReport,
    pub system: SystemReport,
    pub context: ContextReport,
}

/// Memory figures in whole megabytes.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryReport {
    pub used: u64,
    pub total: u64,
    pub free: u64,
    pub external: u64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SystemReport {
    pub platform: &'static str,
    pub runtime: &'static str,
    pub pid: u32,
    /// User plus system CPU time, in milliseconds.
    pub cpu_usage: u64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContextReport {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
}

impl MemoryReport {
    pub fn from_sample(sample: &ProcessSample) -> Self {
        let used = to_mb(sample.heap_used_bytes);
        let total = to_mb(sample.heap_total_bytes);
        Self {
            used,
            total,
            free: total.saturating_sub(used),
            external: to_mb(sample.external_bytes),
        }
    }
}

impl SystemReport {
    pub fn from_sample(sample: &ProcessSample) -> Self {
        Self {
            platform: std::env::consts::OS,
            runtime: RUNTIME,
            pid: std::process::id(),
            cpu_usage: (sample.cpu_user_micros + sample.cpu_system_micros) / 1000,
        }
    }
}

fn to_mb(bytes: u64) -> u64 {
    (bytes as f64 / BYTES_PER_MB).round() as u64
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthSnapshot>> {
    let sample = state
        .metrics
        .sample()
        .map_err(|e| AppError::MetricsUnavailable(e.to_string()))?;

    let execution_id = state.context.get_execution_id();

    Ok(Json(HealthSnapshot {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.uptime().as_secs(),
        environment: state.config.app.environment.clone(),
        version: state.config.app.version.clone(),
        memory: MemoryReport::from_sample(&sample),
        system: SystemReport::from_sample(&sample),
        context: ContextReport {
            active: state.context.is_context_active(),
            execution_id,
        },
    }))
}
