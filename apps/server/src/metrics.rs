//! Process metrics for the health endpoint
//!
//! [`MetricsSource`] abstracts where memory and CPU figures come from so the
//! health handler can be driven by fixed samples in tests. The production
//! source reads the Prometheus process collector.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct MetricsError(pub String);

/// Point-in-time process statistics, in raw units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSample {
    pub heap_used_bytes: u64,
    pub heap_total_bytes: u64,
    pub external_bytes: u64,
    pub cpu_user_micros: u64,
    pub cpu_system_micros: u64,
}

pub trait MetricsSource: Send + Sync {
    fn sample(&self) -> Result<ProcessSample, MetricsError>;
}

/// Reads `/proc/self` through `prometheus::process_collector`.
///
/// Resident memory is reported as used, virtual memory as total. The collector
/// only exposes combined CPU seconds, which are reported as user time.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessMetrics;

#[cfg(target_os = "linux")]
impl MetricsSource for ProcessMetrics {
    fn sample(&self) -> Result<ProcessSample, MetricsError> {
        use prometheus::core::Collector;
        use prometheus::process_collector::ProcessCollector;

        let families = ProcessCollector::for_self().collect();
        let value = |name: &str| -> Result<f64, MetricsError> {
            families
                .iter()
                .find(|family| family.get_name() == name)
                .and_then(|family| family.get_metric().first())
                .map(|metric| {
                    if metric.has_counter() {
                        metric.get_counter().get_value()
                    } else {
                        metric.get_gauge().get_value()
                    }
                })
                .ok_or_else(|| MetricsError(format!("{name} not reported by process collector")))
        };

        let resident = value("process_resident_memory_bytes")?;
        let virtual_memory = value("process_virtual_memory_bytes")?;
        let cpu_seconds = value("process_cpu_seconds_total")?;

        Ok(ProcessSample {
            heap_used_bytes: resident as u64,
            heap_total_bytes: virtual_memory as u64,
            external_bytes: 0,
            cpu_user_micros: (cpu_seconds * 1_000_000.0) as u64,
            cpu_system_micros: 0,
        })
    }
}

#[cfg(not(target_os = "linux"))]
impl MetricsSource for ProcessMetrics {
    fn sample(&self) -> Result<ProcessSample, MetricsError> {
        Err(MetricsError(format!(
            "process metrics are not supported on {}",
            std::env::consts::OS
        )))
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn process_metrics_reports_resident_memory() {
        let sample = ProcessMetrics.sample().unwrap();
        assert!(sample.heap_used_bytes > 0);
        assert!(sample.heap_total_bytes >= sample.heap_used_bytes);
    }
}
