//! Logging initialization
//!
//! Human-readable or JSON output on stdout, filtered by `LOG_LEVEL` unless
//! `RUST_LOG` is set. Events emitted inside a request or job carry the
//! surrounding span's `execution_id` field.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = build_env_filter(config);
    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config.json {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stdout),
            )
            .try_init()?;
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stdout),
            )
            .try_init()?;
    }

    tracing::info!(
        service_name = %config.service_name,
        level = %config.level,
        json = config.json,
        "Logging initialized"
    );

    Ok(())
}

/// `RUST_LOG` wins; otherwise our crates log at the configured level.
fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)))
}

fn default_directives(level: &str) -> String {
    format!("execid_server={level},execid_context={level},tower_http=info")
}
