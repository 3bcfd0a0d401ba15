//! Execution id service - entry point
//!
//! Starts the HTTP server and the cron trigger, then waits for SIGINT/SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use execid_context::ContextService;
use execid_server::{
    api::create_router,
    config::Config,
    cron::{CronTrigger, HeartbeatJob},
    logging,
    state::AppState,
};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration comes first: a missing APP_ENV must stop us before anything binds.
    let config = Config::load().context("Failed to load configuration")?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::info!(
        version = %config.app.version,
        environment = %config.app.environment,
        context_timeout_ms = config.context.timeout_ms,
        "Starting execution id service"
    );

    let addr = config
        .socket_addr()
        .context("Failed to determine socket address")?;

    let context = ContextService::new();

    let job = Arc::new(HeartbeatJob::new(
        context,
        config.cron.interval_minutes,
    ));
    let trigger = CronTrigger::new(context, job, &config.cron);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cron_handle = tokio::spawn(trigger.run(shutdown_rx));

    let state = AppState::new(config, context);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener on {addr}"))?;

    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = cron_handle.await {
        tracing::error!(error = %e, "Cron trigger task ended abnormally");
    }

    if let Err(e) = served {
        tracing::error!(error = %e, "Server terminated unexpectedly");
        return Err(e.into());
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let sigint = tokio::signal::ctrl_c();
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = sigint => tracing::info!("SIGINT received, starting graceful shutdown..."),
                _ = sigterm.recv() => tracing::info!("SIGTERM received, starting graceful shutdown..."),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install SIGTERM handler, waiting for SIGINT only");
            let _ = sigint.await;
            tracing::info!("SIGINT received, starting graceful shutdown...");
        }
    }
}

/// Wait for shutdown signal (SIGINT only on non-Unix platforms)
#[cfg(not(unix))]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for CTRL+C");
    }
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
