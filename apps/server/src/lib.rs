//! Execution id service
//!
//! A small HTTP service where every request and every scheduled job run gets
//! its own execution id, reachable from anywhere inside that unit of work
//! through [`execid_context::ContextService`]:
//! - `GET /` echoes the current request's id
//! - `GET /health` reports process, uptime, and context state
//! - a cron trigger runs jobs inside their own context

pub mod api;
pub mod config;
pub mod cron;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
