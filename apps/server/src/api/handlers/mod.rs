//! Route handlers

pub mod health;
pub mod root;

pub use health::{health_check, HealthSnapshot};
pub use root::{root, ExecutionIdResponse};
