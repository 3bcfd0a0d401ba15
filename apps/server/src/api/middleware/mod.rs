//! Middleware stack for the API

pub mod execution_context;
pub mod layers;

pub use execution_context::{execution_context_middleware, EXECUTION_ID_HEADER};
pub use layers::trace;
