//! Error types for execution context access

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("Invalid context: execution id must be a non-empty string")]
    InvalidContext,

    #[error("No context binding for the current task (wrap the task with `ContextStore::bind_task`)")]
    Unbound,
}

pub type Result<T> = std::result::Result<T, ContextError>;
