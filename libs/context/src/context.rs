//! The execution context value carried by a scope.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context of one logical unit of work (an HTTP request or a scheduled job run).
///
/// Immutable once built. Changing the current context means entering a new
/// scope with a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    execution_id: String,
}

impl RequestContext {
    /// Build a context around an existing identifier.
    ///
    /// No format check happens here; emptiness is rejected by the accessor when
    /// the context is installed.
    pub fn new(execution_id: impl Into<String>) -> Self {
        Self {
            execution_id: execution_id.into(),
        }
    }

    /// Build a context with a freshly minted UUID v4 identifier.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    pub fn is_valid(&self) -> bool {
        !self.execution_id.is_empty()
    }
}
