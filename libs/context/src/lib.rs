//! Task-scoped execution context
//!
//! Binds a [`RequestContext`] (one execution identifier) to the dynamic extent
//! of a unit of work so that any code running inside it can look the identifier
//! up without having it passed in:
//! - [`ContextStore`] is the raw task-local primitive
//! - [`ContextService`] is the validated accessor the rest of an application uses
//! - [`ContextRunner`] is the seam for code that only needs to enter a scope
//!
//! Bindings follow the future they scope across every `.await`, so two requests
//! interleaved on the same worker thread never observe each other's context.

pub mod context;
pub mod error;
pub mod service;
pub mod store;

pub use context::RequestContext;
pub use error::{ContextError, Result};
pub use service::{ContextRunner, ContextService};
pub use store::ContextStore;
