//! Context accessor service
//!
//! The only API application code uses to read or install the current
//! execution context. Every operation emits a `tracing` event carrying the
//! operation name and the affected execution id; emitting it never changes
//! the outcome of the call.

use std::future::Future;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

use crate::{context::RequestContext, store::ContextStore, ContextError, Result};

/// Something that can run a body inside a context scope.
///
/// The request middleware and the scheduled job trigger depend on this rather
/// than on [`ContextService`] directly.
pub trait ContextRunner: Send + Sync {
    /// Run `body` with `context` current and hand back its output.
    ///
    /// Rejects an invalid context before `body` is ever polled.
    fn run_with_context<'a, F>(
        &'a self,
        context: RequestContext,
        body: F,
    ) -> BoxFuture<'a, Result<F::Output>>
    where
        F: Future + Send + 'a,
        F::Output: Send + 'a;
}

/// Accessor over the task-local [`ContextStore`].
///
/// Holds no state of its own: every binding lives in the task-local slot.
/// Constructed explicitly and passed to whoever needs it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextService;

impl ContextService {
    pub fn new() -> Self {
        Self
    }

    /// Install `context` into the current task's binding until the binding ends.
    ///
    /// Prefer [`ContextService::run_with_context`]; this exists for entry points
    /// that cannot wrap the full extent of the work they start.
    pub fn set_context(&self, context: RequestContext) -> Result<()> {
        validate(&context, "set_context")?;
        let execution_id = context.execution_id().to_string();
        ContextStore::enter_unscoped(context)?;
        tracing::trace!(operation = "set_context", execution_id = %execution_id, "Context installed");
        Ok(())
    }

    pub fn get_context(&self) -> Option<RequestContext> {
        ContextStore::current()
    }

    /// Execution id of the current context; `None` when there is no context or
    /// its id is empty.
    pub fn get_execution_id(&self) -> Option<String> {
        self.get_context()
            .filter(RequestContext::is_valid)
            .map(|ctx| ctx.execution_id().to_string())
    }

    pub fn is_context_active(&self) -> bool {
        self.get_context().is_some()
    }

    /// Run an async body with `context` current for its whole dynamic extent.
    ///
    /// The body's own output (including any `Result` it returns) comes back
    /// unchanged inside `Ok`.
    pub async fn run_with_context<F>(&self, context: RequestContext, body: F) -> Result<F::Output>
    where
        F: Future,
    {
        validate(&context, "run_with_context")?;
        tracing::trace!(
            operation = "run_with_context",
            execution_id = %context.execution_id(),
            "Entering context scope"
        );
        Ok(ContextStore::run_scoped(context, body).await)
    }

    /// Synchronous counterpart of [`ContextService::run_with_context`].
    pub fn run_with_context_sync<F, R>(&self, context: RequestContext, body: F) -> Result<R>
    where
        F: FnOnce() -> R,
    {
        validate(&context, "run_with_context_sync")?;
        tracing::trace!(
            operation = "run_with_context_sync",
            execution_id = %context.execution_id(),
            "Entering context scope"
        );
        Ok(ContextStore::run_scoped_sync(context, body))
    }

    /// `tokio::spawn` that keeps the caller's current context in the new task.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tracing::trace!(
            operation = "spawn",
            execution_id = ?self.get_execution_id(),
            "Spawning task with propagated context"
        );
        tokio::spawn(ContextStore::propagate(future))
    }
}

impl ContextRunner for ContextService {
    fn run_with_context<'a, F>(
        &'a self,
        context: RequestContext,
        body: F,
    ) -> BoxFuture<'a, Result<F::Output>>
    where
        F: Future + Send + 'a,
        F::Output: Send + 'a,
    {
        Box::pin(ContextService::run_with_context(self, context, body))
    }
}

fn validate(context: &RequestContext, operation: &'static str) -> Result<()> {
    if context.is_valid() {
        return Ok(());
    }
    tracing::debug!(operation, "Rejected context with empty execution id");
    Err(ContextError::InvalidContext)
}
