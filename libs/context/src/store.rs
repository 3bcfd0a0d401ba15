//! Task-local execution context store
//!
//! Each binding is a `RefCell<Option<RequestContext>>` owned by the future (or
//! closure) it scopes. Tokio moves the cell in and out of the task-local slot
//! every time that future is polled, so the binding follows the task across
//! suspension points and never leaks into unrelated tasks sharing a thread.
//!
//! There is no table keyed by task id: a binding is dropped together with the
//! future that owns it.

use std::cell::RefCell;
use std::future::Future;

use tokio::task::futures::TaskLocalFuture;

use crate::{context::RequestContext, ContextError, Result};

tokio::task_local! {
    static CURRENT: RefCell<Option<RequestContext>>;
}

type Binding = RefCell<Option<RequestContext>>;

/// Raw access to the task-local binding.
///
/// Application code goes through [`crate::ContextService`], which validates
/// contexts and emits diagnostics before delegating here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextStore;

impl ContextStore {
    /// Run `future` with `context` current for its whole dynamic extent.
    ///
    /// The previous binding (if any) is visible again once the returned future
    /// completes, including when it unwinds.
    pub fn run_scoped<F: Future>(
        context: RequestContext,
        future: F,
    ) -> TaskLocalFuture<Binding, F> {
        CURRENT.scope(RefCell::new(Some(context)), future)
    }

    /// Synchronous counterpart of [`ContextStore::run_scoped`].
    pub fn run_scoped_sync<F, R>(context: RequestContext, body: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT.sync_scope(RefCell::new(Some(context)), body)
    }

    /// Give `future` an empty binding that lives exactly as long as the task.
    ///
    /// This is the end-of-task boundary for [`ContextStore::enter_unscoped`]:
    /// whatever gets installed inside is discarded with the future.
    pub fn bind_task<F: Future>(future: F) -> TaskLocalFuture<Binding, F> {
        CURRENT.scope(RefCell::new(None), future)
    }

    /// Context bound to the caller's dynamic extent, if any.
    pub fn current() -> Option<RequestContext> {
        CURRENT
            .try_with(|cell| cell.borrow().clone())
            .ok()
            .flatten()
    }

    /// Replace the value of the innermost binding without opening a new scope.
    ///
    /// Outer bindings are untouched, so the replacement disappears when the
    /// innermost scope ends. Fails with [`ContextError::Unbound`] outside any
    /// binding.
    pub fn enter_unscoped(context: RequestContext) -> Result<()> {
        CURRENT
            .try_with(|cell| {
                cell.replace(Some(context));
            })
            .map_err(|_| ContextError::Unbound)
    }

    /// Wrap `future` so it runs under the caller's current context wherever it
    /// is eventually polled, e.g. after `tokio::spawn`.
    ///
    /// The context is captured when this is called, not when the future starts.
    pub fn propagate<F: Future>(future: F) -> TaskLocalFuture<Binding, F> {
        CURRENT.scope(RefCell::new(Self::current()), future)
    }
}
