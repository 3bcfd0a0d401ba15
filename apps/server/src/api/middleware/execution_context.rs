//! Execution context middleware
//!
//! The single place an inbound request acquires its execution id. Every request
//! gets a fresh UUID v4 and the rest of the stack (inner middleware and the
//! handler) runs inside a context scope for that id.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use execid_context::{ContextService, RequestContext};
use tokio::time::Instant;
use tracing::Span;

use crate::error::AppError;

/// Response header echoing the id assigned to the request.
pub const EXECUTION_ID_HEADER: &str = "x-execution-id";

#[tracing::instrument(
    name = "http_request",
    skip_all,
    fields(
        http.method = %req.method(),
        http.route = %req.uri().path(),
        http.response.status_code = tracing::field::Empty,
        execution_id = tracing::field::Empty,
    )
)]
pub async fn execution_context_middleware(
    State(context): State<ContextService>,
    req: Request,
    next: Next,
) -> Response {
    let current_span = Span::current();
    let start = Instant::now();

    let request_context = RequestContext::generate();
    let execution_id = request_context.execution_id().to_string();
    current_span.record("execution_id", execution_id.as_str());

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    tracing::debug!(method = %method, path = %path, "Incoming request");

    // Downstream failures are already responses at this point and pass through as-is.
    let mut response = match context.run_with_context(request_context, next.run(req)).await {
        Ok(response) => response,
        Err(e) => AppError::from(e).into_response(),
    };

    let status = response.status();
    current_span.record("http.response.status_code", status.as_u16());

    tracing::info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&execution_id) {
        response.headers_mut().insert(EXECUTION_ID_HEADER, value);
    }

    response
}
