//! API layer - routes, handlers, and middleware

pub mod handlers;
pub mod middleware;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};

use crate::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let context = state.context;

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Favicon handler (returns 204 to prevent 404 logs)
        .route("/favicon.ico", get(favicon))
        .with_state(state)
        // Add middleware (applied in reverse order)
        .layer(axum::middleware::from_fn_with_state(
            context,
            middleware::execution_context_middleware,
        ))
        .layer(middleware::trace())
}

async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
