//! Layer factories for middleware

use tower_http::trace::{HttpMakeClassifier, TraceLayer};

/// HTTP tracing layer; request-level fields are added by the execution context
/// middleware's span.
pub fn trace() -> TraceLayer<HttpMakeClassifier> {
    TraceLayer::new_for_http()
}
