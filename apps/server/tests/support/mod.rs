#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use execid_context::{ContextRunner, ContextService, RequestContext};
use execid_server::{
    api::create_router,
    metrics::{MetricsError, MetricsSource, ProcessSample},
    AppState, Config,
};
use futures::future::BoxFuture;
use tower::ServiceExt as _;
use uuid::Uuid;

pub const MB: u64 = 1024 * 1024;

pub fn config_with(pairs: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> =
        HashMap::from([("APP_ENV".to_string(), "test".to_string())]);
    vars.extend(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    Config::from_env_map(vars).expect("test config")
}

pub struct FixedMetrics(pub ProcessSample);

impl MetricsSource for FixedMetrics {
    fn sample(&self) -> Result<ProcessSample, MetricsError> {
        Ok(self.0)
    }
}

pub struct FailingMetrics;

impl MetricsSource for FailingMetrics {
    fn sample(&self) -> Result<ProcessSample, MetricsError> {
        Err(MetricsError("sysctl denied".into()))
    }
}

pub fn mocked_sample() -> ProcessSample {
    ProcessSample {
        heap_used_bytes: 50 * MB,
        heap_total_bytes: 100 * MB,
        external_bytes: 10 * MB,
        cpu_user_micros: 100_000,
        cpu_system_micros: 50_000,
    }
}

pub struct TestApp {
    pub router: Router,
    pub context: ContextService,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(FixedMetrics(mocked_sample())))
    }

    pub fn with_metrics(metrics: Arc<dyn MetricsSource>) -> Self {
        let context = ContextService::new();
        let state = AppState::with_metrics(config_with(&[]), context, metrics);
        Self {
            router: create_router(state),
            context,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let execution_id = response
            .headers()
            .get("x-execution-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            execution_id,
            json,
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub execution_id: Option<String>,
    pub json: serde_json::Value,
}

pub fn is_uuid_v4(s: &str) -> bool {
    Uuid::parse_str(s)
        .map(|u| u.get_version_num() == 4 && u.hyphenated().to_string() == s)
        .unwrap_or(false)
}

/// Wraps the real service and records every scope it is asked to open.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    inner: ContextService,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingRunner {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ContextRunner for RecordingRunner {
    fn run_with_context<'a, F>(
        &'a self,
        context: RequestContext,
        body: F,
    ) -> BoxFuture<'a, execid_context::Result<F::Output>>
    where
        F: std::future::Future + Send + 'a,
        F::Output: Send + 'a,
    {
        self.calls
            .lock()
            .unwrap()
            .push(context.execution_id().to_string());
        ContextRunner::run_with_context(&self.inner, context, body)
    }
}
