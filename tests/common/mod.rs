//! Common test helpers for integration tests.
//!
//! The `#![allow(dead_code)]` attribute is necessary because Rust compiles each
//! integration test file as a separate crate and not every file uses every
//! helper.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use farm_service::api::{AppState, router};
use farm_service::domain::{CreateFarm, CreatePond, Farm, Pond};
use farm_service::infrastructure::{
    CounterStore, Repositories, RepositoryError, RepositoryFuture,
};

// =============================================================================
// AppState Creation Helpers
// =============================================================================

/// Creates a test `AppState` over in-memory stores.
pub fn create_test_app_state() -> AppState {
    AppState::from_repositories(Repositories::in_memory())
}

/// Creates the full router over a fresh in-memory state.
pub fn create_test_router() -> (Router, AppState) {
    let state = create_test_app_state();
    (router(state.clone()), state)
}

/// Creates the router with in-memory record stores and the given counter store.
pub fn create_router_with_counter_store(
    counter_store: Arc<dyn CounterStore + Send + Sync>,
) -> (Router, AppState) {
    let repositories = Repositories {
        counter_store,
        ..Repositories::in_memory()
    };
    let state = AppState::from_repositories(repositories);
    (router(state.clone()), state)
}

// =============================================================================
// Counter Store Doubles
// =============================================================================

/// Counter store whose every operation fails.
#[derive(Debug, Default)]
pub struct UnavailableCounterStore;

fn unavailable<T: Send + 'static>() -> RepositoryFuture<T> {
    Box::pin(async { Err(RepositoryError::CacheError("connection refused".to_string())) })
}

impl CounterStore for UnavailableCounterStore {
    fn increment(&self, _key: &str, _delta: i64) -> RepositoryFuture<i64> {
        unavailable()
    }

    fn add_to_approx_set(&self, _key: &str, _element: &str) -> RepositoryFuture<()> {
        unavailable()
    }

    fn approx_set_cardinality(&self, _key: &str) -> RepositoryFuture<u64> {
        unavailable()
    }

    fn get(&self, _key: &str) -> RepositoryFuture<Option<i64>> {
        unavailable()
    }
}

// =============================================================================
// Fixture Helpers
// =============================================================================

pub async fn create_farm(state: &AppState, id: &str) -> Farm {
    state
        .farms
        .create(CreateFarm {
            id: id.to_string(),
            name: format!("Farm {id}"),
            description: "rice fields".to_string(),
        })
        .await
        .expect("farm should be created")
}

pub async fn create_pond(state: &AppState, id: &str, farm_id: &str) -> Pond {
    state
        .ponds
        .create(CreatePond {
            id: id.to_string(),
            farm_id: farm_id.to_string(),
            name: format!("Pond {id}"),
            description: "tilapia".to_string(),
        })
        .await
        .expect("pond should be created")
}

// =============================================================================
// HTTP Helpers
// =============================================================================

/// Sends one request through the router and returns status and JSON body.
///
/// An empty body is returned as `Value::Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user_agent: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_agent) = user_agent {
        builder = builder.header(header::USER_AGENT, user_agent);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Sends a raw body without JSON encoding.
pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> StatusCode {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
        .status()
}

/// Polls the statistics endpoint until `path` reports `count` calls.
///
/// Recording runs on spawned tasks, so the counter trails the responses.
pub async fn wait_for_count(app: &Router, path: &str, count: i64) -> Value {
    for _ in 0..100 {
        let (_, body) = send(app, "GET", "/v1/api/statistic", None, None).await;
        if let Some(statistic) = find_statistic(&body, path) {
            if statistic["count"] == count {
                return statistic;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{path} never reached {count} calls");
}

pub fn find_statistic(body: &Value, path: &str) -> Option<Value> {
    body["data"]["api_statistics"]
        .as_array()?
        .iter()
        .find(|statistic| statistic["path"] == path)
        .cloned()
}
