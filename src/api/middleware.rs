//! Endpoint usage recording.

use axum::extract::{MatchedPath, Request, State};
use axum::http::header::USER_AGENT;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::AppState;
use crate::domain::ApiEndpoint;

/// Counts the call against its catalogue endpoint before running the handler.
///
/// Recording runs on a spawned task so store latency never delays the
/// response; a failed write is logged and otherwise ignored. Requests whose
/// route is not in the catalogue pass through untouched.
pub async fn record_api_statistic(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .and_then(|route| ApiEndpoint::from_route(request.method().as_str(), route.as_str()));

    if let Some(endpoint) = endpoint {
        let user_agent = request
            .headers()
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let statistics = state.statistics.clone();

        tokio::spawn(async move {
            if let Err(error) = statistics.record_call(endpoint, &user_agent).await {
                tracing::warn!(%error, %endpoint, "Failed to record endpoint call");
            }
        });
    }

    next.run(request).await
}
