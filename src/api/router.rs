//! Route table.

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;

use super::farm::{create_farm, delete_farm, get_farm, list_farms, update_farm};
use super::handlers::{AppState, health_check};
use super::middleware::record_api_statistic;
use super::pond::{create_pond, delete_pond, get_pond, list_ponds, update_pond};
use super::statistic::get_api_statistics;

/// Builds the application router without transport layers.
///
/// Only the resource routes sit under the recording layer; the statistics
/// and health routes are added after it and are never counted.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/farm", get(list_farms).post(create_farm))
        .route(
            "/v1/farm/{id}",
            get(get_farm).put(update_farm).delete(delete_farm),
        )
        .route("/v1/pond", get(list_ponds).post(create_pond))
        .route(
            "/v1/pond/{id}",
            get(get_pond).put(update_pond).delete(delete_pond),
        )
        .route_layer(from_fn_with_state(state.clone(), record_api_statistic))
        .route("/v1/api/statistic", get(get_api_statistics))
        .route("/health", get(health_check))
        .with_state(state)
}
