//! HTTP handler for `/v1/api/statistic`.

use axum::{Json, extract::State};

use super::dto::{ApiStatisticsData, DataResponse};
use super::error::ApiErrorResponse;
use super::handlers::AppState;

/// Call counts and distinct User-Agent estimates for every resource endpoint.
///
/// # Errors
///
/// Returns 500 if the counter store cannot be read.
pub async fn get_api_statistics(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<ApiStatisticsData>>, ApiErrorResponse> {
    let api_statistics = state.statistics.statistics().await?;
    Ok(Json(DataResponse::new(ApiStatisticsData { api_statistics })))
}
