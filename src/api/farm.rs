//! HTTP handlers for `/v1/farm`.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};

use super::dto::{
    CreateFarmRequest, DataResponse, FarmData, FarmResponse, FarmsData, ListFarmsQuery,
    PaginationResponse, UpdateFarmRequest,
};
use super::error::ApiErrorResponse;
use super::handlers::AppState;

const FARM_NOT_FOUND: &str = "Farm Not Found";

// =============================================================================
// POST /v1/farm
// =============================================================================

/// Creates a farm.
///
/// # Errors
///
/// - 400 on a malformed body or a failed field rule
/// - 409 if the id is taken
pub async fn create_farm(
    State(state): State<AppState>,
    payload: Result<Json<CreateFarmRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<FarmData>>), ApiErrorResponse> {
    let Json(request) = payload?;
    let farm = state.farms.create(request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(FarmData {
            farm: FarmResponse::from(farm),
        })),
    ))
}

// =============================================================================
// GET /v1/farm
// =============================================================================

/// Lists active farms.
///
/// # Errors
///
/// - 400 on an unknown sort key or order
/// - 404 if the requested page is empty
pub async fn list_farms(
    State(state): State<AppState>,
    query: Result<Query<ListFarmsQuery>, QueryRejection>,
) -> Result<Json<DataResponse<FarmsData>>, ApiErrorResponse> {
    let Query(query) = query?;
    let pagination = query.page.to_pagination()?;
    let page = state.farms.list(&query.filter(), &pagination).await?;

    if page.is_empty() {
        return Err(ApiErrorResponse::not_found(FARM_NOT_FOUND));
    }

    let page = page.map(FarmResponse::from);
    let metadata = PaginationResponse::from(&page);
    let farms = page.items;
    Ok(Json(DataResponse::paginated(FarmsData { farms }, metadata)))
}

// =============================================================================
// GET /v1/farm/{id}
// =============================================================================

/// Returns one active farm.
///
/// # Errors
///
/// Returns 404 if the farm is missing or deleted.
pub async fn get_farm(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<DataResponse<FarmData>>, ApiErrorResponse> {
    let Path(id) = path?;
    let farm = state
        .farms
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiErrorResponse::not_found(FARM_NOT_FOUND))?;

    Ok(Json(DataResponse::new(FarmData {
        farm: FarmResponse::from(farm),
    })))
}

// =============================================================================
// PUT /v1/farm/{id}
// =============================================================================

/// Updates a farm, creating it when no active farm has the id.
///
/// # Errors
///
/// - 400 on a malformed body or a failed field rule
/// - 409 if the id belongs to a deleted farm
pub async fn update_farm(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateFarmRequest>, JsonRejection>,
) -> Result<Json<DataResponse<FarmData>>, ApiErrorResponse> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let farm = state.farms.update(&id, request.into()).await?;

    Ok(Json(DataResponse::new(FarmData {
        farm: FarmResponse::from(farm),
    })))
}

// =============================================================================
// DELETE /v1/farm/{id}
// =============================================================================

/// Soft-deletes a farm. Repeating the call succeeds.
///
/// # Errors
///
/// Returns 404 if no farm ever had the id.
pub async fn delete_farm(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<DataResponse<()>>, ApiErrorResponse> {
    let Path(id) = path?;
    state.farms.soft_delete(&id).await?;
    Ok(Json(DataResponse::new(())))
}
