//! HTTP handlers for `/v1/pond`.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};

use super::dto::{
    CreatePondRequest, DataResponse, ListPondsQuery, PaginationResponse, PondData, PondResponse,
    PondsData, UpdatePondRequest,
};
use super::error::ApiErrorResponse;
use super::handlers::AppState;

const POND_NOT_FOUND: &str = "Pond Not Found";

/// Creates a pond under an active farm.
///
/// # Errors
///
/// - 400 on a malformed body, a missing owning farm or a failed field rule
/// - 409 if the id is taken
pub async fn create_pond(
    State(state): State<AppState>,
    payload: Result<Json<CreatePondRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<PondData>>), ApiErrorResponse> {
    let Json(request) = payload?;
    let pond = state.ponds.create(request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(PondData {
            pond: PondResponse::from(pond),
        })),
    ))
}

/// Lists active ponds, optionally narrowed to one farm.
///
/// # Errors
///
/// - 400 on an unknown sort key or order
/// - 404 if the requested page is empty
pub async fn list_ponds(
    State(state): State<AppState>,
    query: Result<Query<ListPondsQuery>, QueryRejection>,
) -> Result<Json<DataResponse<PondsData>>, ApiErrorResponse> {
    let Query(query) = query?;
    let pagination = query.page.to_pagination()?;
    let page = state.ponds.list(&query.filter(), &pagination).await?;

    if page.is_empty() {
        return Err(ApiErrorResponse::not_found(POND_NOT_FOUND));
    }

    let page = page.map(PondResponse::from);
    let metadata = PaginationResponse::from(&page);
    let ponds = page.items;
    Ok(Json(DataResponse::paginated(PondsData { ponds }, metadata)))
}

/// # Errors
///
/// Returns 404 if the pond is missing or deleted.
pub async fn get_pond(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<DataResponse<PondData>>, ApiErrorResponse> {
    let Path(id) = path?;
    let pond = state
        .ponds
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiErrorResponse::not_found(POND_NOT_FOUND))?;

    Ok(Json(DataResponse::new(PondData {
        pond: PondResponse::from(pond),
    })))
}

/// Updates a pond, creating it when no active pond has the id.
///
/// # Errors
///
/// Same as [`create_pond`].
pub async fn update_pond(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdatePondRequest>, JsonRejection>,
) -> Result<Json<DataResponse<PondData>>, ApiErrorResponse> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let pond = state.ponds.update(&id, request.into()).await?;

    Ok(Json(DataResponse::new(PondData {
        pond: PondResponse::from(pond),
    })))
}

/// # Errors
///
/// Returns 404 if no pond ever had the id.
pub async fn delete_pond(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<DataResponse<()>>, ApiErrorResponse> {
    let Path(id) = path?;
    state.ponds.soft_delete(&id).await?;
    Ok(Json(DataResponse::new(())))
}
