//! Data Transfer Objects for API requests and responses.
//!
//! Responses are wrapped in `{ "data": { ... } }`; list responses add a
//! `pagination` object.

use serde::{Deserialize, Serialize};

use crate::domain::{
    ApiStatistic, CreateFarm, CreatePond, Farm, Page, Pagination, Pond, SortKey, SortOrder,
    UpdateFarm, UpdatePond,
};
use crate::infrastructure::{FarmFilter, PondFilter};

use super::error::ApiErrorResponse;

// =============================================================================
// Request DTOs
// =============================================================================

/// Request DTO for creating a farm.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateFarmRequest {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<CreateFarmRequest> for CreateFarm {
    fn from(request: CreateFarmRequest) -> Self {
        Self {
            id: request.id,
            name: request.name,
            description: request.description,
        }
    }
}

/// Request DTO for updating a farm. The id comes from the path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateFarmRequest {
    pub name: String,
    pub description: String,
}

impl From<UpdateFarmRequest> for UpdateFarm {
    fn from(request: UpdateFarmRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
        }
    }
}

/// Request DTO for creating a pond.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePondRequest {
    pub id: String,
    pub farm_id: String,
    pub name: String,
    pub description: String,
}

impl From<CreatePondRequest> for CreatePond {
    fn from(request: CreatePondRequest) -> Self {
        Self {
            id: request.id,
            farm_id: request.farm_id,
            name: request.name,
            description: request.description,
        }
    }
}

/// Request DTO for updating a pond. The id comes from the path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePondRequest {
    pub farm_id: String,
    pub name: String,
    pub description: String,
}

impl From<UpdatePondRequest> for UpdatePond {
    fn from(request: UpdatePondRequest) -> Self {
        Self {
            farm_id: request.farm_id,
            name: request.name,
            description: request.description,
        }
    }
}

// =============================================================================
// Query DTOs
// =============================================================================

/// Paging and ordering parameters shared by both list endpoints.
///
/// `page` and `limit` are read leniently: anything that is not an integer
/// falls back to the default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl PageQuery {
    /// Builds normalised pagination.
    ///
    /// # Errors
    ///
    /// Returns a 400 response if `sort` or `order` is not recognised.
    pub fn to_pagination(&self) -> Result<Pagination, ApiErrorResponse> {
        let number = |value: Option<&String>| {
            value
                .and_then(|value| value.trim().parse::<i64>().ok())
                .unwrap_or(0)
        };

        let sort = match non_blank(self.sort.as_ref()) {
            Some(value) => value
                .parse::<SortKey>()
                .map_err(|message| ApiErrorResponse::bad_request("INVALID_QUERY", message))?,
            None => SortKey::default(),
        };
        let order = match non_blank(self.order.as_ref()) {
            Some(value) => value
                .parse::<SortOrder>()
                .map_err(|message| ApiErrorResponse::bad_request("INVALID_QUERY", message))?,
            None => SortOrder::default(),
        };

        Ok(Pagination::new(number(self.page.as_ref()), number(self.limit.as_ref()))
            .sorted_by(sort, order))
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Query parameters for `GET /v1/farm`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFarmsQuery {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub page: PageQuery,
}

impl ListFarmsQuery {
    #[must_use]
    pub fn filter(&self) -> FarmFilter {
        FarmFilter {
            id: non_blank(self.id.as_ref()),
            name: non_blank(self.name.as_ref()),
        }
    }
}

/// Query parameters for `GET /v1/pond`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPondsQuery {
    pub id: Option<String>,
    pub farm_id: Option<String>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub page: PageQuery,
}

impl ListPondsQuery {
    #[must_use]
    pub fn filter(&self) -> PondFilter {
        PondFilter {
            id: non_blank(self.id.as_ref()),
            farm_id: non_blank(self.farm_id.as_ref()),
            name: non_blank(self.name.as_ref()),
        }
    }
}

// =============================================================================
// Response DTOs
// =============================================================================

/// Response DTO for a farm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FarmResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// RFC 3339 last update time.
    pub updated_at: String,
}

impl From<&Farm> for FarmResponse {
    fn from(farm: &Farm) -> Self {
        Self {
            id: farm.id.clone(),
            name: farm.name.clone(),
            description: farm.description.clone(),
            created_at: farm.created_at.as_datetime().to_rfc3339(),
            updated_at: farm.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

impl From<Farm> for FarmResponse {
    fn from(farm: Farm) -> Self {
        Self::from(&farm)
    }
}

/// Response DTO for a pond.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PondResponse {
    pub id: String,
    pub farm_id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Pond> for PondResponse {
    fn from(pond: &Pond) -> Self {
        Self {
            id: pond.id.clone(),
            farm_id: pond.farm_id.clone(),
            name: pond.name.clone(),
            description: pond.description.clone(),
            created_at: pond.created_at.as_datetime().to_rfc3339(),
            updated_at: pond.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

impl From<Pond> for PondResponse {
    fn from(pond: Pond) -> Self {
        Self::from(&pond)
    }
}

/// Page metadata of a list response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationResponse {
    pub page: u64,
    pub limit: u64,
    pub total_rows: u64,
    pub total_pages: u64,
}

impl<T> From<&Page<T>> for PaginationResponse {
    fn from(page: &Page<T>) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total_rows: page.total_rows,
            total_pages: page.total_pages,
        }
    }
}

// =============================================================================
// Envelopes
// =============================================================================

/// Response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationResponse>,
}

impl<T> DataResponse<T> {
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self {
            data,
            pagination: None,
        }
    }

    #[must_use]
    pub const fn paginated(data: T, pagination: PaginationResponse) -> Self {
        Self {
            data,
            pagination: Some(pagination),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmData {
    pub farm: FarmResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmsData {
    pub farms: Vec<FarmResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PondData {
    pub pond: PondResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PondsData {
    pub ponds: Vec<PondResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatisticsData {
    pub api_statistics: Vec<ApiStatistic>,
}
