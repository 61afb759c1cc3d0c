//! API module for HTTP handlers.
//!
//! Handlers translate HTTP into service calls and service errors into
//! status codes. Resource routes are wrapped by the usage-recording
//! middleware.

pub mod dto;
pub mod error;
pub mod farm;
pub mod handlers;
pub mod middleware;
pub mod pond;
pub mod router;
pub mod statistic;

pub use dto::{
    ApiStatisticsData, CreateFarmRequest, CreatePondRequest, DataResponse, FarmData,
    FarmResponse, FarmsData, ListFarmsQuery, ListPondsQuery, PageQuery, PaginationResponse,
    PondData, PondResponse, PondsData, UpdateFarmRequest, UpdatePondRequest,
};
pub use error::{ApiError, ApiErrorResponse, FieldError};
pub use farm::{create_farm, delete_farm, get_farm, list_farms, update_farm};
pub use handlers::{AppState, HealthResponse, health_check};
pub use middleware::record_api_statistic;
pub use pond::{create_pond, delete_pond, get_pond, list_ponds, update_pond};
pub use router::router;
pub use statistic::get_api_statistics;
