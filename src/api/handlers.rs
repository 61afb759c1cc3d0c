//! Shared handler state and the health probe.

use axum::Json;
use serde::Serialize;

use crate::infrastructure::Repositories;
use crate::service::{ApiStatisticService, FarmService, PondService};

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// Services hold trait objects, so the backends chosen by
/// [`crate::infrastructure::RepositoryFactory`] at startup are invisible here.
#[derive(Clone, Debug)]
pub struct AppState {
    pub farms: FarmService,
    pub ponds: PondService,
    pub statistics: ApiStatisticService,
}

impl AppState {
    /// Wires the services over initialized repositories.
    #[must_use]
    pub fn from_repositories(repositories: Repositories) -> Self {
        let farms = FarmService::new(repositories.farm_repository);
        let ponds = PondService::new(repositories.pond_repository, farms.clone());
        let statistics = ApiStatisticService::new(repositories.counter_store);
        Self {
            farms,
            ponds,
            statistics,
        }
    }
}

// =============================================================================
// GET /health Handler
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
