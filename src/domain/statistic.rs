//! Endpoint catalogue and usage statistics.

use serde::{Deserialize, Serialize};

/// Resource endpoints whose calls are counted.
///
/// Each endpoint is identified by its method and route template, e.g.
/// `GET /v1/farm/{id}`. That string doubles as the counter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiEndpoint {
    CreateFarm,
    ListFarms,
    GetFarm,
    UpdateFarm,
    DeleteFarm,
    CreatePond,
    ListPonds,
    GetPond,
    UpdatePond,
    DeletePond,
}

/// Suffix appended to an endpoint key to name its distinct-caller set.
const UNIQUE_CALLER_SUFFIX: &str = "ua";

impl ApiEndpoint {
    /// Every counted endpoint, in reporting order.
    pub const ALL: [Self; 10] = [
        Self::CreateFarm,
        Self::ListFarms,
        Self::GetFarm,
        Self::UpdateFarm,
        Self::DeleteFarm,
        Self::CreatePond,
        Self::ListPonds,
        Self::GetPond,
        Self::UpdatePond,
        Self::DeletePond,
    ];

    /// Method and route template.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::CreateFarm => "POST /v1/farm",
            Self::ListFarms => "GET /v1/farm",
            Self::GetFarm => "GET /v1/farm/{id}",
            Self::UpdateFarm => "PUT /v1/farm/{id}",
            Self::DeleteFarm => "DELETE /v1/farm/{id}",
            Self::CreatePond => "POST /v1/pond",
            Self::ListPonds => "GET /v1/pond",
            Self::GetPond => "GET /v1/pond/{id}",
            Self::UpdatePond => "PUT /v1/pond/{id}",
            Self::DeletePond => "DELETE /v1/pond/{id}",
        }
    }

    /// Key of the call counter.
    #[must_use]
    pub const fn counter_key(self) -> &'static str {
        self.path()
    }

    /// Key of the approximate distinct-caller set.
    #[must_use]
    pub fn unique_caller_key(self) -> String {
        format!("{}{UNIQUE_CALLER_SUFFIX}", self.path())
    }

    /// Resolves a request method and matched route template.
    ///
    /// Returns `None` for routes outside the catalogue.
    #[must_use]
    pub fn from_route(method: &str, route: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|endpoint| {
            endpoint
                .path()
                .split_once(' ')
                .is_some_and(|(endpoint_method, template)| {
                    endpoint_method.eq_ignore_ascii_case(method) && template == route
                })
        })
    }
}

impl std::fmt::Display for ApiEndpoint {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.path())
    }
}

/// Call count and distinct-caller estimate for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatistic {
    pub path: String,
    pub count: i64,
    #[serde(rename = "unique_user_agent")]
    pub unique_callers: u64,
}

impl ApiStatistic {
    #[must_use]
    pub fn new(endpoint: ApiEndpoint, count: i64, unique_callers: u64) -> Self {
        Self {
            path: endpoint.path().to_string(),
            count,
            unique_callers,
        }
    }
}
