//! Errors returned by the farm, pond and statistic services.

use thiserror::Error;

use crate::domain::ValidationError;
use crate::infrastructure::RepositoryError;

/// Typed failure of a service operation.
///
/// Lookups that find nothing return `Ok(None)` rather than an error, and
/// deleting an already-deleted record succeeds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The farm to delete does not exist.
    #[error("Farm Not Found")]
    FarmNotFound(String),

    /// The pond to delete does not exist.
    #[error("Pond Not Found")]
    PondNotFound(String),

    #[error("Farm Already Exist")]
    FarmAlreadyExists(String),

    #[error("Pond Already Exist")]
    PondAlreadyExists(String),

    /// A field rule failed. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The pond's owning farm is missing or deleted. Nothing was written.
    #[error("Farm Not Found")]
    ReferencedFarmNotFound(String),

    /// Any other store failure, passed through unchanged.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
