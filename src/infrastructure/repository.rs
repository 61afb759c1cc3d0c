//! Record store traits for farms and ponds.
//!
//! Every method returns a boxed `Send` future so that implementations can be
//! selected at runtime and shared as `Arc<dyn ...>` across handlers.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::{Farm, Pagination, Pond};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// A record with the same identifier already exists.
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Counter store error.
    #[error("Cache error: {0}")]
    CacheError(String),
}

/// Result future returned by every store method.
pub type RepositoryFuture<T> = BoxFuture<'static, Result<T, RepositoryError>>;

// =============================================================================
// Filters
// =============================================================================

/// Optional exact-match filter for farm listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FarmFilter {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl FarmFilter {
    /// Returns true if the farm satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, farm: &Farm) -> bool {
        self.id.as_ref().is_none_or(|id| farm.id == *id)
            && self.name.as_ref().is_none_or(|name| farm.name == *name)
    }
}

/// Optional exact-match filter for pond listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PondFilter {
    pub id: Option<String>,
    pub farm_id: Option<String>,
    pub name: Option<String>,
}

impl PondFilter {
    /// Returns true if the pond satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, pond: &Pond) -> bool {
        self.id.as_ref().is_none_or(|id| pond.id == *id)
            && self
                .farm_id
                .as_ref()
                .is_none_or(|farm_id| pond.farm_id == *farm_id)
            && self.name.as_ref().is_none_or(|name| pond.name == *name)
    }
}

// =============================================================================
// Farm Repository
// =============================================================================

/// Record store for farms.
pub trait FarmRepository: Send + Sync {
    /// Inserts a new farm.
    ///
    /// Fails with `RepositoryError::Duplicate` if a row with the same id
    /// exists, deleted or not.
    fn insert(&self, farm: &Farm) -> RepositoryFuture<()>;

    /// Finds a farm by id, including soft-deleted rows.
    fn find_by_id(&self, id: &str) -> RepositoryFuture<Option<Farm>>;

    /// Lists active farms matching the filter, ordered and bounded by the
    /// pagination.
    fn find_many(
        &self,
        filter: &FarmFilter,
        pagination: &Pagination,
    ) -> RepositoryFuture<Vec<Farm>>;

    /// Counts active farms matching the filter.
    fn count(&self, filter: &FarmFilter) -> RepositoryFuture<u64>;

    /// Overwrites an existing farm row by id.
    fn save(&self, farm: &Farm) -> RepositoryFuture<()>;
}

// =============================================================================
// Pond Repository
// =============================================================================

/// Record store for ponds.
pub trait PondRepository: Send + Sync {
    fn insert(&self, pond: &Pond) -> RepositoryFuture<()>;

    /// Finds a pond by id, including soft-deleted rows.
    fn find_by_id(&self, id: &str) -> RepositoryFuture<Option<Pond>>;

    fn find_many(
        &self,
        filter: &PondFilter,
        pagination: &Pagination,
    ) -> RepositoryFuture<Vec<Pond>>;

    fn count(&self, filter: &PondFilter) -> RepositoryFuture<u64>;

    fn save(&self, pond: &Pond) -> RepositoryFuture<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;
    use rstest::rstest;

    #[rstest]
    fn test_farm_filter_matches() {
        let farm = Farm::new("f1", "North", "fields", Timestamp::now());

        assert!(FarmFilter::default().matches(&farm));
        assert!(
            FarmFilter {
                id: Some("f1".to_string()),
                name: Some("North".to_string()),
            }
            .matches(&farm)
        );
        assert!(
            !FarmFilter {
                id: None,
                name: Some("South".to_string()),
            }
            .matches(&farm)
        );
    }

    #[rstest]
    fn test_pond_filter_matches_owner() {
        let pond = Pond::new("p1", "f1", "Koi", "deep", Timestamp::now());
        let by_owner = |farm_id: &str| PondFilter {
            farm_id: Some(farm_id.to_string()),
            ..PondFilter::default()
        };

        assert!(by_owner("f1").matches(&pond));
        assert!(!by_owner("f2").matches(&pond));
    }

    #[rstest]
    fn test_repository_error_display() {
        let error = RepositoryError::DatabaseError("connection refused".to_string());
        assert_eq!(error.to_string(), "Database error: connection refused");

        let error = RepositoryError::Duplicate("f1".to_string());
        assert!(error.to_string().contains("f1"));
    }
}
