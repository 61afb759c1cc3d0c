//! Domain module for farm and pond management.
//!
//! This module contains the resource entities, their lifecycle state,
//! validation rules, pagination arithmetic and the endpoint catalogue used
//! for usage statistics.

pub mod farm;
pub mod lifecycle;
pub mod pagination;
pub mod pond;
pub mod statistic;
pub mod validation;

pub use farm::{CreateFarm, Farm, UpdateFarm};
pub use lifecycle::{Lifecycle, Timestamp};
pub use pagination::{Page, PageWindow, Pagination, SortKey, SortOrder, paginate};
pub use pond::{CreatePond, Pond, UpdatePond};
pub use statistic::{ApiEndpoint, ApiStatistic};
pub use validation::{ResourceKind, Validate, ValidationError};
