//! Service module: resource lifecycle and usage statistics.
//!
//! Services own the business rules (validation order, upsert, soft delete,
//! referential checks) and talk to stores only through the traits in
//! [`crate::infrastructure`]. They do not log; callers decide what to report.

pub mod error;
pub mod farm;
pub mod pond;
pub mod statistic;

pub use error::ServiceError;
pub use farm::FarmService;
pub use pond::PondService;
pub use statistic::ApiStatisticService;

