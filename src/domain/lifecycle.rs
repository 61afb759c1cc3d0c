//! Lifecycle state shared by farms and ponds.

use chrono::{DateTime, SubsecRound, Utc};

// =============================================================================
// Timestamp
// =============================================================================

/// A UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a `Timestamp` from a `DateTime<Utc>`.
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Returns the inner `DateTime<Utc>`.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the current time as a `Timestamp`, truncated to microseconds.
    ///
    /// `TIMESTAMPTZ` keeps microseconds, so a value returned from a write
    /// equals the one read back later.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(6))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Whether a record is live or soft-deleted.
///
/// A deleted record keeps its row; it is only hidden from listing and
/// lookup-by-id. The deletion time exists exactly when the record is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Active,
    Deleted { at: Timestamp },
}

impl Lifecycle {
    /// Builds the lifecycle from a nullable deletion timestamp column.
    #[must_use]
    pub fn from_deleted_at(deleted_at: Option<DateTime<Utc>>) -> Self {
        deleted_at.map_or(Self::Active, |at| Self::Deleted {
            at: Timestamp::from_datetime(at),
        })
    }

    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted { .. })
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_deleted()
    }

    /// Returns the deletion time, if deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<Timestamp> {
        match self {
            Self::Active => None,
            Self::Deleted { at } => Some(*at),
        }
    }
}
