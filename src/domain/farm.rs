//! Farm domain model.


use super::lifecycle::{Lifecycle, Timestamp};
use super::validation::{ResourceKind, Validate, ValidationError, validate_common};

// =============================================================================
// Farm Entity
// =============================================================================

/// A farm. Owns zero or more ponds.
///
/// String fields hold trimmed values. Constructors never validate; call
/// [`Validate::validate`] before persisting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Farm {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub lifecycle: Lifecycle,
}

impl Farm {
    /// Creates an active farm stamped with `timestamp` for both creation and
    /// last update.
    #[must_use]
    pub fn new(
        id: impl AsRef<str>,
        name: impl AsRef<str>,
        description: impl AsRef<str>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: id.as_ref().trim().to_string(),
            name: name.as_ref().trim().to_string(),
            description: description.as_ref().trim().to_string(),
            created_at: timestamp,
            updated_at: timestamp,
            lifecycle: Lifecycle::Active,
        }
    }

    /// Returns the farm with new name and description.
    #[must_use]
    pub fn with_details(
        self,
        name: impl AsRef<str>,
        description: impl AsRef<str>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            description: description.as_ref().trim().to_string(),
            updated_at: timestamp,
            ..self
        }
    }

    /// Returns the farm in the deleted state.
    #[must_use]
    pub fn soft_deleted(self, at: Timestamp) -> Self {
        Self {
            updated_at: at,
            lifecycle: Lifecycle::Deleted { at },
            ..self
        }
    }

    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.lifecycle.is_deleted()
    }
}

impl Validate for Farm {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_common(ResourceKind::Farm, &self.id, &self.name, &self.description)
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Input for creating a farm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateFarm {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Input for updating (or upserting) a farm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateFarm {
    pub name: String,
    pub description: String,
}
