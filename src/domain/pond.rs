//! Pond domain model.


use super::lifecycle::{Lifecycle, Timestamp};
use super::validation::{
    ID_MAX_LENGTH, ResourceKind, Validate, ValidationError, check_id, check_length,
    check_name_and_description,
};

// =============================================================================
// Pond Entity
// =============================================================================

/// A pond belonging to one farm.
///
/// `farm_id` is a plain identifier; the farm is looked up on demand and
/// never embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pond {
    pub id: String,
    pub farm_id: String,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub lifecycle: Lifecycle,
}

impl Pond {
    #[must_use]
    pub fn new(
        id: impl AsRef<str>,
        farm_id: impl AsRef<str>,
        name: impl AsRef<str>,
        description: impl AsRef<str>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: id.as_ref().trim().to_string(),
            farm_id: farm_id.as_ref().trim().to_string(),
            name: name.as_ref().trim().to_string(),
            description: description.as_ref().trim().to_string(),
            created_at: timestamp,
            updated_at: timestamp,
            lifecycle: Lifecycle::Active,
        }
    }

    /// Returns the pond with a new owner, name and description.
    #[must_use]
    pub fn with_details(
        self,
        farm_id: impl AsRef<str>,
        name: impl AsRef<str>,
        description: impl AsRef<str>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            farm_id: farm_id.as_ref().trim().to_string(),
            name: name.as_ref().trim().to_string(),
            description: description.as_ref().trim().to_string(),
            updated_at: timestamp,
            ..self
        }
    }

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

impl Validate for Pond {
    fn validate(&self) -> Result<(), ValidationError> {
        check_id(ResourceKind::Pond, &self.id)?;
        check_length(
            &self.farm_id,
            ID_MAX_LENGTH,
            ValidationError::FarmIdRequired,
            ValidationError::FarmIdMaxLength,
        )?;
        check_name_and_description(ResourceKind::Pond, &self.name, &self.description)
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Input for creating a pond.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePond {
    pub id: String,
    pub farm_id: String,
    pub name: String,
    pub description: String,
}

/// Input for updating (or upserting) a pond.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePond {
    pub farm_id: String,
    pub name: String,
    pub description: String,
}
