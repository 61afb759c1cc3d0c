//! Field validation for farms and ponds.
//!
//! Validation is pure and stops at the first failing field. The check order
//! is fixed: id, then the owning farm id (ponds only), then name, then
//! description. Values are trimmed before checking and lengths are counted
//! in characters.

use thiserror::Error;

/// Maximum length of a resource identifier.
pub const ID_MAX_LENGTH: usize = 36;

/// Maximum length of a resource name.
pub const NAME_MAX_LENGTH: usize = 100;

/// Maximum length of a resource description.
pub const DESCRIPTION_MAX_LENGTH: usize = 150;

// =============================================================================
// Resource Kind
// =============================================================================

/// Which resource a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Farm,
    Pond,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Farm => write!(formatter, "Farm"),
            Self::Pond => write!(formatter, "Pond"),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single failed field rule.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} ID Required")]
    IdRequired(ResourceKind),

    #[error("{0} ID Max Length")]
    IdMaxLength(ResourceKind),

    /// The owning farm identifier of a pond is blank.
    #[error("Farm ID Required")]
    FarmIdRequired,

    /// The owning farm identifier of a pond is too long.
    #[error("Farm ID Max Length")]
    FarmIdMaxLength,

    #[error("{0} Name Required")]
    NameRequired(ResourceKind),

    #[error("{0} Name Max Length")]
    NameMaxLength(ResourceKind),

    #[error("{0} Description Required")]
    DescriptionRequired(ResourceKind),

    #[error("{0} Description Max Length")]
    DescriptionMaxLength(ResourceKind),
}

impl ValidationError {
    /// Returns the name of the offending field as it appears in request bodies.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::IdRequired(_) | Self::IdMaxLength(_) => "id",
            Self::FarmIdRequired | Self::FarmIdMaxLength => "farm_id",
            Self::NameRequired(_) | Self::NameMaxLength(_) => "name",
            Self::DescriptionRequired(_) | Self::DescriptionMaxLength(_) => "description",
        }
    }
}

// =============================================================================
// Validate Trait
// =============================================================================

/// Implemented by entities that carry field rules.
pub trait Validate {
    /// Checks every field rule in order and returns the first failure.
    ///
    /// # Errors
    ///
    /// Returns the `ValidationError` of the first field that breaks its rule.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Checks that a trimmed value is present and at most `max_length` characters.
///
/// # Errors
///
/// Returns `required` for a blank value and `too_long` for an oversized one.
pub fn check_length(
    value: &str,
    max_length: usize,
    required: ValidationError,
    too_long: ValidationError,
) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(required);
    }
    if trimmed.chars().count() > max_length {
        return Err(too_long);
    }
    Ok(())
}

/// Validates the fields common to farms and ponds, in order.
///
/// # Errors
///
/// Returns the first failing rule among id, name and description.
pub fn validate_common(
    kind: ResourceKind,
    id: &str,
    name: &str,
    description: &str,
) -> Result<(), ValidationError> {
    check_id(kind, id)?;
    check_name_and_description(kind, name, description)
}

pub(crate) fn check_id(kind: ResourceKind, id: &str) -> Result<(), ValidationError> {
    check_length(
        id,
        ID_MAX_LENGTH,
        ValidationError::IdRequired(kind),
        ValidationError::IdMaxLength(kind),
    )
}

pub(crate) fn check_name_and_description(
    kind: ResourceKind,
    name: &str,
    description: &str,
) -> Result<(), ValidationError> {
    check_length(
        name,
        NAME_MAX_LENGTH,
        ValidationError::NameRequired(kind),
        ValidationError::NameMaxLength(kind),
    )?;
    check_length(
        description,
        DESCRIPTION_MAX_LENGTH,
        ValidationError::DescriptionRequired(kind),
        ValidationError::DescriptionMaxLength(kind),
    )
}
