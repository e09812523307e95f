use thiserror::Error;

use super::MediaId;

/// A write the store refused because it would break a data invariant.
///
/// Raised before anything is committed; the enclosing transaction is rolled
/// back and the store is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Duplicate {0}")]
    Duplicate(String),

    #[error(
        "Media {media1} and {media2} are already related; remove the existing relationship first"
    )]
    DuplicateRelationship { media1: MediaId, media2: MediaId },

    #[error("Media {0} cannot be related to itself")]
    SelfRelationship(MediaId),
}

impl ConstraintViolation {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for violations caused by a row that already exists.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::Duplicate(_) | Self::DuplicateRelationship { .. }
        )
    }
}
