// Copyright 2025 Cowboy AI, LLC.

//! Error types for composition operations

use thiserror::Error;

use crate::identifiers::{ConceptId, FieldId, ModelId};

/// Errors that can occur while composing a dataset from data models
///
/// Every error is a local validation failure of a single call. Nothing is
/// retried and no partial result is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    /// A referenced model id does not exist in the catalog
    #[error("Unknown model: {0}")]
    UnknownModel(ModelId),

    /// A join targets the primary model or repeats a secondary model
    #[error("Invalid join: {reason}")]
    InvalidJoin {
        /// Why the join was rejected
        reason: String,
    },

    /// A chosen field id is not a member of the collision (or draft) it was applied to
    #[error("Invalid selection: field {0} is not a member of the collision")]
    InvalidSelection(FieldId),

    /// No collision in the composition carries the concept id
    #[error("Unknown concept: {0}")]
    UnknownConcept(ConceptId),

    /// A value violates a structural rule of its type
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A model declares the same field id twice
    #[error("Duplicate field {field_id} in model {model_id}")]
    DuplicateField {
        /// Model declaring the duplicate
        model_id: ModelId,
        /// The repeated field id
        field_id: FieldId,
    },

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for composition operations
pub type CompositionResult<T> = Result<T, CompositionError>;

impl From<serde_json::Error> for CompositionError {
    fn from(err: serde_json::Error) -> Self {
        CompositionError::InvalidConfig(err.to_string())
    }
}

impl CompositionError {
    /// Create an invalid join error
    pub fn invalid_join(reason: impl Into<String>) -> Self {
        CompositionError::InvalidJoin {
            reason: reason.into(),
        }
    }

    /// Check if this is an unknown model error
    pub fn is_unknown_model(&self) -> bool {
        matches!(self, CompositionError::UnknownModel(_))
    }

    /// Check if this is an invalid join error
    pub fn is_invalid_join(&self) -> bool {
        matches!(self, CompositionError::InvalidJoin { .. })
    }

    /// Check if this is an invalid selection error
    pub fn is_invalid_selection(&self) -> bool {
        matches!(self, CompositionError::InvalidSelection(_))
    }

    /// Check if this is an unknown concept error
    pub fn is_unknown_concept(&self) -> bool {
        matches!(self, CompositionError::UnknownConcept(_))
    }

    /// Check if this error stems from how the caller assembled its input
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            CompositionError::UnknownModel(_)
                | CompositionError::InvalidJoin { .. }
                | CompositionError::InvalidSelection(_)
                | CompositionError::UnknownConcept(_)
                | CompositionError::DuplicateField { .. }
        )
    }
}
