//! Error types for environment resolution.
//!
//! Responsibilities:
//! - Define the fatal error classes returned by `resolve_sync` / `resolve_async`.
//! - Define structural configuration errors raised before any I/O.
//!
//! Does NOT handle:
//! - Expansion or secret-fetch faults. Those are never fatal and only surface as logs.
//!
//! Invariants:
//! - `ResolveError::Validation` always displays the same fixed message; per-field
//!   details are emitted through the error log and kept in `issues`.
//! - No variant includes raw configuration values.

use thiserror::Error;

use crate::constants::VALIDATION_FAILED_MESSAGE;
use crate::loader::LoadError;
use crate::validation::FieldIssue;

/// The resolver was configured incorrectly. Raised before any file is read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralConfigError {
    #[error("both `schema` and `validator` were supplied; provide exactly one")]
    SchemaAndValidator,

    #[error("either `schema` or `validator` is required")]
    MissingSchemaOrValidator,

    #[error("schema must be an object schema, got a {kind} schema")]
    NotAnObjectSchema { kind: &'static str },

    #[error("invalid schema for field '{field}': {message}")]
    MalformedSchema { field: String, message: String },

    #[error("schema does not compile: {message}")]
    InvalidSchema { message: String },
}

/// Fatal failure of a resolver call.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid resolver configuration: {0}")]
    Structural(#[from] StructuralConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("{}", VALIDATION_FAILED_MESSAGE)]
    Validation { issues: Vec<FieldIssue> },
}

impl ResolveError {
    /// Field issues for a validation failure; empty for every other class.
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            ResolveError::Validation { issues } => issues,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_stable_and_detail_free() {
        let err = ResolveError::Validation {
            issues: vec![FieldIssue::at_key("API_URL", "Required")],
        };

        assert_eq!(err.to_string(), VALIDATION_FAILED_MESSAGE);
        assert_eq!(err.issues().len(), 1);
    }

    #[test]
    fn test_structural_error_wraps_message() {
        let err = ResolveError::from(StructuralConfigError::SchemaAndValidator);
        assert!(err.to_string().contains("exactly one"));
        assert!(err.issues().is_empty());
    }
}
