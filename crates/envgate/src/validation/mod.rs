//! Pluggable validation of the merged environment input.
//!
//! Responsibilities:
//! - Define the single-method `ValidationAdapter` capability and its normalized result.
//! - Provide the default `SchemaAdapter` over a JSON Schema compiled by `jsonschema`.
//!
//! Does NOT handle:
//! - Merging layers (see resolver) or reporting failures (see resolver/report.rs).
//!
//! Invariants:
//! - Adapters never mutate their input.
//! - Only `FieldIssue` crosses the adapter boundary; no library-specific error type does.

mod adapter;
mod coerce;

use std::fmt;

pub use adapter::SchemaAdapter;

use crate::layer::EnvironmentInput;

/// One segment of an issue path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A single field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Issue attached to a single top-level key.
    pub fn at_key(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![PathSegment::Key(key.into())], message)
    }

    /// Dotted rendering of the path, or `(root)` when it is empty.
    pub fn path_display(&self) -> String {
        if self.path.is_empty() {
            return "(root)".to_string();
        }
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path_display(), self.message)
    }
}

/// Outcome of validating an [`EnvironmentInput`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult<T> {
    Success { data: T },
    Failure { issues: Vec<FieldIssue> },
}

impl<T> ValidationResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success { .. })
    }

    pub fn into_result(self) -> Result<T, Vec<FieldIssue>> {
        match self {
            ValidationResult::Success { data } => Ok(data),
            ValidationResult::Failure { issues } => Err(issues),
        }
    }
}

/// Validates the merged environment input into a typed value.
///
/// Closures of the form `Fn(&EnvironmentInput) -> ValidationResult<T>` are
/// adapters too, so custom validation needs no wrapper type.
pub trait ValidationAdapter<T>: Send + Sync {
    fn validate(&self, input: &EnvironmentInput) -> ValidationResult<T>;
}

impl<T, F> ValidationAdapter<T> for F
where
    F: Fn(&EnvironmentInput) -> ValidationResult<T> + Send + Sync,
{
    fn validate(&self, input: &EnvironmentInput) -> ValidationResult<T> {
        self(input)
    }
}
