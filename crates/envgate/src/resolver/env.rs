//! Read-only access to the process environment.
//!
//! Responsibilities:
//! - Define the `EnvSource` collaborator the resolver snapshots once per call.
//! - Provide helpers for reading a single variable with blank filtering.
//!
//! Does NOT handle:
//! - Writing to the environment. Nothing in this crate ever mutates it.
//!
//! Invariants:
//! - Variables whose name or value is not valid Unicode are skipped.
//! - Empty or whitespace-only values are treated as unset by `env_var_or_none`.

use crate::layer::Layer;

/// Source of the live process environment.
pub trait EnvSource: Send + Sync {
    /// Every variable currently set.
    fn snapshot(&self) -> Layer;

    /// A single variable.
    fn var(&self, key: &str) -> Option<String> {
        self.snapshot().remove(key)
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn snapshot(&self) -> Layer {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed map, mainly for tests and embedding.
impl EnvSource for Layer {
    fn snapshot(&self) -> Layer {
        self.clone()
    }

    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Read a variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(source: &dyn EnvSource, key: &str) -> Option<String> {
    source.var(key).and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}
