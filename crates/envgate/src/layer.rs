//! Layers and the merged environment input.
//!
//! Responsibilities:
//! - Define the `Layer` map produced by every configuration source.
//! - Assemble the single `EnvironmentInput` handed to a validation adapter.
//!
//! Invariants:
//! - When layers are merged, keys from a later layer replace keys from an earlier one.
//! - `EnvironmentInput` is only built through `assemble`, which fixes the
//!   file < secrets < process environment ordering.

use std::collections::BTreeMap;

use secrecy::ExposeSecret;

use crate::secrets::SecretLayer;

/// One name→value mapping contributed by a single configuration source.
pub type Layer = BTreeMap<String, String>;

/// Merge `overlay` into `base`, overlay keys winning.
pub(crate) fn merge_into(base: &mut Layer, overlay: Layer) {
    base.extend(overlay);
}

/// The fully merged input consumed by a [`ValidationAdapter`](crate::ValidationAdapter).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentInput {
    values: Layer,
}

impl EnvironmentInput {
    /// Merge the three runtime layers in precedence order.
    ///
    /// Secret values are exposed here and nowhere earlier.
    pub fn assemble(file: Layer, secrets: Option<SecretLayer>, process: Layer) -> Self {
        let mut values = file;
        if let Some(secrets) = secrets {
            for (key, value) in secrets {
                values.insert(key, value.expose_secret().to_string());
            }
        }
        merge_into(&mut values, process);
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Layer> for EnvironmentInput {
    fn from(values: Layer) -> Self {
        Self { values }
    }
}
