//! `${NAME}` expansion within the file layer.
//!
//! Responsibilities:
//! - Define the `Interpolator` collaborator and its default `PlaceholderInterpolator`.
//! - Apply expansion through `expand_layer`, which never fails the resolution.
//!
//! Does NOT handle:
//! - Lookups in the process environment or in fetched secrets. References only
//!   resolve against the same layer.
//!
//! Invariants:
//! - Disabled expansion or an empty layer never invokes the interpolator.
//! - An interpolator error is logged and the unexpanded layer is returned.
//! - A reference to an unknown name, or one that would re-enter a name already
//!   being expanded, becomes an empty string.

use std::collections::HashSet;
use thiserror::Error;

use crate::layer::Layer;

/// Failure inside an interpolation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpolateError {
    #[error("unterminated placeholder in `{key}`")]
    Unterminated { key: String },

    #[error("invalid placeholder name in `{key}`")]
    InvalidName { key: String },
}

/// Rewrites a layer's values using references to the same layer.
pub trait Interpolator: Send + Sync {
    fn interpolate(&self, layer: &Layer) -> Result<Layer, InterpolateError>;
}

/// Default engine: recursive `${NAME}` substitution with cycle protection.
///
/// `\${` produces a literal `${`. A lone `$` not followed by `{` is kept as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderInterpolator;

impl Interpolator for PlaceholderInterpolator {
    fn interpolate(&self, layer: &Layer) -> Result<Layer, InterpolateError> {
        let mut expanded = Layer::new();
        for key in layer.keys() {
            let mut active = HashSet::new();
            let value = resolve_name(key, layer, &mut active)?;
            expanded.insert(key.clone(), value);
        }
        Ok(expanded)
    }
}

fn resolve_name(
    name: &str,
    layer: &Layer,
    active: &mut HashSet<String>,
) -> Result<String, InterpolateError> {
    let Some(raw) = layer.get(name) else {
        return Ok(String::new());
    };
    if !active.insert(name.to_string()) {
        return Ok(String::new());
    }
    let value = substitute(name, raw, layer, active);
    active.remove(name);
    value
}

fn substitute(
    key: &str,
    raw: &str,
    layer: &Layer,
    active: &mut HashSet<String>,
) -> Result<String, InterpolateError> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find("${") {
        if rest[..pos].ends_with('\\') {
            out.push_str(&rest[..pos - 1]);
            out.push_str("${");
            rest = &rest[pos + 2..];
            continue;
        }

        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let end = after.find('}').ok_or_else(|| InterpolateError::Unterminated {
            key: key.to_string(),
        })?;
        let name = &after[..end];
        if !is_placeholder_name(name) {
            return Err(InterpolateError::InvalidName {
                key: key.to_string(),
            });
        }

        if !active.contains(name) {
            out.push_str(&resolve_name(name, layer, active)?);
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
}

/// Expand `layer` if enabled, falling back to the original on failure.
pub fn expand_layer(layer: Layer, enabled: bool, interpolator: &dyn Interpolator) -> Layer {
    if !enabled || layer.is_empty() {
        return layer;
    }

    match interpolator.interpolate(&layer) {
        Ok(expanded) => expanded,
        Err(e) => {
            tracing::error!(error = %e, "Variable expansion failed; using unexpanded values");
            layer
        }
    }
}
