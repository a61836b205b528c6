//! Raw string to JSON coercion driven by a property's declared `type`.

use serde_json::{Number, Value};

/// Declared `type` of a property schema, as a list (`"a"` or `["a", "b"]`).
pub(crate) fn declared_types(property: &Value) -> Vec<String> {
    match property.get("type") {
        Some(Value::String(kind)) => vec![kind.clone()],
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Convert a raw environment string to the first declared type it fits.
///
/// A string that fits none stays a string, so the validator reports the type
/// mismatch against the declared type.
pub(crate) fn coerce(raw: &str, types: &[String]) -> Value {
    let accepts = |kind: &str| types.iter().any(|t| t == kind);

    if types.is_empty() || accepts("string") {
        return Value::String(raw.to_string());
    }

    let trimmed = raw.trim();
    if accepts("integer") {
        if let Ok(n) = trimmed.parse::<i64>() {
            return Value::from(n);
        }
        if let Ok(n) = trimmed.parse::<u64>() {
            return Value::from(n);
        }
    }
    if accepts("number")
        && let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64)
    {
        return Value::Number(n);
    }
    if accepts("boolean") {
        match trimmed.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => return Value::Bool(true),
            "false" | "0" | "no" | "off" => return Value::Bool(false),
            _ => {}
        }
    }
    if accepts("null") && trimmed.is_empty() {
        return Value::Null;
    }

    Value::String(raw.to_string())
}
