//! Default validation adapter over a JSON Schema.
//!
//! Responsibilities:
//! - Reject non-object or uncompilable schemas at construction, before any resolution I/O.
//! - Fill declared defaults, coerce raw strings to each property's declared type,
//!   and validate the typed object with `jsonschema`.
//! - Deserialize the validated object into the caller's `T` with `serde_json`.
//!
//! Invariants:
//! - Undeclared input keys are ignored and never reach `T`.
//! - All field issues are reported together, never only the first.
//! - Issue messages are derived from the error kind and never echo input values.

use std::marker::PhantomData;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::coerce::{coerce, declared_types};
use super::{FieldIssue, PathSegment, ValidationAdapter, ValidationResult};
use crate::error::StructuralConfigError;
use crate::layer::EnvironmentInput;

struct Property {
    name: String,
    types: Vec<String>,
    default: Option<Value>,
}

/// Validates input against an object JSON Schema and produces a `T`.
pub struct SchemaAdapter<T> {
    validator: Validator,
    properties: Vec<Property>,
    _output: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for SchemaAdapter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaAdapter")
            .field(
                "properties",
                &self.properties.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T> SchemaAdapter<T> {
    /// Check the schema's structure and compile it.
    ///
    /// Format keywords such as `"format": "uri"` are asserted, not only annotated.
    pub fn new(schema: Value) -> Result<Self, StructuralConfigError> {
        let kind = root_kind(&schema);
        if kind != "object" {
            return Err(StructuralConfigError::NotAnObjectSchema { kind });
        }

        let mut properties = Vec::new();
        if let Some(declared) = schema.get("properties").and_then(Value::as_object) {
            for (name, property) in declared {
                let malformed = |message: &str| StructuralConfigError::MalformedSchema {
                    field: name.clone(),
                    message: message.to_string(),
                };

                if name.trim().is_empty() {
                    return Err(malformed("property name must not be empty"));
                }
                let types = declared_types(property);
                if types.iter().any(|t| t == "object" || t == "array") {
                    return Err(malformed("nested object and array schemas are not supported"));
                }
                if property
                    .get("enum")
                    .and_then(Value::as_array)
                    .is_some_and(Vec::is_empty)
                {
                    return Err(malformed("enum must declare at least one value"));
                }

                properties.push(Property {
                    name: name.clone(),
                    types,
                    default: property.get("default").cloned(),
                });
            }
        }

        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(&schema)
            .map_err(|e| StructuralConfigError::InvalidSchema {
                message: e.to_string(),
            })?;

        Ok(Self {
            validator,
            properties,
            _output: PhantomData,
        })
    }

    /// Derive the schema from `T` with `schemars`.
    pub fn for_type() -> Result<Self, StructuralConfigError>
    where
        T: JsonSchema,
    {
        let schema = schemars::schema_for!(T);
        let schema = serde_json::to_value(&schema).map_err(|e| {
            StructuralConfigError::InvalidSchema {
                message: e.to_string(),
            }
        })?;
        Self::new(schema)
    }

    /// Build the typed object: declared keys only, coerced, with defaults filled.
    fn instance(&self, input: &EnvironmentInput) -> Value {
        let mut object = Map::new();
        for property in &self.properties {
            let value = match (input.get(&property.name), &property.default) {
                (Some(raw), _) => coerce(raw, &property.types),
                (None, Some(default)) => default.clone(),
                (None, None) => continue,
            };
            object.insert(property.name.clone(), value);
        }
        Value::Object(object)
    }

    fn issue_for(&self, error: &ValidationError<'_>) -> FieldIssue {
        let mut path = pointer_segments(error.instance_path.as_str());

        let message = match &error.kind {
            ValidationErrorKind::Required { property } => {
                if let Some(name) = property.as_str() {
                    path.push(PathSegment::Key(name.to_string()));
                }
                "Required".to_string()
            }
            ValidationErrorKind::Type { .. } => {
                let types = match path.first() {
                    Some(PathSegment::Key(key)) => self
                        .properties
                        .iter()
                        .find(|p| &p.name == key)
                        .map(|p| p.types.join(" | ")),
                    _ => None,
                };
                match types {
                    Some(types) if !types.is_empty() => format!("Expected {types}"),
                    _ => "Invalid type".to_string(),
                }
            }
            ValidationErrorKind::Enum { options } => {
                let expected = options
                    .as_array()
                    .map(|values| {
                        values
                            .iter()
                            .map(|v| match v.as_str() {
                                Some(s) => format!("'{s}'"),
                                None => v.to_string(),
                            })
                            .collect::<Vec<_>>()
                            .join(" | ")
                    })
                    .unwrap_or_default();
                format!("Invalid enum value. Expected {expected}")
            }
            ValidationErrorKind::MinLength { limit } => {
                format!("String must contain at least {limit} character(s)")
            }
            ValidationErrorKind::MaxLength { limit } => {
                format!("String must contain at most {limit} character(s)")
            }
            ValidationErrorKind::Minimum { limit } => {
                format!("Number must be greater than or equal to {limit}")
            }
            ValidationErrorKind::Maximum { limit } => {
                format!("Number must be less than or equal to {limit}")
            }
            ValidationErrorKind::Format { format } if format == "uri" => "Invalid url".to_string(),
            ValidationErrorKind::Format { format } => format!("Invalid {format}"),
            ValidationErrorKind::Pattern { .. } => "Does not match the required pattern".to_string(),
            _ => "Invalid value".to_string(),
        };

        FieldIssue::new(path, message)
    }
}

impl<T: DeserializeOwned> ValidationAdapter<T> for SchemaAdapter<T> {
    fn validate(&self, input: &EnvironmentInput) -> ValidationResult<T> {
        let instance = self.instance(input);

        let issues: Vec<FieldIssue> = self
            .validator
            .iter_errors(&instance)
            .map(|error| self.issue_for(&error))
            .collect();
        if !issues.is_empty() {
            return ValidationResult::Failure { issues };
        }

        match serde_json::from_value(instance) {
            Ok(data) => ValidationResult::Success { data },
            Err(e) => ValidationResult::Failure {
                issues: vec![FieldIssue::new(
                    Vec::new(),
                    format!("validated values do not match the target type: {e}"),
                )],
            },
        }
    }
}

/// Name of the root `type`, as a static string for the structural error.
fn root_kind(schema: &Value) -> &'static str {
    match schema.get("type") {
        Some(Value::String(kind)) => match kind.as_str() {
            "object" => "object",
            "string" => "string",
            "integer" => "integer",
            "number" => "number",
            "boolean" => "boolean",
            "array" => "array",
            "null" => "null",
            _ => "unknown",
        },
        Some(Value::Array(_)) => "union",
        Some(_) => "unknown",
        None if schema.is_object() => "untyped",
        None => "non-object",
    }
}

/// Split a JSON pointer such as `/SERVERS/2` into path segments.
fn pointer_segments(pointer: &str) -> Vec<PathSegment> {
    pointer
        .split('/')
        .skip(1)
        .map(|raw| {
            let segment = raw.replace("~1", "/").replace("~0", "~");
            match segment.parse::<usize>() {
                Ok(index) => PathSegment::Index(index),
                Err(_) => PathSegment::Key(segment),
            }
        })
        .collect()
}
