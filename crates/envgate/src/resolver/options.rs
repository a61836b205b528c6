//! Per-call resolver options.
//!
//! Invariants / Assumptions:
//! - Exactly one of `schema` / `validator` must be set; this is checked by the
//!   resolver before any I/O, not by the builder.
//! - A schema is checked for structure as soon as it is supplied, but the
//!   resulting error is only surfaced when the resolver runs.

use std::sync::Arc;
use std::time::Duration;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StructuralConfigError;
use crate::loader::FileSources;
use crate::secrets::SecretSource;
use crate::validation::{SchemaAdapter, ValidationAdapter};

type AdapterResult<T> = Result<Arc<dyn ValidationAdapter<T>>, StructuralConfigError>;

/// Options for one `resolve_sync` / `resolve_async` call.
pub struct ResolveOptions<T> {
    schema: Option<AdapterResult<T>>,
    validator: Option<Arc<dyn ValidationAdapter<T>>>,
    pub(crate) files: FileSources,
    pub(crate) expand: bool,
    pub(crate) environment: Option<String>,
    pub(crate) secret_sources: Vec<Arc<dyn SecretSource>>,
    pub(crate) secret_timeout: Option<Duration>,
}

impl<T> Default for ResolveOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResolveOptions<T> {
    /// Default options: `.env` files, no expansion, no secrets.
    pub fn new() -> Self {
        Self {
            schema: None,
            validator: None,
            files: FileSources::default(),
            expand: false,
            environment: None,
            secret_sources: Vec::new(),
            secret_timeout: None,
        }
    }

    /// Validate against an object JSON Schema with the default adapter.
    pub fn schema(mut self, schema: Value) -> Self
    where
        T: DeserializeOwned + 'static,
    {
        let adapter = SchemaAdapter::<T>::new(schema)
            .map(|adapter| Arc::new(adapter) as Arc<dyn ValidationAdapter<T>>);
        self.schema = Some(adapter);
        self
    }

    /// Validate against the JSON Schema `schemars` derives for `T`.
    pub fn schema_for(mut self) -> Self
    where
        T: DeserializeOwned + JsonSchema + 'static,
    {
        let adapter = SchemaAdapter::<T>::for_type()
            .map(|adapter| Arc::new(adapter) as Arc<dyn ValidationAdapter<T>>);
        self.schema = Some(adapter);
        self
    }

    /// Validate with a custom adapter instead of a schema.
    pub fn validator(mut self, validator: impl ValidationAdapter<T> + 'static) -> Self
    where
        T: 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Files to load, in increasing precedence.
    pub fn files(mut self, files: impl Into<FileSources>) -> Self {
        self.files = files.into();
        self
    }

    /// Skip file loading entirely.
    pub fn no_files(mut self) -> Self {
        self.files = FileSources::Disabled;
        self
    }

    /// Enable `${NAME}` expansion within the file layer.
    pub fn expand(mut self, enabled: bool) -> Self {
        self.expand = enabled;
        self
    }

    /// Set the environment discriminator (for example `production`), which
    /// selects the `<base>.<name>` file. Overrides `APP_ENV`.
    pub fn environment(mut self, name: impl Into<String>) -> Self {
        self.environment = Some(name.into());
        self
    }

    /// Add a secret source. Only used by `resolve_async`.
    pub fn secret_source(mut self, source: impl SecretSource + 'static) -> Self {
        self.secret_sources.push(Arc::new(source));
        self
    }

    /// Bound each secret source individually. There is no bound by default.
    pub fn secret_timeout(mut self, timeout: Duration) -> Self {
        self.secret_timeout = Some(timeout);
        self
    }

    /// Resolve which adapter to use, enforcing the schema XOR validator rule.
    pub(crate) fn take_adapter(&mut self) -> AdapterResult<T> {
        match (self.schema.take(), self.validator.take()) {
            (Some(_), Some(_)) => Err(StructuralConfigError::SchemaAndValidator),
            (None, None) => Err(StructuralConfigError::MissingSchemaOrValidator),
            (Some(schema), None) => schema,
            (None, Some(validator)) => Ok(validator),
        }
    }
}
