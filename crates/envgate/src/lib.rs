//! Runtime configuration resolution for envgate.
//!
//! This crate merges configuration from environment files, optional
//! variable expansion, optional asynchronously fetched secrets, and the live
//! process environment, then validates the result before the host
//! application starts. Every problem is reported at once.
//!
//! ```rust,ignore
//! use envgate::ResolveOptions;
//! use serde_json::json;
//!
//! #[derive(serde::Deserialize)]
//! struct Env {
//!     #[serde(rename = "API_URL")]
//!     api_url: String,
//!     #[serde(rename = "PORT")]
//!     port: u16,
//! }
//!
//! let env: Env = envgate::resolve_sync(ResolveOptions::new().schema(json!({
//!     "type": "object",
//!     "properties": {
//!         "API_URL": { "type": "string", "format": "uri" },
//!         "PORT": { "type": "integer", "default": 3000 }
//!     },
//!     "required": ["API_URL"]
//! })))?;
//! ```
//!
//! Types deriving `schemars::JsonSchema` can skip the hand-written schema:
//!
//! ```rust,ignore
//! let env: Env = envgate::resolve_sync(ResolveOptions::new().schema_for())?;
//! ```

pub mod constants;
mod error;
mod expand;
mod layer;
mod loader;
mod resolver;
mod secrets;
mod validation;

pub use error::{ResolveError, StructuralConfigError};
pub use expand::{InterpolateError, Interpolator, PlaceholderInterpolator};
pub use layer::{EnvironmentInput, Layer};
pub use loader::{
    DotenvParser, FileLayerLoader, FileReader, FileSources, FsReader, LayerParser, LoadError,
    ReadError,
};
pub use resolver::{EnvSource, ProcessEnv, ResolveOptions, Resolver, env_var_or_none};
pub use secrets::{BoxError, SecretFetch, SecretLayer, SecretOrchestrator, SecretSource};
pub use validation::{
    FieldIssue, PathSegment, SchemaAdapter, ValidationAdapter, ValidationResult,
};

/// Resolve with a default [`Resolver`], synchronously.
pub fn resolve_sync<T>(options: ResolveOptions<T>) -> Result<T, ResolveError> {
    Resolver::default().resolve_sync(options)
}

/// Resolve with a default [`Resolver`], fetching secret sources concurrently.
pub async fn resolve_async<T>(options: ResolveOptions<T>) -> Result<T, ResolveError> {
    Resolver::default().resolve_async(options).await
}

#[cfg(test)]
pub(crate) mod test_util;
