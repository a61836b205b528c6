//! The resolution-and-validation pipeline.
//!
//! Responsibilities:
//! - Sequence adapter selection, file loading, expansion, secret fetching,
//!   the final merge, and validation.
//! - Expose a synchronous and an asynchronous entry point over the same pipeline.
//!
//! Does NOT handle:
//! - Exiting the process. Callers decide what to do with a `ResolveError`.
//! - Installing a tracing subscriber.
//!
//! Invariants / Assumptions:
//! - Structural errors are raised before any file read or secret fetch.
//! - Precedence, lowest to highest: schema defaults < files (discriminator file
//!   last, expanded in place) < secrets (higher index wins) < process environment.
//! - The process environment is snapshotted exactly once per call, at the final merge.
//! - Every call builds its layers from scratch; nothing is cached.

mod env;
mod options;
mod report;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use env::{EnvSource, ProcessEnv, env_var_or_none};
pub use options::ResolveOptions;

use crate::constants::ENVIRONMENT_VAR;
use crate::error::ResolveError;
use crate::expand::{Interpolator, PlaceholderInterpolator, expand_layer};
use crate::layer::{EnvironmentInput, Layer};
use crate::loader::{DotenvParser, FileLayerLoader, FileReader, FsReader, LayerParser};
use crate::secrets::{SecretLayer, SecretOrchestrator};
use crate::validation::{ValidationAdapter, ValidationResult};
use report::format_issues;

/// Resolves and validates configuration using injectable collaborators.
#[derive(Clone)]
pub struct Resolver {
    reader: Arc<dyn FileReader>,
    parser: Arc<dyn LayerParser>,
    interpolator: Arc<dyn Interpolator>,
    env: Arc<dyn EnvSource>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// Resolver over the filesystem, the dotenv format, and the real process environment.
    pub fn new() -> Self {
        Self {
            reader: Arc::new(FsReader),
            parser: Arc::new(DotenvParser),
            interpolator: Arc::new(PlaceholderInterpolator),
            env: Arc::new(ProcessEnv),
        }
    }

    pub fn with_file_reader(mut self, reader: impl FileReader + 'static) -> Self {
        self.reader = Arc::new(reader);
        self
    }

    pub fn with_parser(mut self, parser: impl LayerParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    pub fn with_interpolator(mut self, interpolator: impl Interpolator + 'static) -> Self {
        self.interpolator = Arc::new(interpolator);
        self
    }

    pub fn with_env_source(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Resolve without secret sources.
    ///
    /// Secret sources configured on `options` are ignored here; use
    /// [`resolve_async`](Self::resolve_async) to fetch them.
    pub fn resolve_sync<T>(&self, mut options: ResolveOptions<T>) -> Result<T, ResolveError> {
        let (adapter, files) = self.prepare(&mut options)?;
        if !options.secret_sources.is_empty() {
            tracing::warn!(
                sources = options.secret_sources.len(),
                "Secret sources are only fetched by resolve_async; ignoring them"
            );
        }
        self.finish(adapter.as_ref(), files, None)
    }

    /// Resolve, fetching secret sources concurrently after the file layer is ready.
    pub async fn resolve_async<T>(&self, mut options: ResolveOptions<T>) -> Result<T, ResolveError> {
        let (adapter, files) = self.prepare(&mut options)?;
        let secrets = SecretOrchestrator::new(options.secret_timeout)
            .fetch_all(&options.secret_sources)
            .await;
        self.finish(adapter.as_ref(), files, Some(secrets))
    }

    /// Adapter selection, file loading, and expansion.
    fn prepare<T>(
        &self,
        options: &mut ResolveOptions<T>,
    ) -> Result<(Arc<dyn ValidationAdapter<T>>, Layer), ResolveError> {
        let adapter = options.take_adapter()?;

        let discriminator = options
            .environment
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| env_var_or_none(self.env.as_ref(), ENVIRONMENT_VAR));

        let loader = FileLayerLoader::new(self.reader.clone(), self.parser.clone());
        let files = loader.load(&options.files, discriminator.as_deref())?;
        let files = expand_layer(files, options.expand, self.interpolator.as_ref());

        Ok((adapter, files))
    }

    /// Final merge, validation, and outcome reporting.
    fn finish<T>(
        &self,
        adapter: &dyn ValidationAdapter<T>,
        files: Layer,
        secrets: Option<SecretLayer>,
    ) -> Result<T, ResolveError> {
        let input = EnvironmentInput::assemble(files, secrets, self.env.snapshot());

        match adapter.validate(&input) {
            ValidationResult::Success { data } => Ok(data),
            ValidationResult::Failure { issues } => {
                tracing::error!(issues = issues.len(), "{}", format_issues(&issues));
                Err(ResolveError::Validation { issues })
            }
        }
    }
}
