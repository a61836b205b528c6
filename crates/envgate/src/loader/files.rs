//! Ordered loading of environment files into a single layer.
//!
//! Responsibilities:
//! - Read and parse each candidate file in caller order, later files winning.
//! - Append the discriminator file (`<base>.<name>`) as the highest-precedence file.
//!
//! Does NOT handle:
//! - Expansion of `${NAME}` references (see expand.rs).
//! - Merging with secrets or the process environment (see resolver).
//!
//! Invariants:
//! - A missing file contributes nothing and loading continues.
//! - Any other read failure stops loading immediately; malformed content never does.
//! - `FileSources::Disabled` never touches the reader.

use std::path::Path;
use std::sync::Arc;

use super::error::LoadError;
use super::parser::LayerParser;
use super::reader::{FileReader, ReadError};
use crate::constants::DEFAULT_ENV_FILE;
use crate::layer::{Layer, merge_into};

/// Which files feed the file layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSources {
    /// Skip file loading entirely.
    Disabled,
    /// Load these paths in order.
    Paths(Vec<String>),
}

impl Default for FileSources {
    fn default() -> Self {
        FileSources::Paths(vec![DEFAULT_ENV_FILE.to_string()])
    }
}

impl From<&str> for FileSources {
    fn from(path: &str) -> Self {
        FileSources::Paths(vec![path.to_string()])
    }
}

impl From<String> for FileSources {
    fn from(path: String) -> Self {
        FileSources::Paths(vec![path])
    }
}

impl<S: Into<String>> From<Vec<S>> for FileSources {
    fn from(paths: Vec<S>) -> Self {
        FileSources::Paths(paths.into_iter().map(Into::into).collect())
    }
}

/// Loads the file layer through injected reader and parser collaborators.
pub struct FileLayerLoader {
    reader: Arc<dyn FileReader>,
    parser: Arc<dyn LayerParser>,
}

impl FileLayerLoader {
    pub fn new(reader: Arc<dyn FileReader>, parser: Arc<dyn LayerParser>) -> Self {
        Self { reader, parser }
    }

    /// Load every configured file, then the discriminator file if one is set.
    pub fn load(
        &self,
        sources: &FileSources,
        discriminator: Option<&str>,
    ) -> Result<Layer, LoadError> {
        let paths = match sources {
            FileSources::Disabled => return Ok(Layer::new()),
            FileSources::Paths(paths) => paths,
        };

        let mut layer = Layer::new();
        let mut base: Option<&str> = None;

        for (index, path) in paths.iter().enumerate() {
            if path.trim().is_empty() {
                tracing::warn!(index, "Skipping blank environment file path");
                continue;
            }
            base.get_or_insert(path.as_str());
            merge_into(&mut layer, self.load_one(Path::new(path))?);
        }

        if let Some(name) = discriminator {
            let implicit = format!("{}.{}", base.unwrap_or(DEFAULT_ENV_FILE), name);
            merge_into(&mut layer, self.load_one(Path::new(&implicit))?);
        }

        Ok(layer)
    }

    fn load_one(&self, path: &Path) -> Result<Layer, LoadError> {
        let bytes = match self.reader.read(path) {
            Ok(bytes) => bytes,
            Err(ReadError::NotFound) => {
                tracing::debug!(path = %path.display(), "Environment file not found; skipping");
                return Ok(Layer::new());
            }
            Err(source) => {
                return Err(LoadError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let layer = {
            let _file = tracing::debug_span!("env_file", path = %path.display()).entered();
            self.parser.parse(&bytes)
        };

        tracing::debug!(
            path = %path.display(),
            variables = layer.len(),
            "Loaded environment file"
        );
        Ok(layer)
    }
}
