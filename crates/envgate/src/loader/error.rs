//! Error types for file layer loading.
//!
//! Invariants:
//! - Every variant carries the path that failed.
//! - Only read faults are fatal; malformed content is skipped by the parser.

use std::path::PathBuf;
use thiserror::Error;

use super::reader::ReadError;

/// Fatal failure while loading the file layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Failed to read environment file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ReadError,
    },
}

impl LoadError {
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::Read { path, .. } => path,
        }
    }
}
