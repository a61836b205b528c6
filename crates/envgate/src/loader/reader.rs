//! Raw file reading behind a tagged error boundary.
//!
//! Responsibilities:
//! - Define the `FileReader` collaborator used by the file layer loader.
//! - Classify failures into a closed `ReadError` set so the loader never
//!   inspects error strings.
//!
//! Does NOT handle:
//! - Parsing file contents (see parser.rs).
//! - Deciding which failures are fatal (see files.rs).

use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// Failure reading one candidate file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// The file does not exist. Recoverable.
    #[error("file not found")]
    NotFound,

    /// Any other I/O fault (permissions, device errors, ...).
    #[error("I/O error ({kind}): {message}")]
    Io { kind: ErrorKind, message: String },

    /// The reader failed for a reason outside the I/O layer.
    #[error("read failed: {message}")]
    Other { message: String },
}

impl From<std::io::Error> for ReadError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::NotFound => ReadError::NotFound,
            kind => ReadError::Io {
                kind,
                message: error.to_string(),
            },
        }
    }
}

/// Reads the raw bytes of a file.
pub trait FileReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<Vec<u8>, ReadError>;
}

/// Reads files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, path: &Path) -> Result<Vec<u8>, ReadError> {
        Ok(std::fs::read(path)?)
    }
}
