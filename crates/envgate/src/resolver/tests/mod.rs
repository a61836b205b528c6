//! Tests for the resolver pipeline.
//!
//! Responsibilities:
//! - Test layer precedence across defaults, files, secrets, and the process environment.
//! - Test structural checks, file fault handling, expansion scope, and secret tolerance.
//! - Test the success and failure outcomes, including the emitted error log.
//!
//! Invariants:
//! - Collaborators are injected (`MemoryReader`, fixed `Layer` environments), so
//!   these tests never touch the real filesystem or process environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use super::Resolver;
use crate::layer::Layer;
use crate::loader::{FileReader, ReadError};


/// In-memory file reader that records every read; clones share state.
#[derive(Clone, Default)]
pub struct MemoryReader {
    files: Arc<HashMap<PathBuf, Result<String, ReadError>>>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl MemoryReader {
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: Arc::new(
                files
                    .iter()
                    .map(|(p, c)| (PathBuf::from(p), Ok(c.to_string())))
                    .collect(),
            ),
            calls: Arc::default(),
        }
    }

    pub fn failing(path: &str, error: ReadError) -> Self {
        let mut files = HashMap::new();
        files.insert(PathBuf::from(path), Err(error));
        Self {
            files: Arc::new(files),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl FileReader for MemoryReader {
    fn read(&self, path: &Path) -> Result<Vec<u8>, ReadError> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        match self.files.get(path) {
            Some(Ok(content)) => Ok(content.clone().into_bytes()),
            Some(Err(e)) => Err(e.clone()),
            None => Err(ReadError::NotFound),
        }
    }
}

pub fn env(pairs: &[(&str, &str)]) -> Layer {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn resolver(reader: &MemoryReader, process: &[(&str, &str)]) -> Resolver {
    Resolver::new()
        .with_file_reader(reader.clone())
        .with_env_source(env(process))
}

pub fn permission_denied() -> ReadError {
    ReadError::Io {
        kind: std::io::ErrorKind::PermissionDenied,
        message: "permission denied".to_string(),
    }
}

/// Typed output shared by several test modules.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ApiEnv {
    #[serde(rename = "API_URL")]
    pub api_url: String,
    #[serde(rename = "SECRET_KEY")]
    pub secret_key: String,
    #[serde(rename = "LOG_LEVEL")]
    pub log_level: String,
}

pub fn api_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "API_URL": { "type": "string", "format": "uri" },
            "SECRET_KEY": { "type": "string", "minLength": 10 },
            "LOG_LEVEL": {
                "type": "string",
                "enum": ["debug", "info", "warn", "error"],
                "default": "info"
            }
        },
        "required": ["API_URL", "SECRET_KEY"]
    })
}

/// Object schema whose listed keys are all optional strings.
pub fn optional_strings(keys: &[&str]) -> serde_json::Value {
    let properties: serde_json::Map<String, serde_json::Value> = keys
        .iter()
        .map(|key| (key.to_string(), serde_json::json!({ "type": "string" })))
        .collect();
    serde_json::json!({ "type": "object", "properties": properties })
}
