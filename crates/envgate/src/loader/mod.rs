//! File layer loading.
//!
//! Responsibilities:
//! - Read candidate files through a `FileReader` and parse them through a `LayerParser`.
//! - Merge the parsed files into one `Layer` in precedence order.
//!
//! Does NOT handle:
//! - Expansion, secrets, or the process environment (see expand.rs, secrets.rs, resolver).
//!
//! Invariants / Assumptions:
//! - "File not found" is recoverable; every other read failure is fatal.
//! - Parsers never perform `${NAME}` substitution and never fail.

mod error;
mod files;
mod parser;
mod reader;

pub use error::LoadError;
pub use files::{FileLayerLoader, FileSources};
pub use parser::{DotenvParser, LayerParser};
pub use reader::{FileReader, FsReader, ReadError};
