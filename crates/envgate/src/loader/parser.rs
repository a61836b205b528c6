//! Dotenv line-format parsing.
//!
//! Responsibilities:
//! - Define the `LayerParser` collaborator that turns file bytes into a `Layer`.
//! - Provide `DotenvParser`, a lenient `KEY=VALUE` parser.
//!
//! Does NOT handle:
//! - `${NAME}` substitution. Values are returned verbatim so that expansion
//!   stays opt-in and scoped to the file layer (see expand.rs).
//!
//! Invariants:
//! - Parsing never fails. Malformed lines are skipped with a warning that
//!   carries only the 1-based line number, NEVER the line content.
//! - Within one file, a repeated key keeps its last value.

use std::borrow::Cow;

use crate::layer::Layer;

/// Parses raw file bytes into a flat string map.
pub trait LayerParser: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Layer;
}

/// Parser for the common `.env` format.
///
/// Supported syntax:
/// - `KEY=value`, optionally prefixed with `export `
/// - blank lines and `#` comments, plus ` #` trailing comments on unquoted values
/// - `'single quoted'` values, taken literally
/// - `"double quoted"` values with `\n`, `\r`, `\t`, `\"` and `\\` escapes
/// - quoted values spanning several lines
///
/// A leading UTF-8 byte order mark is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotenvParser;

impl LayerParser for DotenvParser {
    fn parse(&self, bytes: &[u8]) -> Layer {
        let content = match std::str::from_utf8(bytes) {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => {
                tracing::warn!("Environment file is not valid UTF-8; invalid bytes were replaced");
                String::from_utf8_lossy(bytes)
            }
        };
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        let mut layer = Layer::new();
        let mut lines = content.lines().enumerate();

        while let Some((idx, raw_line)) = lines.next() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                skip(line_no);
                continue;
            };
            let key = key.trim();
            if !is_valid_key(key) {
                skip(line_no);
                continue;
            }

            let value = value.trim();
            let parsed = match value.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let checkpoint = lines.clone();
                    let parsed = read_quoted(quote, &value[1..], &mut lines);
                    if parsed.is_none() {
                        lines = checkpoint;
                    }
                    parsed
                }
                _ => Some(unquoted(value)),
            };

            match parsed {
                Some(value) => {
                    layer.insert(key.to_string(), value);
                }
                None => skip(line_no),
            }
        }

        layer
    }
}

fn skip(line: usize) {
    tracing::warn!(line, "Skipping malformed line in environment file");
}

fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-')
}

fn unquoted(raw: &str) -> String {
    let value = match raw.find(" #") {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    value.trim_end().to_string()
}

/// Read a quoted value whose body starts with `first`, pulling further lines
/// until the closing quote. Returns `None` when the file ends first.
fn read_quoted<'a>(
    quote: char,
    first: &str,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Option<String> {
    let mut body = first.to_string();
    loop {
        if let Some(value) = close_quoted(quote, &body) {
            return Some(value);
        }
        let (_, next) = lines.next()?;
        body.push('\n');
        body.push_str(next);
    }
}

/// Value up to the closing quote, with escapes applied inside double quotes.
fn close_quoted(quote: char, body: &str) -> Option<String> {
    if quote == '\'' {
        return body.find('\'').map(|end| body[..end].to_string());
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => return Some(out),
            '\\' => match chars.next()? {
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                other => out.push(other),
            },
            other => out.push(other),
        }
    }
    None
}
