//! Property-based tests for layer precedence.
//!
//! These tests generate random values for every layer and check that the
//! highest present layer always wins, using injected collaborators so no real
//! files or process variables are involved.
//!
//! Test coverage:
//! - defaults < files < secrets < process environment, for any subset of layers
//! - later file paths override earlier ones
//! - the dotenv parser keeps plain values verbatim
//! - malformed lines never cost the parser a valid entry

use std::collections::BTreeMap;
use std::path::Path;

use envgate::{
    BoxError, DotenvParser, FileReader, Layer, LayerParser, ReadError, ResolveOptions, Resolver,
};
use proptest::prelude::*;
use serde_json::{Value, json};

/// Reader serving one fixed `.env` body.
struct SingleFile(Option<String>);

impl FileReader for SingleFile {
    fn read(&self, path: &Path) -> Result<Vec<u8>, ReadError> {
        match (&self.0, path == Path::new(".env")) {
            (Some(body), true) => Ok(body.clone().into_bytes()),
            _ => Err(ReadError::NotFound),
        }
    }
}

/// Values that survive the dotenv format unquoted.
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./:-]{1,24}".prop_map(String::from)
}

fn resolve_target(
    file: Option<String>,
    secret: Option<String>,
    process: Option<String>,
) -> Value {
    let resolver = Resolver::new()
        .with_file_reader(SingleFile(file.map(|v| format!("TARGET={v}\n"))))
        .with_env_source(
            process
                .into_iter()
                .map(|v| ("TARGET".to_string(), v))
                .collect::<Layer>(),
        );

    let mut options = ResolveOptions::<BTreeMap<String, Value>>::new().schema(json!({
        "type": "object",
        "properties": { "TARGET": { "type": "string", "default": "default" } }
    }));
    if let Some(secret) = secret {
        options = options.secret_source(move || {
            let secret = secret.clone();
            async move { Ok::<_, BoxError>(Some(json!({ "TARGET": secret }))) }
        });
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("build runtime");
    let resolved = runtime
        .block_on(resolver.resolve_async(options))
        .expect("resolution succeeds");
    resolved["TARGET"].clone()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_highest_present_layer_wins(
        file in proptest::option::of(value_strategy()),
        secret in proptest::option::of(value_strategy()),
        process in proptest::option::of(value_strategy()),
    ) {
        let expected = process
            .clone()
            .or_else(|| secret.clone())
            .or_else(|| file.clone())
            .unwrap_or_else(|| "default".to_string());

        prop_assert_eq!(resolve_target(file, secret, process), json!(expected));
    }

    #[test]
    fn prop_dotenv_parser_keeps_plain_values(
        entries in proptest::collection::btree_map("[A-Z][A-Z0-9_]{0,12}", value_strategy(), 0..8),
    ) {
        let body: String = entries
            .iter()
            .map(|(k, v)| format!("{k}={v}\n"))
            .collect();

        let parsed = DotenvParser.parse(body.as_bytes());

        prop_assert_eq!(parsed, entries);
    }

    #[test]
    fn prop_malformed_lines_never_drop_valid_entries(
        entries in proptest::collection::btree_map("[A-Z][A-Z0-9_]{0,12}", value_strategy(), 0..8),
        noise in proptest::collection::vec("[a-z][a-z ]{0,10}", 0..8),
    ) {
        let mut lines: Vec<String> = entries.iter().map(|(k, v)| format!("{k}={v}")).collect();
        for (i, junk) in noise.into_iter().enumerate() {
            let at = (i * 3) % (lines.len() + 1);
            lines.insert(at, junk);
        }
        let body = lines.join("\n");

        prop_assert_eq!(DotenvParser.parse(body.as_bytes()), entries);
    }
}
