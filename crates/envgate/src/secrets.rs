//! Concurrent secret fetching with independent failure.
//!
//! Responsibilities:
//! - Define the `SecretSource` capability for caller-supplied async fetchers.
//! - Fire every source, wait for all of them to settle, and merge the usable results.
//!
//! Does NOT handle:
//! - Storing, caching, or decrypting secrets.
//! - Retrying failed sources.
//!
//! Invariants:
//! - No source failure is ever fatal; failures are reported as warnings.
//! - On key collision the higher source index wins, regardless of completion order.
//! - A source resolving to an object (even an empty one) counts as a success.
//! - When at least one source was supplied and none succeeded, exactly one
//!   summary warning is emitted.

use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use secrecy::SecretString;
use serde_json::Value;

/// Boxed error returned by secret sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of one secret fetch: a JSON object of name→value pairs, or nothing.
pub type SecretFetch = Result<Option<Value>, BoxError>;

/// Merged secrets, kept wrapped until the final environment merge.
pub type SecretLayer = BTreeMap<String, SecretString>;

/// A caller-supplied asynchronous secret fetcher.
///
/// Any `Fn() -> impl Future<Output = Result<Option<Value>, E>>` closure is a
/// `SecretSource`.
pub trait SecretSource: Send + Sync {
    fn fetch(&self) -> BoxFuture<'static, SecretFetch>;
}

impl<F, Fut, E> SecretSource for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<Value>, E>> + Send + 'static,
    E: Into<BoxError>,
{
    fn fetch(&self) -> BoxFuture<'static, SecretFetch> {
        self().map(|result| result.map_err(Into::into)).boxed()
    }
}

/// Runs secret sources concurrently and merges their results.
#[derive(Debug, Clone, Default)]
pub struct SecretOrchestrator {
    timeout: Option<Duration>,
}

enum Outcome {
    Merged,
    Unusable,
}

impl SecretOrchestrator {
    /// `timeout` bounds each source individually; `None` waits indefinitely.
    ///
    /// The bound uses tokio's timer. Outside a tokio runtime every bounded
    /// source is reported as failed; unbounded sources run on any executor.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub async fn fetch_all(&self, sources: &[Arc<dyn SecretSource>]) -> SecretLayer {
        let mut merged = SecretLayer::new();
        if sources.is_empty() {
            return merged;
        }

        let pending = sources
            .iter()
            .enumerate()
            .map(|(index, source)| self.settle(index, source.as_ref()));
        let settled = join_all(pending).await;

        let mut successes = 0usize;
        for (index, result) in settled.into_iter().enumerate() {
            let outcome = match result {
                Ok(Some(Value::Object(map))) => {
                    merge_object(index, map, &mut merged);
                    Outcome::Merged
                }
                Ok(Some(other)) => {
                    tracing::warn!(
                        index,
                        kind = json_kind(&other),
                        "Secret source returned a non-object value; ignoring"
                    );
                    Outcome::Unusable
                }
                Ok(None) => Outcome::Unusable,
                Err(reason) => {
                    tracing::warn!(index, error = %reason, "Secret source failed");
                    Outcome::Unusable
                }
            };
            if matches!(outcome, Outcome::Merged) {
                successes += 1;
            }
        }

        if successes == 0 {
            tracing::warn!(
                sources = sources.len(),
                "All {} secret sources failed",
                sources.len()
            );
        }

        merged
    }

    /// Drive one source to completion, turning panics and timeouts into failures.
    async fn settle(&self, index: usize, source: &dyn SecretSource) -> Result<Option<Value>, String> {
        let future = match std::panic::catch_unwind(AssertUnwindSafe(|| source.fetch())) {
            Ok(future) => future,
            Err(_) => {
                return Err(format!(
                    "secret source {index} panicked instead of returning a future; it must return a future"
                ));
            }
        };

        // The timer is created on first poll, inside the unwind guard, so a
        // missing tokio runtime fails this source instead of the whole call.
        let limit = self.timeout;
        let guarded = AssertUnwindSafe(async move {
            match limit {
                Some(limit) => tokio::time::timeout(limit, future)
                    .await
                    .map_err(|_| format!("timed out after {limit:?}")),
                None => Ok(future.await),
            }
        })
        .catch_unwind();

        match guarded.await {
            Ok(Ok(result)) => result.map_err(|e| e.to_string()),
            Ok(Err(timed_out)) => Err(timed_out),
            Err(panic) => Err(format!("panicked: {}", panic_message(panic.as_ref()))),
        }
    }
}

fn merge_object(index: usize, map: serde_json::Map<String, Value>, merged: &mut SecretLayer) {
    for (key, value) in map {
        let text = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => continue,
            Value::Array(_) | Value::Object(_) => {
                tracing::warn!(index, key = %key, "Secret source returned a nested value; skipping key");
                continue;
            }
        };
        merged.insert(key, SecretString::new(text.into()));
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
