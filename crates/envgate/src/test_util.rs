//! Shared helpers for unit tests.

use std::fmt::Write as _;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use tracing::Level;

/// One captured tracing event: its level and the message followed by `field=value` pairs.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub text: String,
}

/// Minimal in-test tracing subscriber that records every event.
#[derive(Clone, Default)]
pub struct CapturingSubscriber {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    next_id: Arc<AtomicU64>,
}

impl CapturingSubscriber {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().expect("lock poisoned").clone()
    }

    pub fn count(&self, level: Level, needle: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.level == level && e.text.contains(needle))
            .count()
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: String,
}

impl tracing::field::Visit for EventVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl tracing::Subscriber for CapturingSubscriber {
    fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _attrs: &tracing::span::Attributes<'_>) -> tracing::span::Id {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::span::Id::from_u64(id)
    }

    fn record(&self, _span: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}

    fn record_follows_from(&self, _span: &tracing::span::Id, _follows: &tracing::span::Id) {}

    fn event(&self, event: &tracing::Event<'_>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        self.events
            .lock()
            .expect("lock poisoned")
            .push(CapturedEvent {
                level: *event.metadata().level(),
                text: format!("{}{}", visitor.message, visitor.fields),
            });
    }

    fn enter(&self, _span: &tracing::span::Id) {}

    fn exit(&self, _span: &tracing::span::Id) {}

    fn register_callsite(
        &self,
        _metadata: &'static tracing::Metadata<'static>,
    ) -> tracing::subscriber::Interest {
        tracing::subscriber::Interest::always()
    }
}

/// Run `f` with a capturing subscriber installed for the current thread.
pub fn capture_logs<R, F: FnOnce() -> R>(f: F) -> (R, Vec<CapturedEvent>) {
    let subscriber = CapturingSubscriber::default();
    let dispatch = tracing::Dispatch::new(subscriber.clone());
    let result = tracing::dispatcher::with_default(&dispatch, f);
    (result, subscriber.events())
}

/// Install a capturing subscriber until the returned guard drops.
///
/// Intended for `#[tokio::test]` (current-thread runtime), where the whole
/// test body runs on the thread that owns the guard.
pub fn capture_logs_scoped() -> (CapturingSubscriber, tracing::subscriber::DefaultGuard) {
    let subscriber = CapturingSubscriber::default();
    let guard = tracing::subscriber::set_default(subscriber.clone());
    (subscriber, guard)
}
