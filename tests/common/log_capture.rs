//! Thread-local capture of `tracing` events for log assertions.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

/// One recorded event.
#[derive(Debug, Clone)]
pub struct CapturedLog {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: BTreeMap<String, String>,
}

type Sink = Arc<Mutex<Vec<CapturedLog>>>;

/// Records every event on the current thread until dropped.
///
/// Pair with the default current-thread `#[tokio::test]` runtime so spawned
/// work stays on this thread.
pub struct TestLogCapture {
    events: Sink,
    _guard: DefaultGuard,
}

impl TestLogCapture {
    pub fn start() -> Self {
        let events = Sink::default();
        let subscriber = tracing_subscriber::registry().with(Recorder {
            events: Arc::clone(&events),
        });
        Self {
            events,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    pub fn logs(&self) -> Vec<CapturedLog> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn assert_logged_at_level(&self, level: Level, needle: &str) {
        let logs = self.logs();
        assert!(
            logs.iter()
                .any(|log| log.level == level && log.message.contains(needle)),
            "no {level} event containing {needle:?} in {:#?}",
            summary(&logs)
        );
    }

    /// No event at `level` or more severe.
    pub fn assert_nothing_at_level(&self, level: Level) {
        let loud: Vec<_> = self
            .logs()
            .into_iter()
            .filter(|log| log.level <= level)
            .collect();
        assert!(loud.is_empty(), "unexpected events: {:#?}", summary(&loud));
    }

    pub fn assert_field_logged(&self, name: &str, value: &str) {
        let logs = self.logs();
        assert!(
            logs.iter()
                .any(|log| log.fields.get(name).is_some_and(|v| v.contains(value))),
            "no event with {name}~{value:?}; fields: {:#?}",
            logs.iter().map(|log| &log.fields).collect::<Vec<_>>()
        );
    }
}

fn summary(logs: &[CapturedLog]) -> Vec<String> {
    logs.iter()
        .map(|log| format!("{} {}: {}", log.level, log.target, log.message))
        .collect()
}

struct Recorder {
    events: Sink,
}

impl<S: Subscriber> Layer<S> for Recorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);

        let metadata = event.metadata();
        let message = fields.0.remove("message").unwrap_or_default();
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedLog {
                level: *metadata.level(),
                target: metadata.target().to_string(),
                message,
                fields: fields.0,
            });
    }
}

#[derive(Default)]
struct Fields(BTreeMap<String, String>);

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}
