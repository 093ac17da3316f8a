//! Shared unit test fixtures: `tracing` event capture and slow draws.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::field::{Field, Visit};
use tracing::instrument::WithSubscriber;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use crate::harness::{RandomSource, SeededRandom};

/// One captured event: its level and rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
}

/// Events in emission order.
#[derive(Debug, Default)]
pub struct Captured {
    pub events: Vec<CapturedEvent>,
}

impl Captured {
    pub fn levels(&self) -> Vec<Level> {
        self.events.iter().map(|e| e.level).collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn count_at(&self, level: Level) -> u64 {
        self.events.iter().filter(|e| e.level == level).count() as u64
    }
}

struct CaptureLayer(Arc<Mutex<Captured>>);

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.0.lock().unwrap().events.push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}

fn subscriber() -> (impl Subscriber + Send + Sync, Arc<Mutex<Captured>>) {
    let captured = Arc::new(Mutex::new(Captured::default()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(captured.clone()));
    (subscriber, captured)
}

fn take(captured: &Mutex<Captured>) -> Captured {
    std::mem::take(&mut *captured.lock().unwrap())
}

/// Run `f` with a capturing subscriber as the thread default.
pub fn capture<F: FnOnce() -> R, R>(f: F) -> (R, Captured) {
    let (subscriber, captured) = subscriber();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, take(&captured))
}

/// Poll `future` with a capturing subscriber as the default.
pub async fn capture_async<F: Future>(future: F) -> (F::Output, Captured) {
    let (subscriber, captured) = subscriber();
    let result = future.with_subscriber(subscriber).await;
    (result, take(&captured))
}

/// Seeded draws that each take `per_draw` of wall time, for runs that must
/// outlast a deadline.
pub struct SlowRandom {
    inner: SeededRandom,
    per_draw: Duration,
}

impl SlowRandom {
    pub fn new(seed: u64, per_draw: Duration) -> Self {
        Self {
            inner: SeededRandom::new(seed),
            per_draw,
        }
    }
}

impl RandomSource for SlowRandom {
    fn below(&self, bound: u64) -> u64 {
        std::thread::sleep(self.per_draw);
        self.inner.below(bound)
    }
}
