//! Detectors used by unit tests.
use std::{
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use tracing::{
    field::{Field, Visit},
    Event, Subscriber,
};
use tracing_subscriber::layer::{Context, Layer};

use crate::{
    detector::{Detect, DetectContext},
    error::DetectError,
    resource::Resource,
};

/// Returns a fixed resource after an optional delay, counting its calls.
#[derive(Debug)]
pub(crate) struct StaticDetector {
    resource: Resource,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl StaticDetector {
    pub(crate) fn new(resource: Resource) -> Self {
        StaticDetector {
            resource,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared handle on the call counter, valid after the detector is boxed.
    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Detect for StaticDetector {
    async fn detect(&self, _cx: &DetectContext) -> Result<Resource, DetectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.resource.clone())
    }
}

#[derive(Debug)]
pub(crate) struct FailingDetector {
    calls: Arc<AtomicUsize>,
}

impl FailingDetector {
    pub(crate) fn new() -> Self {
        FailingDetector {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Detect for FailingDetector {
    async fn detect(&self, _cx: &DetectContext) -> Result<Resource, DetectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DetectError::Unavailable("metadata endpoint unreachable".into()))
    }
}

/// Never completes on its own.
#[derive(Debug)]
pub(crate) struct HangingDetector;

#[async_trait]
impl Detect for HangingDetector {
    async fn detect(&self, _cx: &DetectContext) -> Result<Resource, DetectError> {
        std::future::pending::<()>().await;
        Ok(Resource::new())
    }
}

pub(crate) fn resource(attributes: &[(&str, &str)]) -> Resource {
    attributes.iter().copied().collect()
}

/// An event recorded by [`CapturedEvents`], fields rendered as text.
#[derive(Clone, Debug)]
pub(crate) struct CapturedEvent {
    name: String,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl Visit for CapturedEvent {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{value:?}"));
    }
}

/// Layer keeping every event it sees, for assertions on logging.
#[derive(Clone, Debug, Default)]
pub(crate) struct CapturedEvents(Arc<Mutex<Vec<CapturedEvent>>>);

impl CapturedEvents {
    /// Events whose metadata name is `name`, in emission order.
    pub(crate) fn named(&self, name: &str) -> Vec<CapturedEvent> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.name == name)
            .cloned()
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut captured = CapturedEvent {
            name: event.metadata().name().to_string(),
            fields: HashMap::new(),
        };
        event.record(&mut captured);
        self.0.lock().unwrap().push(captured);
    }
}
