use std::{
    collections::HashSet,
    fmt,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use futures::future::{BoxFuture, FutureExt, Shared};
use opentelemetry::{otel_debug, otel_info, otel_warn};

use crate::{
    detector::{Detect, DetectContext},
    error::DetectError,
    merge::{filter_attributes, merge_resource, merge_schema_url},
    resource::Resource,
};

/// The detection pass shared by every caller of [`ResourceProvider::get`].
type SharedDetection = Shared<BoxFuture<'static, Arc<Resource>>>;

/// Runs a list of detectors once and caches the merged resource.
///
/// Detectors run one after the other in the configured order. When several
/// detectors report the same attribute, the earliest one wins. A detector
/// that fails or runs past the deadline is logged and skipped.
pub struct ResourceProvider {
    detectors: Arc<[Box<dyn Detect>]>,
    attributes_to_keep: Arc<HashSet<String>>,
    timeout: Duration,
    detection: Mutex<Option<SharedDetection>>,
}

impl ResourceProvider {
    /// Creates a provider over `detectors`.
    ///
    /// An empty `attributes_to_keep` keeps every detected attribute.
    pub fn new(
        timeout: Duration,
        attributes_to_keep: HashSet<String>,
        detectors: Vec<Box<dyn Detect>>,
    ) -> Self {
        ResourceProvider {
            detectors: detectors.into(),
            attributes_to_keep: Arc::new(attributes_to_keep),
            timeout,
            detection: Mutex::new(None),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of configured detectors.
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Returns the detected resource, running detection on first use.
    ///
    /// The first call starts detection with a deadline of `cx` shortened to
    /// the provider timeout. Every call, concurrent or later, waits for that
    /// same pass and receives the same resource. If the caller that started
    /// detection is cancelled, the next waiter carries the pass on; it is
    /// never restarted.
    ///
    /// The deadline is enforced with the Tokio timer. When detection is
    /// driven by another executor, detectors run without deadline and a
    /// warning is logged.
    pub async fn get(&self, cx: &DetectContext) -> Arc<Resource> {
        self.detection(cx).await
    }

    /// Returns the detected resource if detection already completed.
    pub fn detected(&self) -> Option<Arc<Resource>> {
        self.detection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|detection| detection.peek().cloned())
    }

    fn detection(&self, cx: &DetectContext) -> SharedDetection {
        let mut detection = self
            .detection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        detection
            .get_or_insert_with(|| {
                detect_resource(
                    Arc::clone(&self.detectors),
                    Arc::clone(&self.attributes_to_keep),
                    cx.with_timeout(self.timeout),
                )
                .boxed()
                .shared()
            })
            .clone()
    }
}

impl fmt::Debug for ResourceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceProvider")
            .field("detectors", &self.detectors)
            .field("attributes_to_keep", &self.attributes_to_keep)
            .field("timeout", &self.timeout)
            .field("detected", &self.detected().is_some())
            .finish()
    }
}

async fn detect_resource(
    detectors: Arc<[Box<dyn Detect>]>,
    attributes_to_keep: Arc<HashSet<String>>,
    cx: DetectContext,
) -> Arc<Resource> {
    let mut resource = Resource::new();
    let mut schema_url = String::new();

    otel_info!(name: "ResourceDetection.Started", message = "began detecting resource information");

    // Deadlines need the Tokio timer.
    let cx = if cx.deadline().is_some() && tokio::runtime::Handle::try_current().is_err() {
        otel_warn!(
            name: "ResourceDetection.TimeoutDisabled",
            message = "no Tokio runtime, running detectors without deadline"
        );
        DetectContext::background()
    } else {
        cx
    };

    for detector in detectors.iter() {
        match run_detector(&**detector, &cx).await {
            Ok(detected) => {
                otel_debug!(
                    name: "ResourceDetection.DetectorSucceeded",
                    detector = format!("{detector:?}"),
                    attributes = detected.len()
                );
                schema_url = merge_schema_url(&schema_url, detected.schema_url());
                merge_resource(&mut resource, &detected, false);
            }
            Err(error) => {
                otel_warn!(
                    name: "ResourceDetection.DetectorFailed",
                    message = "failed to detect resource",
                    detector = format!("{detector:?}"),
                    reason = &error.to_string()
                );
            }
        }
    }

    let dropped = filter_attributes(resource.attributes_mut(), &attributes_to_keep);

    otel_info!(
        name: "ResourceDetection.Detected",
        message = "detected resource information",
        resource = resource.to_string()
    );
    if !dropped.is_empty() {
        otel_info!(
            name: "ResourceDetection.AttributesDropped",
            message = "dropped resource information",
            keys = format!("{dropped:?}")
        );
    }

    resource.set_schema_url(schema_url);
    Arc::new(resource)
}

async fn run_detector(detector: &dyn Detect, cx: &DetectContext) -> Result<Resource, DetectError> {
    match cx.deadline() {
        Some(deadline) => tokio::time::timeout_at(deadline, detector.detect(cx))
            .await
            .map_err(|_| DetectError::DeadlineExceeded)?,
        None => detector.detect(cx).await,
    }
}
