//! The capability every resource probe implements.
use std::{
    any::type_name,
    borrow::{Borrow, Cow},
    fmt::{self, Debug, Display},
    time::Duration,
};

use async_trait::async_trait;
use opentelemetry_sdk::resource::ResourceDetector;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::{error::DetectError, resource::Resource};

/// Name of a class of detector, such as `env` or `host`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DetectorType(Cow<'static, str>);

impl DetectorType {
    pub const fn from_static(name: &'static str) -> Self {
        DetectorType(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for DetectorType {
    fn from(name: &'static str) -> Self {
        DetectorType(Cow::Borrowed(name))
    }
}

impl From<String> for DetectorType {
    fn from(name: String) -> Self {
        DetectorType(Cow::Owned(name))
    }
}

impl Borrow<str> for DetectorType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for DetectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deadline information handed to detectors.
///
/// A context without deadline never expires. Deriving a context can only
/// shorten its deadline.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetectContext {
    deadline: Option<Instant>,
}

impl DetectContext {
    /// A context without deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derives a context that expires at `deadline` or earlier.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        };
        DetectContext {
            deadline: Some(deadline),
        }
    }

    /// Derives a context that expires after `timeout` or earlier.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => *self,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| deadline <= Instant::now())
    }
}

/// Detects resource information from the environment.
///
/// Implementations should give up once the context deadline has passed.
/// The returned resource carries the schema URL its attribute names follow,
/// or an empty one.
#[async_trait]
pub trait Detect: Debug + Send + Sync {
    async fn detect(&self, cx: &DetectContext) -> Result<Resource, DetectError>;
}

/// Runs an SDK [`ResourceDetector`] as a [`Detect`].
///
/// SDK detectors are synchronous and ignore the deadline.
pub struct SdkDetector<D> {
    inner: D,
}

impl<D> SdkDetector<D> {
    pub fn new(inner: D) -> Self {
        SdkDetector { inner }
    }
}

impl<D> Debug for SdkDetector<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkDetector")
            .field("inner", &type_name::<D>())
            .finish()
    }
}

#[async_trait]
impl<D> Detect for SdkDetector<D>
where
    D: ResourceDetector + Send + Sync,
{
    async fn detect(&self, _cx: &DetectContext) -> Result<Resource, DetectError> {
        Ok(Resource::from(&self.inner.detect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::KeyValue;

    struct StaticSdkDetector;

    impl ResourceDetector for StaticSdkDetector {
        fn detect(&self) -> opentelemetry_sdk::Resource {
            opentelemetry_sdk::Resource::builder_empty()
                .with_schema_url(
                    [KeyValue::new("cloud.provider", "aws")],
                    "https://opentelemetry.io/schemas/1.26.0",
                )
                .build()
        }
    }

    #[tokio::test]
    async fn test_sdk_detector() {
        let detector = SdkDetector::new(StaticSdkDetector);
        let resource = detector
            .detect(&DetectContext::background())
            .await
            .unwrap();
        assert_eq!(resource.get("cloud.provider"), Some(&"aws".into()));
        assert_eq!(
            resource.schema_url(),
            "https://opentelemetry.io/schemas/1.26.0"
        );
        assert!(format!("{detector:?}").contains("StaticSdkDetector"));
    }

    #[test]
    fn test_detector_type_display_and_lookup() {
        let detector_type = DetectorType::from("host");
        assert_eq!(detector_type.to_string(), "host");

        let mut types = std::collections::HashSet::new();
        types.insert(DetectorType::from(String::from("env")));
        assert!(types.contains("env"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_context_deadline_only_shrinks() {
        let cx = DetectContext::background();
        assert_eq!(cx.deadline(), None);
        assert_eq!(cx.remaining(), None);
        assert!(!cx.is_expired());

        let short = cx.with_timeout(Duration::from_secs(1));
        let still_short = short.with_timeout(Duration::from_secs(10));
        assert_eq!(short.deadline(), still_short.deadline());
        assert_eq!(still_short.remaining(), Some(Duration::from_secs(1)));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(still_short.is_expired());
        assert_eq!(still_short.remaining(), Some(Duration::ZERO));
    }
}
