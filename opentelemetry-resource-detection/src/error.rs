use thiserror::Error;

use crate::detector::DetectorType;

/// Boxed error returned by detector factories and detectors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while building a resource provider.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid detector key: {0}")]
    UnknownDetectorType(DetectorType),
    #[error("failed creating detector type \"{detector_type}\"")]
    DetectorConstructionFailed {
        detector_type: DetectorType,
        #[source]
        source: BoxError,
    },
}

/// Errors reported by a single detector run.
///
/// These never escape the provider; they are logged and the detector's
/// contribution is skipped.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("resource detection deadline exceeded")]
    DeadlineExceeded,
    #[error("resource information unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Other(BoxError),
}

impl DetectError {
    /// Wraps any error as [`DetectError::Other`].
    pub fn other(error: impl Into<BoxError>) -> Self {
        DetectError::Other(error.into())
    }
}

/// Errors raised while loading resource detection configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read resource detection configuration file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse resource detection configuration")]
    Parse(#[from] serde_yaml::Error),
    #[error("unknown resource detection configuration keys: {}", .0.join(", "))]
    UnknownKeys(Vec<String>),
}
