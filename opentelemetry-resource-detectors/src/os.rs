//! OS resource detector
//!
//! Detect the runtime operating system type.
use async_trait::async_trait;
use opentelemetry_resource_detection::{Detect, DetectContext, DetectError, Resource};
use opentelemetry_semantic_conventions as semconv;
use std::env::consts::OS;

/// Detect runtime operating system information.
///
/// This detector uses Rust's [`OS constant`] to detect the operating system type and
/// maps the result to the supported value defined in [`OpenTelemetry spec`].
///
/// [`OS constant`]: https://doc.rust-lang.org/std/env/consts/constant.OS.html
/// [`OpenTelemetry spec`]: https://github.com/open-telemetry/opentelemetry-specification/blob/main/specification/resource/semantic_conventions/os.md
#[derive(Debug, Default)]
pub struct OsResourceDetector;

#[async_trait]
impl Detect for OsResourceDetector {
    async fn detect(&self, _cx: &DetectContext) -> Result<Resource, DetectError> {
        Ok(Resource::with_schema_url(
            [(semconv::resource::OS_TYPE, os_type(OS))],
            semconv::SCHEMA_URL,
        ))
    }
}

fn os_type(os: &str) -> &str {
    match os {
        "macos" | "ios" => "darwin",
        other => other,
    }
}
