//! ENV resource detector
//!
//! Detect resource attributes set by the user through environment variables.
use async_trait::async_trait;
use opentelemetry_resource_detection::{Detect, DetectContext, DetectError, Resource};
use opentelemetry_semantic_conventions as semconv;
use std::env;

const OTEL_RESOURCE_ATTRIBUTES: &str = "OTEL_RESOURCE_ATTRIBUTES";
const OTEL_SERVICE_NAME: &str = "OTEL_SERVICE_NAME";

/// Detect resource attributes from `OTEL_RESOURCE_ATTRIBUTES` and
/// `OTEL_SERVICE_NAME`.
///
/// `OTEL_RESOURCE_ATTRIBUTES` holds comma separated `key=value` pairs, keys
/// and values are trimmed. A pair without `=` or with an empty key fails the
/// whole detection. `OTEL_SERVICE_NAME` takes precedence over a
/// `service.name` pair.
#[derive(Debug, Default)]
pub struct EnvResourceDetector;

#[async_trait]
impl Detect for EnvResourceDetector {
    async fn detect(&self, _cx: &DetectContext) -> Result<Resource, DetectError> {
        detect_from_env()
    }
}

fn detect_from_env() -> Result<Resource, DetectError> {
    let mut resource = match env::var(OTEL_RESOURCE_ATTRIBUTES) {
        Ok(attributes) => parse_resource_attributes(&attributes)?,
        Err(_) => Resource::new(),
    };

    if let Some(service_name) = env::var(OTEL_SERVICE_NAME)
        .ok()
        .filter(|name| !name.trim().is_empty())
    {
        resource.insert(semconv::resource::SERVICE_NAME, service_name.trim());
    }

    Ok(resource)
}

fn parse_resource_attributes(attributes: &str) -> Result<Resource, DetectError> {
    attributes
        .split(',')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_owned(), value.trim().to_owned()))
            }
            _ => Err(DetectError::other(format!(
                "invalid resource format in {OTEL_RESOURCE_ATTRIBUTES}: {pair:?}"
            ))),
        })
        .collect()
}
