//! HOST resource detector
//!
//! Detect the unique host ID and the host architecture.
use async_trait::async_trait;
use opentelemetry_resource_detection::{Detect, DetectContext, DetectError, Resource};
use opentelemetry_semantic_conventions as semconv;
#[cfg(target_os = "linux")]
use std::fs::read_to_string;
#[cfg(target_os = "linux")]
use std::path::Path;

/// Detect the unique host ID and architecture.
///
/// This detector looks up the host id using the sources defined
/// in the OpenTelemetry semantic conventions [`host.id from non-containerized systems`].
/// A host without id still reports `host.arch`.
///
/// [`host.id from non-containerized systems`]: https://opentelemetry.io/docs/specs/semconv/resource/host/#collecting-hostid-from-non-containerized-systems
#[derive(Debug)]
pub struct HostResourceDetector {
    host_id_detect: fn() -> Option<String>,
}

impl HostResourceDetector {
    fn detect_host(&self) -> Resource {
        let mut resource = Resource::new();
        resource.set_schema_url(semconv::SCHEMA_URL);
        if let Some(host_id) = (self.host_id_detect)()
            .map(|host_id| host_id.trim().to_owned())
            .filter(|host_id| !host_id.is_empty())
        {
            resource.insert(semconv::resource::HOST_ID, host_id);
        }
        if let Some(arch) = host_arch(std::env::consts::ARCH) {
            resource.insert(semconv::resource::HOST_ARCH, arch);
        }
        resource
    }
}

#[async_trait]
impl Detect for HostResourceDetector {
    async fn detect(&self, _cx: &DetectContext) -> Result<Resource, DetectError> {
        Ok(self.detect_host())
    }
}

/// Maps Rust's architecture names to the `host.arch` well-known values.
fn host_arch(arch: &str) -> Option<&'static str> {
    match arch {
        "x86_64" => Some("amd64"),
        "aarch64" => Some("arm64"),
        "x86" => Some("x86"),
        "arm" => Some("arm32"),
        "powerpc" => Some("ppc32"),
        "powerpc64" => Some("ppc64"),
        "s390x" => Some("s390x"),
        _ => None,
    }
}

#[cfg(target_os = "linux")]
fn host_id_detect() -> Option<String> {
    let machine_id_path = Path::new("/etc/machine-id");
    let dbus_machine_id_path = Path::new("/var/lib/dbus/machine-id");
    read_to_string(machine_id_path)
        .or_else(|_| read_to_string(dbus_machine_id_path))
        .ok()
}

// TODO: Implement non-linux platforms
#[cfg(not(target_os = "linux"))]
fn host_id_detect() -> Option<String> {
    None
}

impl Default for HostResourceDetector {
    fn default() -> Self {
        Self { host_id_detect }
    }
}
