//! Resource detectors for the [`opentelemetry_resource_detection`] engine.
//!
//! # Resource detectors
//!
//! - [`EnvResourceDetector`] - detect attributes from `OTEL_RESOURCE_ATTRIBUTES` and `OTEL_SERVICE_NAME`.
//! - [`HostResourceDetector`] - detect unique host ID and architecture.
//! - [`OsResourceDetector`] - detect OS from runtime.
//! - [`ProcessResourceDetector`] - detect process information.
//! - [`K8sResourceDetector`] - detect pod information from downward API environment variables.
//!
//! [`resource_provider_factory`] registers all of them under their
//! [`DetectorType`] names, and [`DetectorsConfig`] is the matching
//! configuration section:
//!
//! ```yaml
//! detectors: [env, k8s, process]
//! process:
//!   command_args: false
//! k8s:
//!   pod_name_env: POD_NAME
//! ```
use std::{any::Any, collections::HashMap};

use opentelemetry_resource_detection::{
    BoxError, CreateSettings, Detect, DetectorFactory, DetectorType, ResourceDetectorConfig,
    ResourceProviderFactory,
};
use serde::Deserialize;

mod env;
mod host;
mod k8s;
mod os;
mod process;

pub use env::EnvResourceDetector;
pub use host::HostResourceDetector;
pub use k8s::{K8sConfig, K8sResourceDetector};
pub use os::OsResourceDetector;
pub use process::{ProcessConfig, ProcessResourceDetector};

pub const ENV: DetectorType = DetectorType::from_static("env");
pub const HOST: DetectorType = DetectorType::from_static("host");
pub const OS: DetectorType = DetectorType::from_static("os");
pub const PROCESS: DetectorType = DetectorType::from_static("process");
pub const K8S: DetectorType = DetectorType::from_static("k8s");

/// Configuration sections of the detectors that take one.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DetectorsConfig {
    pub process: ProcessConfig,
    pub k8s: K8sConfig,
}

impl ResourceDetectorConfig for DetectorsConfig {
    fn config_for(&self, detector_type: &DetectorType) -> Option<&dyn Any> {
        match detector_type.as_str() {
            "process" => Some(&self.process as &dyn Any),
            "k8s" => Some(&self.k8s as &dyn Any),
            _ => None,
        }
    }

    fn section_keys(&self) -> &[&str] {
        &["process", "k8s"]
    }
}

/// Factories of every detector in this crate, keyed by detector type.
pub fn detector_factories() -> HashMap<DetectorType, DetectorFactory> {
    let factories: [(DetectorType, DetectorFactory); 5] = [
        (ENV, Box::new(create_env_detector)),
        (HOST, Box::new(create_host_detector)),
        (OS, Box::new(create_os_detector)),
        (PROCESS, Box::new(create_process_detector)),
        (K8S, Box::new(create_k8s_detector)),
    ];
    factories.into_iter().collect()
}

/// A [`ResourceProviderFactory`] knowing every detector in this crate.
pub fn resource_provider_factory() -> ResourceProviderFactory {
    ResourceProviderFactory::new(detector_factories())
}

fn create_env_detector(
    _settings: &CreateSettings,
    _config: Option<&dyn Any>,
) -> Result<Box<dyn Detect>, BoxError> {
    Ok(Box::new(EnvResourceDetector))
}

fn create_host_detector(
    _settings: &CreateSettings,
    _config: Option<&dyn Any>,
) -> Result<Box<dyn Detect>, BoxError> {
    Ok(Box::new(HostResourceDetector::default()))
}

fn create_os_detector(
    _settings: &CreateSettings,
    _config: Option<&dyn Any>,
) -> Result<Box<dyn Detect>, BoxError> {
    Ok(Box::new(OsResourceDetector))
}

fn create_process_detector(
    _settings: &CreateSettings,
    config: Option<&dyn Any>,
) -> Result<Box<dyn Detect>, BoxError> {
    let config = downcast_config::<ProcessConfig>(config)?;
    Ok(Box::new(ProcessResourceDetector::new(&config)))
}

fn create_k8s_detector(
    _settings: &CreateSettings,
    config: Option<&dyn Any>,
) -> Result<Box<dyn Detect>, BoxError> {
    let config = downcast_config::<K8sConfig>(config)?;
    Ok(Box::new(K8sResourceDetector::new(config)))
}

fn downcast_config<C>(config: Option<&dyn Any>) -> Result<C, BoxError>
where
    C: Any + Clone + Default,
{
    match config {
        None => Ok(C::default()),
        Some(config) => config.downcast_ref::<C>().cloned().ok_or_else(|| {
            format!(
                "unexpected configuration type, expected {}",
                std::any::type_name::<C>()
            )
            .into()
        }),
    }
}
