//! Detection of the entity producing telemetry.
//!
//! A [`ResourceProvider`] runs an ordered list of [`Detect`] implementations
//! (cloud metadata, host, container runtime, ...), merges what they report
//! into a single [`Resource`] and caches it. Detection happens once per
//! provider, no matter how many tasks ask for the resource concurrently.
//!
//! # Merging
//!
//! - Detectors run sequentially in the configured order and the first
//!   detector to report an attribute wins ([`merge_resource`]).
//! - The first non-empty schema URL wins ([`merge_schema_url`]); attributes
//!   are not translated between schema versions.
//! - A detector that fails or exceeds the deadline is logged and skipped.
//! - An optional allow-list trims the merged resource
//!   ([`filter_attributes`]).
//!
//! # Building providers
//!
//! [`ResourceProviderFactory`] maps detector type names to
//! [`DetectorFactory`] functions. Providers are created from a list of
//! detector types, directly or from a YAML [`ResourceDetectionConfig`].
//!
//! ```no_run
//! # async fn run(factory: opentelemetry_resource_detection::ResourceProviderFactory) -> Result<(), Box<dyn std::error::Error>> {
//! use opentelemetry_resource_detection::{
//!     CreateSettings, DetectContext, NoDetectorConfig, ResourceDetectionConfig,
//! };
//!
//! let config = ResourceDetectionConfig::<NoDetectorConfig>::from_yaml_str("detectors: [env, host]")?;
//! let provider = factory.create_resource_provider_from_config(&CreateSettings::new("resourcedetection"), &config)?;
//! let resource = provider.get(&DetectContext::background()).await;
//! println!("{resource}");
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod detection;
mod detector;
mod error;
mod factory;
mod merge;
mod provider;
mod resource;
mod value;

#[cfg(test)]
mod testing;

pub use config::{NoDetectorConfig, ResourceDetectionConfig};
pub use detection::ResourceDetection;
pub use detector::{Detect, DetectContext, DetectorType, SdkDetector};
pub use error::{BoxError, BuildError, ConfigError, DetectError};
pub use factory::{CreateSettings, DetectorFactory, ResourceDetectorConfig, ResourceProviderFactory};
pub use merge::{filter_attributes, is_empty_resource, merge_resource, merge_schema_url};
pub use provider::ResourceProvider;
pub use resource::Resource;
pub use value::{attributes_to_map, to_inspectable, AttributeValue, Attributes};
