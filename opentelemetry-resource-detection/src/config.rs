//! # Resource detection configuration
//!
//! Declarative configuration of a resource provider, loaded from YAML:
//!
//! ```yaml
//! detectors: [env, host]
//! timeout_ms: 2000
//! override: false
//! attributes: [host.id, service.name]
//! ```
//!
//! Detector specific sections live next to these keys and are parsed into
//! the `D` parameter.
use std::{any::Any, path::Path, time::Duration};

use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    detector::DetectorType,
    error::ConfigError,
    factory::ResourceDetectorConfig,
};

const DEFAULT_TIMEOUT_MS: u64 = 5000;

const CONFIG_KEYS: [&str; 4] = ["detectors", "timeout_ms", "override", "attributes"];

/// Configuration of a resource provider and the detectors it runs.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ResourceDetectionConfig<D = NoDetectorConfig> {
    /// Detector types to run, in precedence order.
    #[serde(default)]
    pub detectors: Vec<DetectorType>,

    /// Bound on the whole detection pass, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether detected attributes replace the ones already present on
    /// the telemetry resource.
    #[serde(default = "default_override", rename = "override")]
    pub override_existing: bool,

    /// Allow-list of attribute keys; empty keeps everything.
    #[serde(default)]
    pub attributes: Vec<String>,

    #[serde(flatten)]
    pub detector_config: D,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_override() -> bool {
    true
}

impl<D> ResourceDetectionConfig<D> {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl<D> ResourceDetectionConfig<D>
where
    D: DeserializeOwned + ResourceDetectorConfig,
{
    /// Parses a YAML document.
    ///
    /// Top-level keys other than the provider settings and the sections of
    /// `D` fail with [`ConfigError::UnknownKeys`].
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;

        let document: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let unknown_keys: Vec<String> = match document.as_mapping() {
            Some(mapping) => mapping
                .keys()
                .map(|key| match key.as_str() {
                    Some(key) => key.to_owned(),
                    None => format!("{key:?}"),
                })
                .filter(|key| {
                    !CONFIG_KEYS.contains(&key.as_str())
                        && !config.detector_config.section_keys().contains(&key.as_str())
                })
                .collect(),
            None => Vec::new(),
        };
        if !unknown_keys.is_empty() {
            return Err(ConfigError::UnknownKeys(unknown_keys));
        }

        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }
}

impl<D: Default> Default for ResourceDetectionConfig<D> {
    fn default() -> Self {
        ResourceDetectionConfig {
            detectors: Vec::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            override_existing: true,
            attributes: Vec::new(),
            detector_config: D::default(),
        }
    }
}

/// Detector configuration for providers whose detectors take none.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct NoDetectorConfig {}

impl ResourceDetectorConfig for NoDetectorConfig {
    fn config_for(&self, _detector_type: &DetectorType) -> Option<&dyn Any> {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_deserialize_config() {
        let yaml_str = r#"
          detectors: [env, host]
          timeout_ms: 2000
          override: false
          attributes:
            - host.id
            - service.name
        "#;
        let config = ResourceDetectionConfig::<NoDetectorConfig>::from_yaml_str(yaml_str).unwrap();
        assert_eq!(config.detectors, vec!["env".into(), "host".into()]);
        assert_eq!(config.timeout(), Duration::from_secs(2));
        assert!(!config.override_existing);
        assert_eq!(config.attributes, vec!["host.id", "service.name"]);
    }

    #[test]
    fn test_defaults() {
        let config = ResourceDetectionConfig::<NoDetectorConfig>::from_yaml_str("detectors: [os]").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.override_existing);
        assert!(config.attributes.is_empty());
        assert_eq!(
            ResourceDetectionConfig::<NoDetectorConfig>::default().timeout(),
            config.timeout()
        );
    }

    #[test]
    fn test_detector_sections_are_flattened() {
        #[derive(Debug, Default, Deserialize, PartialEq)]
        struct Sections {
            #[serde(default)]
            host: HostSection,
        }

        #[derive(Debug, Default, Deserialize, PartialEq)]
        struct HostSection {
            #[serde(default)]
            fqdn: bool,
        }

        impl ResourceDetectorConfig for Sections {
            fn config_for(&self, _detector_type: &DetectorType) -> Option<&dyn Any> {
                Some(&self.host as &dyn Any)
            }

            fn section_keys(&self) -> &[&str] {
                &["host"]
            }
        }

        let yaml_str = r#"
          detectors: [host]
          host:
            fqdn: true
        "#;
        let config = ResourceDetectionConfig::<Sections>::from_yaml_str(yaml_str).unwrap();
        assert!(config.detector_config.host.fqdn);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = ResourceDetectionConfig::<NoDetectorConfig>::from_yaml_str("detector: [env]");
        match result {
            Err(ConfigError::UnknownKeys(keys)) => assert_eq!(keys, vec!["detector"]),
            other => panic!("expected unknown keys, got {other:?}"),
        }

        let result = ResourceDetectionConfig::<NoDetectorConfig>::from_yaml_str(
            "detectors: [host]\nhost:\n  fqdn: true\n",
        );
        assert!(matches!(result, Err(ConfigError::UnknownKeys(keys)) if keys == vec!["host"]));
    }

    #[test]
    fn test_invalid_config() {
        let result = ResourceDetectionConfig::<NoDetectorConfig>::from_yaml_str("timeout_ms: soon");
        match result {
            Err(ConfigError::Parse(_)) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "detectors: [env]").unwrap();

        let config = ResourceDetectionConfig::<NoDetectorConfig>::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.detectors, vec!["env".into()]);

        let missing = ResourceDetectionConfig::<NoDetectorConfig>::from_yaml_file("/nonexistent/resourcedetection.yaml");
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
