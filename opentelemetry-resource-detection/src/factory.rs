//! Building detectors and providers from detector type names.
use std::{
    any::Any,
    borrow::Cow,
    collections::{HashMap, HashSet},
    fmt,
    time::Duration,
};

use opentelemetry::otel_debug;

use crate::{
    config::ResourceDetectionConfig,
    detector::{Detect, DetectorType},
    error::{BoxError, BuildError},
    provider::ResourceProvider,
};

/// Builds a detector from the component settings and its own configuration.
///
/// The configuration is `None` when none was supplied for the detector type.
/// Factories downcast it to their configuration type.
pub type DetectorFactory = Box<
    dyn Fn(&CreateSettings, Option<&dyn Any>) -> Result<Box<dyn Detect>, BoxError> + Send + Sync,
>;

/// Settings of the component creating detectors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateSettings {
    id: Cow<'static, str>,
}

impl CreateSettings {
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        CreateSettings { id: id.into() }
    }

    /// Identifier of the component instance, e.g. `resourcedetection/system`.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Source of per-detector configuration.
pub trait ResourceDetectorConfig {
    fn config_for(&self, detector_type: &DetectorType) -> Option<&dyn Any>;

    /// Top-level configuration keys holding detector sections.
    ///
    /// [`ResourceDetectionConfig`] rejects any other key it does not know.
    fn section_keys(&self) -> &[&str] {
        &[]
    }
}

impl ResourceDetectorConfig for () {
    fn config_for(&self, _detector_type: &DetectorType) -> Option<&dyn Any> {
        None
    }
}

impl ResourceDetectorConfig for HashMap<DetectorType, Box<dyn Any + Send + Sync>> {
    fn config_for(&self, detector_type: &DetectorType) -> Option<&dyn Any> {
        self.get(detector_type).map(|config| &**config as &dyn Any)
    }
}

/// Registry of the detector types a provider can be built from.
pub struct ResourceProviderFactory {
    detectors: HashMap<DetectorType, DetectorFactory>,
}

impl ResourceProviderFactory {
    pub fn new(detectors: HashMap<DetectorType, DetectorFactory>) -> Self {
        ResourceProviderFactory { detectors }
    }

    /// Registers `factory` for `detector_type`, replacing any previous one.
    pub fn with_factory<F>(mut self, detector_type: impl Into<DetectorType>, factory: F) -> Self
    where
        F: Fn(&CreateSettings, Option<&dyn Any>) -> Result<Box<dyn Detect>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.detectors.insert(detector_type.into(), Box::new(factory));
        self
    }

    pub fn contains(&self, detector_type: &str) -> bool {
        self.detectors.contains_key(detector_type)
    }

    /// Registered detector types, in no particular order.
    pub fn detector_types(&self) -> impl Iterator<Item = &DetectorType> {
        self.detectors.keys()
    }

    /// Builds a provider running `detector_types` in the given order.
    ///
    /// Fails on the first unknown detector type or failing factory; no
    /// provider is built from a partial detector list.
    pub fn create_resource_provider<I, S>(
        &self,
        settings: &CreateSettings,
        timeout: Duration,
        attributes: I,
        configs: &dyn ResourceDetectorConfig,
        detector_types: &[DetectorType],
    ) -> Result<ResourceProvider, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let detectors = self.get_detectors(settings, configs, detector_types)?;
        let attributes_to_keep: HashSet<String> = attributes.into_iter().map(Into::into).collect();

        otel_debug!(
            name: "ResourceDetection.ProviderCreated",
            component = settings.id(),
            detectors = format!("{detector_types:?}"),
            attributes_to_keep = attributes_to_keep.len()
        );

        Ok(ResourceProvider::new(timeout, attributes_to_keep, detectors))
    }

    /// Builds a provider from a loaded [`ResourceDetectionConfig`].
    pub fn create_resource_provider_from_config<D>(
        &self,
        settings: &CreateSettings,
        config: &ResourceDetectionConfig<D>,
    ) -> Result<ResourceProvider, BuildError>
    where
        D: ResourceDetectorConfig,
    {
        self.create_resource_provider(
            settings,
            config.timeout(),
            config.attributes.iter().cloned(),
            &config.detector_config,
            &config.detectors,
        )
    }

    /// Builds one detector per requested type, preserving request order.
    pub fn get_detectors(
        &self,
        settings: &CreateSettings,
        configs: &dyn ResourceDetectorConfig,
        detector_types: &[DetectorType],
    ) -> Result<Vec<Box<dyn Detect>>, BuildError> {
        detector_types
            .iter()
            .map(|detector_type| {
                let factory = self
                    .detectors
                    .get(detector_type)
                    .ok_or_else(|| BuildError::UnknownDetectorType(detector_type.clone()))?;
                factory(settings, configs.config_for(detector_type)).map_err(|source| {
                    BuildError::DetectorConstructionFailed {
                        detector_type: detector_type.clone(),
                        source,
                    }
                })
            })
            .collect()
    }
}

impl fmt::Debug for ResourceProviderFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut detector_types: Vec<_> = self.detectors.keys().collect();
        detector_types.sort();
        f.debug_struct("ResourceProviderFactory")
            .field("detectors", &detector_types)
            .finish()
    }
}
