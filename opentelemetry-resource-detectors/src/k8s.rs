//! K8S resource detector
//!
//! Detect Kubernetes pod information exposed through the downward API.
use async_trait::async_trait;
use opentelemetry_resource_detection::{Detect, DetectContext, DetectError, Resource};
use opentelemetry_semantic_conventions as semconv;
use serde::Deserialize;
use std::env;

/// Configuration of the `k8s` detector: names of the environment variables
/// the pod spec maps downward API fields to.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct K8sConfig {
    pub pod_name_env: String,
    pub namespace_name_env: String,
    pub node_name_env: String,
}

impl Default for K8sConfig {
    fn default() -> Self {
        K8sConfig {
            pod_name_env: "K8S_POD_NAME".to_string(),
            namespace_name_env: "K8S_NAMESPACE_NAME".to_string(),
            node_name_env: "K8S_NODE_NAME".to_string(),
        }
    }
}

/// A resource detector for Kubernetes environment variables.
///
/// Fails when none of the configured variables is set, which means the
/// process is not running in a pod.
#[derive(Debug, Default)]
pub struct K8sResourceDetector {
    config: K8sConfig,
}

impl K8sResourceDetector {
    pub fn new(config: K8sConfig) -> Self {
        K8sResourceDetector { config }
    }

    fn detect_pod(&self) -> Result<Resource, DetectError> {
        let attributes = [
            (semconv::resource::K8S_POD_NAME, &self.config.pod_name_env),
            (
                semconv::resource::K8S_NAMESPACE_NAME,
                &self.config.namespace_name_env,
            ),
            (semconv::resource::K8S_NODE_NAME, &self.config.node_name_env),
        ]
        .into_iter()
        .filter_map(|(key, variable)| {
            env::var(variable)
                .ok()
                .filter(|value| !value.is_empty())
                .map(|value| (key, value))
        })
        .collect::<Vec<_>>();

        if attributes.is_empty() {
            return Err(DetectError::Unavailable(
                "no Kubernetes environment variables set".to_string(),
            ));
        }
        Ok(Resource::with_schema_url(attributes, semconv::SCHEMA_URL))
    }
}

#[async_trait]
impl Detect for K8sResourceDetector {
    async fn detect(&self, _cx: &DetectContext) -> Result<Resource, DetectError> {
        self.detect_pod()
    }
}
