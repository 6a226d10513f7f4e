use std::sync::Arc;

use crate::{
    detector::DetectContext,
    merge::{merge_resource, merge_schema_url},
    provider::ResourceProvider,
    resource::Resource,
};

/// Applies the detected resource to the resources of outgoing telemetry.
#[derive(Debug)]
pub struct ResourceDetection {
    provider: ResourceProvider,
    override_existing: bool,
}

impl ResourceDetection {
    /// `override_existing` decides whether detected attributes replace the
    /// ones the telemetry already carries.
    pub fn new(provider: ResourceProvider, override_existing: bool) -> Self {
        ResourceDetection {
            provider,
            override_existing,
        }
    }

    pub fn provider(&self) -> &ResourceProvider {
        &self.provider
    }

    /// Runs detection ahead of the first [`apply_to`](Self::apply_to).
    pub async fn start(&self, cx: &DetectContext) -> Arc<Resource> {
        self.provider.get(cx).await
    }

    /// Merges the detected resource into `target`.
    ///
    /// The target keeps its schema URL unless it has none. Like
    /// [`ResourceProvider::get`], detection runs without deadline outside a
    /// Tokio runtime.
    pub async fn apply_to(&self, cx: &DetectContext, target: &mut Resource) {
        let detected = self.provider.get(cx).await;
        let schema_url = merge_schema_url(target.schema_url(), detected.schema_url());
        target.set_schema_url(schema_url);
        merge_resource(target, &detected, self.override_existing);
    }
}
