//! Detect the resource of the current process and print it.
//!
//! run with `$ cargo run -p detect-resource -- [config.yaml]`
use opentelemetry_resource_detection::{
    CreateSettings, DetectContext, Resource, ResourceDetection, ResourceDetectionConfig,
};
use opentelemetry_resource_detectors::{resource_provider_factory, DetectorsConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_CONFIG: &str = r#"
detectors: [env, k8s, host, os, process]
timeout_ms: 2000
override: false
process:
  command_args: false
"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter_fmt = EnvFilter::new("info").add_directive("opentelemetry=debug".parse()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter_fmt))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ResourceDetectionConfig::<DetectorsConfig>::from_yaml_file(path)?,
        None => ResourceDetectionConfig::<DetectorsConfig>::from_yaml_str(DEFAULT_CONFIG)?,
    };

    let provider = resource_provider_factory()
        .create_resource_provider_from_config(&CreateSettings::new("resourcedetection"), &config)?;
    let detection = ResourceDetection::new(provider, config.override_existing);

    let cx = DetectContext::background();
    let detected = detection.start(&cx).await;
    println!("detected: {detected}");

    let mut telemetry_resource: Resource = [("service.name", "detect-resource")].into_iter().collect();
    detection.apply_to(&cx, &mut telemetry_resource).await;
    println!("applied: {telemetry_resource}");
    println!("sdk: {:?}", telemetry_resource.to_sdk_resource());

    Ok(())
}
