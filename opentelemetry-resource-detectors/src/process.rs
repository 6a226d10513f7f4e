//! Process resource detector
//!
//! Detect process related information like pid, executable name.

use async_trait::async_trait;
use opentelemetry_resource_detection::{
    AttributeValue, Detect, DetectContext, DetectError, Resource,
};
use opentelemetry_semantic_conventions as semconv;
use serde::Deserialize;
use std::env::args_os;
use std::process::id;

/// Configuration of the `process` detector.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProcessConfig {
    /// Report the full command line as `process.command_args`.
    #[serde(default = "default_command_args")]
    pub command_args: bool,
}

fn default_command_args() -> bool {
    true
}

impl Default for ProcessConfig {
    fn default() -> Self {
        ProcessConfig {
            command_args: default_command_args(),
        }
    }
}

/// Detect process information.
///
/// This resource detector returns the following information:
///
/// - process command line arguments(`process.command_args`), the full command arguments of this
///   application, unless disabled with [`ProcessConfig::command_args`].
/// - OS assigned process id(`process.pid`).
/// - process runtime version(`process.runtime.version`).
/// - process runtime name(`process.runtime.name`).
/// - process runtime description(`process.runtime.description`).
#[derive(Debug)]
pub struct ProcessResourceDetector {
    command_args: bool,
}

impl ProcessResourceDetector {
    pub fn new(config: &ProcessConfig) -> Self {
        ProcessResourceDetector {
            command_args: config.command_args,
        }
    }

    fn detect_process(&self) -> Resource {
        let command_args = self.command_args.then(|| {
            let args = args_os()
                .map(|arg| AttributeValue::from(arg.to_string_lossy().into_owned()))
                .collect::<Vec<_>>();
            (semconv::attribute::PROCESS_COMMAND_ARGS, AttributeValue::Array(args))
        });

        let attributes = vec![
            command_args,
            Some((semconv::attribute::PROCESS_PID, AttributeValue::from(id()))),
            Some((
                semconv::attribute::PROCESS_RUNTIME_NAME,
                AttributeValue::from("rustc"),
            )),
            // Set from build.rs
            option_env!("RUSTC_VERSION").map(|rustc_version| {
                (
                    semconv::attribute::PROCESS_RUNTIME_VERSION,
                    AttributeValue::from(rustc_version),
                )
            }),
            // Set from build.rs
            option_env!("RUSTC_VERSION_DESCRIPTION").map(|rustc_version_desc| {
                (
                    semconv::attribute::PROCESS_RUNTIME_DESCRIPTION,
                    AttributeValue::from(rustc_version_desc),
                )
            }),
        ];

        Resource::with_schema_url(attributes.into_iter().flatten(), semconv::SCHEMA_URL)
    }
}

impl Default for ProcessResourceDetector {
    fn default() -> Self {
        Self::new(&ProcessConfig::default())
    }
}

#[async_trait]
impl Detect for ProcessResourceDetector {
    async fn detect(&self, _cx: &DetectContext) -> Result<Resource, DetectError> {
        Ok(self.detect_process())
    }
}
