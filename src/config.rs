//! Run configuration.
//!
//! Everything the `routes` command needs can come from a YAML file, from
//! command-line flags, or from the defaults below. Flags win over the file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ip::IpFormat;
use crate::routing::forwarding::DEFAULT_METRIC_SCALE;
use crate::routing::{AddressResolution, ForwardingOptions};

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Complete configuration for one forwarding-table run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub inputs: InputConfig,
    pub forwarding: ForwardingConfig,
    pub outputs: Vec<OutputSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
}

/// General settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Input file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub topology: PathBuf,
    pub addresses: PathBuf,
}

/// Route computation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Cost of one hop
    pub metric_scale: u32,
    pub resolution: AddressResolution,
    /// Worker threads; 0 picks automatically, 1 runs sequentially
    pub threads: usize,
}

/// One forwarding-table file to write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub path: PathBuf,
    #[serde(default)]
    pub ip_format: IpFormat,
}

impl OutputSpec {
    pub fn new(path: impl Into<PathBuf>, ip_format: IpFormat) -> Self {
        Self {
            path: path.into(),
            ip_format,
        }
    }
}

impl ForwardingConfig {
    /// Options for the forwarding-table generator.
    pub fn options(&self) -> ForwardingOptions {
        ForwardingOptions {
            metric_scale: self.metric_scale,
            resolution: self.resolution,
            parallel: self.threads != 1,
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(level) = &self.general.log_level {
            if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
                return Err(ValidationError::InvalidGeneral(format!(
                    "unknown log_level '{}', expected one of {}",
                    level,
                    LOG_LEVELS.join(", ")
                )));
            }
        }

        if self.inputs.topology.as_os_str().is_empty() {
            return Err(ValidationError::InvalidInputs(
                "topology path cannot be empty".to_string(),
            ));
        }
        if self.inputs.addresses.as_os_str().is_empty() {
            return Err(ValidationError::InvalidInputs(
                "addresses path cannot be empty".to_string(),
            ));
        }

        if self.forwarding.metric_scale == 0 {
            return Err(ValidationError::InvalidForwarding(
                "metric_scale must be at least 1".to_string(),
            ));
        }

        if self.outputs.is_empty() {
            return Err(ValidationError::InvalidOutputs(
                "at least one output must be configured".to_string(),
            ));
        }
        for (i, output) in self.outputs.iter().enumerate() {
            if output.path.as_os_str().is_empty() {
                return Err(ValidationError::InvalidOutputs(format!(
                    "output {} has an empty path",
                    i
                )));
            }
            if self.outputs[..i].iter().any(|other| other.path == output.path) {
                return Err(ValidationError::InvalidOutputs(format!(
                    "output path {:?} is listed more than once",
                    output.path
                )));
            }
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid input configuration: {0}")]
    InvalidInputs(String),
    #[error("Invalid forwarding configuration: {0}")]
    InvalidForwarding(String),
    #[error("Invalid output configuration: {0}")]
    InvalidOutputs(String),
}

/// Default implementations
impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            inputs: InputConfig::default(),
            forwarding: ForwardingConfig::default(),
            outputs: vec![OutputSpec::new("updates.txt", IpFormat::Integer)],
            report: None,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            topology: PathBuf::from("topo.txt"),
            addresses: PathBuf::from("ports.txt"),
        }
    }
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            metric_scale: DEFAULT_METRIC_SCALE,
            resolution: AddressResolution::default(),
            threads: 0,
        }
    }
}
