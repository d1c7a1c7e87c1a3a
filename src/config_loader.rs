use crate::config::{Config, OutputSpec};
use crate::ip::IpFormat;
use crate::routing::AddressResolution;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration file '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration file '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Command-line values that override the configuration file
#[derive(Debug, Clone, Default)]
pub struct RoutesCliOverrides {
    pub topology: Option<PathBuf>,
    pub addresses: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub ip_format: Option<IpFormat>,
    pub metric_scale: Option<u32>,
    pub resolution: Option<AddressResolution>,
    pub threads: Option<usize>,
    pub report: Option<PathBuf>,
}

/// Apply CLI overrides to a configuration
///
/// `--output` replaces every configured output with a single file. A lone
/// `--ip-format` re-targets all configured outputs to that format.
pub fn apply_overrides(config: &mut Config, overrides: &RoutesCliOverrides) -> Result<()> {
    if let Some(topology) = &overrides.topology {
        config.inputs.topology = topology.clone();
    }
    if let Some(addresses) = &overrides.addresses {
        config.inputs.addresses = addresses.clone();
    }

    match (&overrides.output, overrides.ip_format) {
        (Some(path), format) => {
            config.outputs = vec![OutputSpec::new(path.clone(), format.unwrap_or_default())];
        }
        (None, Some(format)) => {
            for output in &mut config.outputs {
                output.ip_format = format;
            }
        }
        (None, None) => {}
    }

    if let Some(scale) = overrides.metric_scale {
        config.forwarding.metric_scale = scale;
    }
    if let Some(resolution) = overrides.resolution {
        config.forwarding.resolution = resolution;
    }
    if let Some(threads) = overrides.threads {
        config.forwarding.threads = threads;
    }
    if let Some(report) = &overrides.report {
        config.report = Some(report.clone());
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
