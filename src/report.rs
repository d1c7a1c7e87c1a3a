//! Run report generation.
//!
//! Summarizes one forwarding-table run as JSON and as a short log summary.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::ip::IpFormat;
use crate::routing::{AddressResolution, ForwardingTable};

/// Summary of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generated_at: String,
    pub topology_file: PathBuf,
    pub address_file: PathBuf,
    pub nodes: usize,
    pub links: usize,
    pub addresses: usize,
    pub skipped_topology_lines: usize,
    pub skipped_address_lines: usize,
    pub metric_scale: u32,
    pub resolution: AddressResolution,
    pub local_routes: usize,
    pub host_routes: usize,
    /// Skipped routes, counted by kind
    pub skipped_routes: BTreeMap<String, usize>,
    pub outputs: Vec<OutputSummary>,
}

/// One written forwarding-table file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSummary {
    pub path: PathBuf,
    pub ip_format: IpFormat,
    pub lines: usize,
}

/// Input-side counts gathered while loading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputStats {
    pub nodes: usize,
    pub links: usize,
    pub addresses: usize,
    pub skipped_topology_lines: usize,
    pub skipped_address_lines: usize,
}

impl GenerationReport {
    pub fn new(
        config: &Config,
        inputs: InputStats,
        table: &ForwardingTable,
        outputs: Vec<OutputSummary>,
    ) -> Self {
        let mut skipped_routes = BTreeMap::new();
        for skip in table.skipped() {
            *skipped_routes.entry(skip.kind().to_string()).or_insert(0) += 1;
        }

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            topology_file: config.inputs.topology.clone(),
            address_file: config.inputs.addresses.clone(),
            nodes: inputs.nodes,
            links: inputs.links,
            addresses: inputs.addresses,
            skipped_topology_lines: inputs.skipped_topology_lines,
            skipped_address_lines: inputs.skipped_address_lines,
            metric_scale: config.forwarding.metric_scale,
            resolution: config.forwarding.resolution,
            local_routes: table.local_route_count(),
            host_routes: table.host_route_count(),
            skipped_routes,
            outputs,
        }
    }

    pub fn total_skipped_routes(&self) -> usize {
        self.skipped_routes.values().sum()
    }
}

/// Generate JSON report
pub fn generate_json_report(report: &GenerationReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Log a human-readable summary
pub fn log_summary(report: &GenerationReport) {
    log::info!(
        "Nodes: {}, links: {}, interface addresses: {}",
        report.nodes,
        report.links,
        report.addresses
    );
    if report.skipped_topology_lines + report.skipped_address_lines > 0 {
        log::warn!(
            "Skipped input lines: {} topology, {} address",
            report.skipped_topology_lines,
            report.skipped_address_lines
        );
    }
    log::info!(
        "Routes: {} local, {} host (metric scale {}, {} resolution)",
        report.local_routes,
        report.host_routes,
        report.metric_scale,
        report.resolution
    );
    if report.total_skipped_routes() > 0 {
        let breakdown: Vec<String> = report
            .skipped_routes
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind))
            .collect();
        log::warn!(
            "Skipped routes: {} ({})",
            report.total_skipped_routes(),
            breakdown.join(", ")
        );
    }
    for output in &report.outputs {
        log::info!("  {} [{}]: {} lines", output.path.display(), output.ip_format, output.lines);
    }
}
