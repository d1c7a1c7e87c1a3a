//! Run orchestrator.
//!
//! This module coordinates a full forwarding-table run, from loading the
//! topology and address files through writing every configured output, and
//! drives the topology generators for the `full-mesh` and `mesh2d` commands.

use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;

use crate::config::Config;
use crate::ip::load_address_table;
use crate::report::{generate_json_report, log_summary, GenerationReport, InputStats, OutputSummary};
use crate::routing::{generate_forwarding_table, write_forwarding_table, ForwardingTable};
use crate::topology::{load_topology, GeneratedTopology};

/// Load inputs, compute the forwarding table and write every output.
///
/// Nothing is written when either input is empty.
pub fn generate_routes(config: &Config) -> Result<GenerationReport> {
    let topology = load_topology(&config.inputs.topology)?;
    let addresses = load_address_table(&config.inputs.addresses)?;

    let inputs = InputStats {
        nodes: topology.value.node_count(),
        links: topology.value.link_count(),
        addresses: addresses.value.len(),
        skipped_topology_lines: topology.skipped.len(),
        skipped_address_lines: addresses.skipped.len(),
    };

    let options = config.forwarding.options();
    let compute = || generate_forwarding_table(&topology.value, &addresses.value, &options);
    let table: ForwardingTable = if config.forwarding.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.forwarding.threads)
            .build()
            .wrap_err("Failed to configure thread pool")?;
        pool.install(compute)
    } else {
        compute()
    }?;

    let mut outputs = Vec::with_capacity(config.outputs.len());
    for output in &config.outputs {
        let lines = write_forwarding_table(&table, output.ip_format, &output.path)?;
        outputs.push(OutputSummary {
            path: output.path.clone(),
            ip_format: output.ip_format,
            lines,
        });
    }

    let report = GenerationReport::new(config, inputs, &table, outputs);
    if let Some(report_path) = &config.report {
        generate_json_report(&report, report_path)?;
    }
    log_summary(&report);

    Ok(report)
}

/// Write a generated topology, if the generator produced one.
///
/// Returns `false` when the generator declined the requested shape; no files
/// are created in that case.
pub fn write_generated(
    generated: Option<GeneratedTopology>,
    topology_path: &Path,
    addresses_path: &Path,
) -> Result<bool> {
    let Some(generated) = generated else {
        info!("No topology generated; output files left untouched");
        return Ok(false);
    };

    generated.write(topology_path, addresses_path)?;
    Ok(true)
}
