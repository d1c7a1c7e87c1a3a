use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use fwdgen::config::Config;
use fwdgen::config_loader::{self, RoutesCliOverrides};
use fwdgen::ip::IpFormat;
use fwdgen::orchestrator;
use fwdgen::routing::AddressResolution;
use fwdgen::topology::{full_mesh, mesh_2d};

/// Synthetic topology and forwarding-table generator for network simulators
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute forwarding tables from a topology file and an address file
    Routes(RoutesArgs),

    /// Generate a full-mesh topology and its interface addresses
    FullMesh {
        /// Number of nodes
        #[arg(short, long)]
        nodes: usize,

        #[command(flatten)]
        files: GeneratorFiles,
    },

    /// Generate a 2D mesh (rows and columns fully connected, no diagonals)
    Mesh2d {
        /// Number of rows
        #[arg(short, long)]
        rows: usize,

        /// Number of columns
        #[arg(short, long)]
        cols: usize,

        #[command(flatten)]
        files: GeneratorFiles,
    },
}

#[derive(Args, Debug)]
struct RoutesArgs {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Topology file (`<src> <srcIface> <dst> <dstIface>` per line)
    #[arg(short, long)]
    topology: Option<PathBuf>,

    /// Address file (`<node>,<iface>,<ipv4>` per line)
    #[arg(short, long)]
    addresses: Option<PathBuf>,

    /// Forwarding-table output file; replaces any configured outputs
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How destination addresses are written
    #[arg(long, value_enum)]
    ip_format: Option<IpFormat>,

    /// Metric per hop (1 gives raw hop counts)
    #[arg(long)]
    metric_scale: Option<u32>,

    /// Which destination addresses receive routes
    #[arg(long, value_enum)]
    resolution: Option<AddressResolution>,

    /// Worker threads (0 = auto-detect, 1 = sequential)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GeneratorFiles {
    /// Output path for the topology file
    #[arg(long, default_value = "topo.txt")]
    topology_out: PathBuf,

    /// Output path for the address file
    #[arg(long, default_value = "ports.txt")]
    addresses_out: PathBuf,
}

impl RoutesArgs {
    fn overrides(&self) -> RoutesCliOverrides {
        RoutesCliOverrides {
            topology: self.topology.clone(),
            addresses: self.addresses.clone(),
            output: self.output.clone(),
            ip_format: self.ip_format,
            metric_scale: self.metric_scale,
            resolution: self.resolution,
            threads: self.threads,
            report: self.report.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();

    // Load the configuration before logging so its log level can apply
    let config = match &cli.command {
        Commands::Routes(args) => {
            let mut config = match &args.config {
                Some(path) => config_loader::load_config(path)?,
                None => Config::default(),
            };
            config_loader::apply_overrides(&mut config, &args.overrides())?;
            Some(config)
        }
        _ => None,
    };

    let default_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.general.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Starting fwdgen v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Routes(_) => {
            let config = config.unwrap_or_default();
            info!("Topology file: {:?}", config.inputs.topology);
            info!("Address file: {:?}", config.inputs.addresses);
            orchestrator::generate_routes(&config)?;
            info!("Forwarding table generation completed successfully");
        }
        Commands::FullMesh { nodes, files } => {
            orchestrator::write_generated(full_mesh(nodes), &files.topology_out, &files.addresses_out)?;
        }
        Commands::Mesh2d { rows, cols, files } => {
            orchestrator::write_generated(mesh_2d(rows, cols), &files.topology_out, &files.addresses_out)?;
        }
    }

    Ok(())
}
