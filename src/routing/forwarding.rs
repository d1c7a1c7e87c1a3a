//! Forwarding-table generation.
//!
//! Joins per-source shortest paths with the interface-address table. Each
//! source contributes one local route followed by host routes to every other
//! node it can reach and resolve an address for. A route that cannot be
//! resolved is skipped on its own; the rest of the table is unaffected.

use std::fmt;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ip::codec::{self, IpFormat, IpParseError};
use crate::ip::AddressTable;
use crate::routing::resolver::{resolve, PathInfo};
use crate::topology::Topology;

/// Destination field of the local route.
pub const LOCAL_DESTINATION: &str = "0";
/// Prefix length of the local route.
pub const LOCAL_PREFIX_LEN: u8 = 8;
/// Egress field of the local route.
pub const LOCAL_EGRESS: &str = "self";
/// Metric of the local route.
pub const LOCAL_METRIC: u32 = 8;
/// Prefix length of routes to remote nodes.
pub const HOST_PREFIX_LEN: u8 = 32;
/// Default cost of one hop.
pub const DEFAULT_METRIC_SCALE: u32 = 8;

/// Which addresses of a destination node receive routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AddressResolution {
    /// Only the destination interface the last link of the path lands on
    #[default]
    PeerInterface,
    /// Every interface address of the destination node
    AllInterfaces,
}

impl fmt::Display for AddressResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressResolution::PeerInterface => write!(f, "peer_interface"),
            AddressResolution::AllInterfaces => write!(f, "all_interfaces"),
        }
    }
}

/// Settings for one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardingOptions {
    /// Metric of an `n`-hop route is `n * metric_scale`.
    pub metric_scale: u32,
    pub resolution: AddressResolution,
    /// Compute sources on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ForwardingOptions {
    fn default() -> Self {
        Self {
            metric_scale: DEFAULT_METRIC_SCALE,
            resolution: AddressResolution::PeerInterface,
            parallel: true,
        }
    }
}

/// Conditions that stop generation before anything is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("topology contains no links; load a topology file before generating routes")]
    EmptyTopology,

    #[error("address table is empty; load an address file before generating routes")]
    EmptyAddressTable,
}

/// A route that was left out of the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteSkip {
    #[error("{dst} is unreachable from {src}")]
    Unreachable { src: String, dst: String },

    #[error("no address for {dst} interface {interface} (route {src} -> {dst})")]
    MissingAddress {
        src: String,
        dst: String,
        interface: String,
    },

    #[error("{dst} has no interface addresses (route {src} -> {dst})")]
    NoAddresses { src: String, dst: String },

    #[error("malformed address for {dst} interface {interface} (route {src} -> {dst}): {error}")]
    MalformedAddress {
        src: String,
        dst: String,
        interface: String,
        error: IpParseError,
    },
}

impl RouteSkip {
    /// Short kind label used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            RouteSkip::Unreachable { .. } => "unreachable",
            RouteSkip::MissingAddress { .. } => "missing_address",
            RouteSkip::NoAddresses { .. } => "no_addresses",
            RouteSkip::MalformedAddress { .. } => "malformed_address",
        }
    }
}

/// Destination of a forwarding entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The source's own local route.
    Local,
    /// A remote host address, kept in both textual and integer form.
    Host { address: String, value: u32 },
}

/// One line of a forwarding table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardingEntry {
    pub source: String,
    pub destination: Destination,
    pub prefix_len: u8,
    pub egress: String,
    pub metric: u32,
}

impl ForwardingEntry {
    pub fn local(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: Destination::Local,
            prefix_len: LOCAL_PREFIX_LEN,
            egress: LOCAL_EGRESS.to_string(),
            metric: LOCAL_METRIC,
        }
    }

    pub fn is_local(&self) -> bool {
        self.destination == Destination::Local
    }

    /// Render as `+ fwd <src> <dest> <prefix> <egress> <metric>`.
    pub fn render(&self, ip_format: IpFormat) -> String {
        let destination = match &self.destination {
            Destination::Local => LOCAL_DESTINATION.to_string(),
            Destination::Host { address, value } => match ip_format {
                IpFormat::Integer => value.to_string(),
                IpFormat::Dotted => address.clone(),
            },
        };
        format!(
            "+ fwd {} {} {} {} {}",
            self.source, destination, self.prefix_len, self.egress, self.metric
        )
    }
}

/// Every forwarding entry of a topology, grouped by source in node order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardingTable {
    entries: Vec<ForwardingEntry>,
    skipped: Vec<RouteSkip>,
}

impl ForwardingTable {
    pub fn entries(&self) -> &[ForwardingEntry] {
        &self.entries
    }

    pub fn skipped(&self) -> &[RouteSkip] {
        &self.skipped
    }

    /// Entries whose source is `source`, local route first.
    pub fn entries_for<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a ForwardingEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.source == source)
    }

    pub fn local_route_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_local()).count()
    }

    pub fn host_route_count(&self) -> usize {
        self.entries.len() - self.local_route_count()
    }

    /// Render every entry, one line each.
    pub fn render_lines(&self, ip_format: IpFormat) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(move |entry| entry.render(ip_format))
    }
}

/// Routes produced for a single source.
#[derive(Debug, Default)]
struct SourceRoutes {
    entries: Vec<ForwardingEntry>,
    skipped: Vec<RouteSkip>,
}

impl SourceRoutes {
    fn skip(&mut self, reason: RouteSkip) {
        warn!("Skipping route: {}", reason);
        self.skipped.push(reason);
    }

    fn push_host(
        &mut self,
        source: &str,
        dest: &str,
        interface: &str,
        address: &str,
        path: &PathInfo,
        options: &ForwardingOptions,
    ) {
        match codec::to_integer(address) {
            Ok(value) => self.entries.push(ForwardingEntry {
                source: source.to_string(),
                destination: Destination::Host {
                    address: address.to_string(),
                    value,
                },
                prefix_len: HOST_PREFIX_LEN,
                egress: path.egress_interface.clone(),
                metric: path.hop_count.saturating_mul(options.metric_scale),
            }),
            Err(error) => self.skip(RouteSkip::MalformedAddress {
                src: source.to_string(),
                dst: dest.to_string(),
                interface: interface.to_string(),
                error,
            }),
        }
    }
}

fn routes_for_source(
    topology: &Topology,
    addresses: &AddressTable,
    source: &str,
    options: &ForwardingOptions,
) -> SourceRoutes {
    let paths = resolve(topology, source);
    let mut routes = SourceRoutes::default();
    routes.entries.push(ForwardingEntry::local(source));

    for dest in topology.nodes() {
        if dest == source {
            continue;
        }
        let Some(path) = paths.get(dest) else {
            routes.skip(RouteSkip::Unreachable {
                src: source.to_string(),
                dst: dest.to_string(),
            });
            continue;
        };

        match options.resolution {
            AddressResolution::PeerInterface => {
                match addresses.get(dest, &path.peer_interface) {
                    Some(address) => {
                        routes.push_host(source, dest, &path.peer_interface, address, path, options)
                    }
                    None => routes.skip(RouteSkip::MissingAddress {
                        src: source.to_string(),
                        dst: dest.to_string(),
                        interface: path.peer_interface.clone(),
                    }),
                }
            }
            AddressResolution::AllInterfaces => {
                let mut resolved = false;
                for (interface, address) in addresses.addresses_of(dest) {
                    resolved = true;
                    routes.push_host(source, dest, interface, address, path, options);
                }
                if !resolved {
                    routes.skip(RouteSkip::NoAddresses {
                        src: source.to_string(),
                        dst: dest.to_string(),
                    });
                }
            }
        }
    }

    debug!(
        "{}: {} entries, {} skipped, {} reachable",
        source,
        routes.entries.len(),
        routes.skipped.len(),
        paths.reachable_count()
    );
    routes
}

/// Generate the forwarding table for every node of `topology`.
///
/// Fails before computing anything if either input is empty. Sources are
/// emitted in node order whether or not they are computed in parallel.
pub fn generate_forwarding_table(
    topology: &Topology,
    addresses: &AddressTable,
    options: &ForwardingOptions,
) -> Result<ForwardingTable, GenerationError> {
    if topology.is_empty() {
        return Err(GenerationError::EmptyTopology);
    }
    if addresses.is_empty() {
        return Err(GenerationError::EmptyAddressTable);
    }

    info!(
        "Generating forwarding table for {} nodes (metric scale {}, resolution {})",
        topology.node_count(),
        options.metric_scale,
        options.resolution
    );

    let sources: Vec<&str> = topology.nodes().collect();
    let per_source: Vec<SourceRoutes> = if options.parallel {
        sources
            .par_iter()
            .map(|source| routes_for_source(topology, addresses, source, options))
            .collect()
    } else {
        sources
            .iter()
            .map(|source| routes_for_source(topology, addresses, source, options))
            .collect()
    };

    let mut table = ForwardingTable::default();
    for routes in per_source {
        table.entries.extend(routes.entries);
        table.skipped.extend(routes.skipped);
    }

    info!(
        "Forwarding table ready: {} entries, {} routes skipped",
        table.entries.len(),
        table.skipped.len()
    );
    Ok(table)
}
