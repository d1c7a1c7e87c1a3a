//! # fwdgen - Synthetic topologies and forwarding tables for network simulators
//!
//! This library turns a plain-text topology description plus an
//! interface-address table into per-node forwarding entries that a network
//! simulator can load directly.
//!
//! ## Overview
//!
//! Every node computes unweighted shortest paths to every other node with a
//! deterministic breadth-first search. Each reachable destination becomes a
//! host route through the first-hop egress interface, and every node gets a
//! single local route for its own traffic.
//!
//! ## Key Features
//!
//! - **Deterministic**: Neighbours are explored in lexicographic order, so the same inputs always produce the same bytes
//! - **Two address formats**: 32-bit integer or dotted-quad destinations, per output file
//! - **Address resolution**: Route to the interface facing the path, or to every interface of the destination
//! - **Topology generators**: Full mesh and 2D mesh (rows and columns fully connected)
//! - **Parallel**: Per-source route computation on a rayon pool with stable output order
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `topology`: Link parsing, the adjacency graph and the topology generators
//! - `ip`: Interface-address table and the dotted-quad codec
//! - `routing`: Shortest-path resolver, forwarding-table generator and writer
//! - `config`: Type-safe run configuration and validation
//! - `config_loader`: YAML loading and command-line overrides
//! - `report`: JSON run report and log summary
//! - `orchestrator`: High-level coordination of a complete run
//! - `utils`: Shared line-reading helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use fwdgen::{config_loader, orchestrator};
//!
//! // Load configuration from YAML file
//! let config = config_loader::load_config(Path::new("fwdgen.yaml"))?;
//!
//! // Compute and write every configured forwarding table
//! let report = orchestrator::generate_routes(&config)?;
//! println!("{} host routes", report.host_routes);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## File Formats
//!
//! ```text
//! # topology: <src> <srcIface> <dst> <dstIface>
//! node1 Ethernet0/1 node2 Ethernet0/1
//!
//! # addresses: <node>,<iface>,<ipv4>
//! node2,Ethernet0/1,10.2.1.1
//!
//! # forwarding entries
//! + fwd node1 0 8 self 8
//! + fwd node1 167903489 32 Ethernet0/1 8
//! ```
//!
//! ## Error Handling
//!
//! The library uses `color_eyre` for error reporting with context at the file
//! boundaries and `thiserror` enums for the domain errors underneath. Malformed
//! input lines and unroutable destinations are logged and skipped rather than
//! aborting the run.

pub mod config;
pub mod config_loader;
pub mod ip;
pub mod orchestrator;
pub mod report;
pub mod routing;
pub mod topology;
pub mod utils;
