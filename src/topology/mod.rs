//! Network topology module.
//!
//! This module contains the immutable link-level topology, the loader for
//! topology files, and the full-mesh / 2D-mesh generators that produce them.

pub mod types;
pub mod loader;
pub mod generator;

// Re-export key types and functions for easier access
pub use types::{Adjacency, Link, Topology};
pub use loader::{load_topology, parse_topology};
pub use generator::{full_mesh, mesh_2d, GeneratedTopology};
