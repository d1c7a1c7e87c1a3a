//! Route computation module.
//!
//! Shortest-path resolution per source node, forwarding-table generation on
//! top of it, and rendering of the table to disk.

pub mod resolver;
pub mod forwarding;
pub mod writer;

pub use resolver::{resolve, PathInfo, ShortestPaths};
pub use forwarding::{
    generate_forwarding_table, AddressResolution, Destination, ForwardingEntry, ForwardingOptions,
    ForwardingTable, GenerationError, RouteSkip,
};
pub use writer::write_forwarding_table;
