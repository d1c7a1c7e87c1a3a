//! IP addressing module.
//!
//! This module holds the interface-address table read from the address file
//! and the codec that renders addresses as dotted-decimal or 32-bit integers.

pub mod address_table;
pub mod codec;

// Re-export commonly used types
pub use address_table::{load_address_table, parse_address_table, AddressRecord, AddressTable, InterfaceKey};
pub use codec::{IpFormat, IpParseError};
