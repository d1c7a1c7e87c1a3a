//! Interface-address table.
//!
//! Maps `(node, interface)` to the interface's IPv4 address, as read from
//! `node,interface,address` lines.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{debug, info, warn};

use crate::utils::lines::{non_blank_lines, LineError, Loaded};

/// Composite key identifying one interface.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfaceKey {
    pub node: String,
    pub interface: String,
}

impl InterfaceKey {
    pub fn new(node: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            interface: interface.into(),
        }
    }
}

impl fmt::Display for InterfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.interface)
    }
}

/// One `node,interface,address` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub node: String,
    pub interface: String,
    pub address: String,
}

impl AddressRecord {
    pub fn new(
        node: impl Into<String>,
        interface: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            node: node.into(),
            interface: interface.into(),
            address: address.into(),
        }
    }
}

impl FromStr for AddressRecord {
    type Err = LineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        match fields.as_slice() {
            [node, interface, address] => {
                if node.is_empty() || interface.is_empty() || address.is_empty() {
                    return Err(LineError::EmptyAddressField { line: 0 });
                }
                Ok(AddressRecord::new(*node, *interface, *address))
            }
            _ => Err(LineError::AddressFields { line: 0, found: fields.len() }),
        }
    }
}

impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.node, self.interface, self.address)
    }
}

/// Immutable lookup from interface to address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressTable {
    addresses: BTreeMap<InterfaceKey, String>,
}

impl AddressTable {
    /// Build a table from records; a later record for the same interface
    /// replaces the earlier one.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AddressRecord>,
    {
        let mut table = AddressTable::default();
        for record in records {
            table.insert(record);
        }
        table
    }

    fn insert(&mut self, record: AddressRecord) {
        let key = InterfaceKey::new(record.node, record.interface);
        if let Some(previous) = self.addresses.get(&key) {
            debug!("Address for {} changed from {} to {}", key, previous, record.address);
        }
        self.addresses.insert(key, record.address);
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Address of one interface.
    pub fn get(&self, node: &str, interface: &str) -> Option<&str> {
        self.addresses
            .get(&InterfaceKey::new(node, interface))
            .map(String::as_str)
    }

    /// Every `(interface, address)` owned by `node`, ordered by interface name.
    pub fn addresses_of<'a>(&'a self, node: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.addresses
            .range(InterfaceKey::new(node, "")..)
            .take_while(move |(key, _)| key.node == node)
            .map(|(key, address)| (key.interface.as_str(), address.as_str()))
    }
}

/// Parse an address table from any buffered reader.
pub fn parse_address_table<R: BufRead>(reader: R) -> std::io::Result<Loaded<AddressTable>> {
    let mut table = AddressTable::default();
    let mut skipped = Vec::new();

    for line in non_blank_lines(reader)? {
        match line.text.parse::<AddressRecord>() {
            Ok(record) => table.insert(record),
            Err(e) => {
                let e = e.at_line(line.number);
                warn!("Skipping invalid address line '{}': {}", line.text, e);
                skipped.push(e);
            }
        }
    }

    Ok(Loaded { value: table, skipped })
}

/// Load an address file from disk.
pub fn load_address_table(path: &Path) -> Result<Loaded<AddressTable>> {
    info!("Loading interface addresses from: {:?}", path);

    let file = File::open(path)
        .wrap_err_with(|| format!("Failed to open address file '{}'", path.display()))?;
    let loaded = parse_address_table(BufReader::new(file))
        .wrap_err_with(|| format!("Failed to read address file '{}'", path.display()))?;

    info!(
        "Interface addresses parsed: {} records ({} lines skipped)",
        loaded.value.len(),
        loaded.skipped.len()
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_record() {
        let record: AddressRecord = "node4, Ethernet0/1 ,10.4.1.1".parse().unwrap();
        assert_eq!(record, AddressRecord::new("node4", "Ethernet0/1", "10.4.1.1"));
        assert_eq!(record.to_string(), "node4,Ethernet0/1,10.4.1.1");
    }

    #[test]
    fn test_parse_record_errors() {
        assert_eq!(
            "node4,Ethernet0/1".parse::<AddressRecord>(),
            Err(LineError::AddressFields { line: 0, found: 2 })
        );
        assert_eq!(
            "node4,Ethernet0/1,10.4.1.1,extra".parse::<AddressRecord>(),
            Err(LineError::AddressFields { line: 0, found: 4 })
        );
        assert_eq!(
            "node4,,10.4.1.1".parse::<AddressRecord>(),
            Err(LineError::EmptyAddressField { line: 0 })
        );
    }

    #[test]
    fn test_last_write_wins() {
        let input = "node1,Ethernet0/1,10.1.1.1\nnode1,Ethernet0/1,10.9.9.9\n";
        let loaded = parse_address_table(Cursor::new(input)).unwrap();

        assert_eq!(loaded.value.len(), 1);
        assert_eq!(loaded.value.get("node1", "Ethernet0/1"), Some("10.9.9.9"));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let input = "node1,Ethernet0/1,10.1.1.1\nnode1 Ethernet0/2 10.1.2.1\n\nnode2,Ethernet0/1,10.2.1.1\n";
        let loaded = parse_address_table(Cursor::new(input)).unwrap();

        assert_eq!(loaded.skipped, vec![LineError::AddressFields { line: 2, found: 1 }]);
        assert_eq!(loaded.value.len(), 2);
        assert_eq!(loaded.value.get("node2", "Ethernet0/1"), Some("10.2.1.1"));
        assert_eq!(loaded.value.get("node1", "Ethernet0/2"), None);
    }

    #[test]
    fn test_addresses_of_node_are_ordered_and_scoped() {
        let table = AddressTable::from_records(vec![
            AddressRecord::new("node1", "Ethernet0/2", "10.1.2.1"),
            AddressRecord::new("node10", "Ethernet0/1", "10.10.1.1"),
            AddressRecord::new("node1", "Ethernet0/1", "10.1.1.1"),
            AddressRecord::new("node2", "Ethernet0/1", "10.2.1.1"),
        ]);

        let node1: Vec<(&str, &str)> = table.addresses_of("node1").collect();
        assert_eq!(
            node1,
            vec![("Ethernet0/1", "10.1.1.1"), ("Ethernet0/2", "10.1.2.1")]
        );
        assert_eq!(table.addresses_of("node3").count(), 0);
    }

    #[test]
    fn test_commas_cannot_collide_keys() {
        let table = AddressTable::from_records(vec![AddressRecord::new("a", "b", "10.0.0.1")]);
        assert_eq!(table.get("a", "b"), Some("10.0.0.1"));
        assert_eq!(table.get("a,b", ""), None);
    }

    #[test]
    fn test_load_address_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "node1,Ethernet0/1,10.1.1.1").unwrap();
        writeln!(temp_file, "node2,Ethernet0/1,10.2.1.1").unwrap();

        let loaded = load_address_table(temp_file.path()).unwrap();
        assert_eq!(loaded.value.len(), 2);
        assert!(loaded.skipped.is_empty());
    }
}
