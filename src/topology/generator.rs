//! Synthetic topology generation.
//!
//! Produces the link list and the interface-address records for regular
//! interconnection patterns. Every physical connection is emitted as a
//! forward line followed by its reverse, and each node numbers its
//! interfaces sequentially from `Ethernet0/1`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};

use crate::ip::AddressRecord;
use crate::topology::types::{Link, Topology};

/// Interface name prefix shared by all generated interfaces.
pub const INTERFACE_PREFIX: &str = "Ethernet0/";

/// Largest value that fits in one address octet.
const MAX_OCTET: usize = 255;

/// Output of a topology generator, in the order it is written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedTopology {
    pub links: Vec<Link>,
    pub addresses: Vec<AddressRecord>,
}

impl GeneratedTopology {
    /// Number of physical (bidirectional) connections.
    pub fn connection_count(&self) -> usize {
        self.links.len() / 2
    }

    pub fn to_topology(&self) -> Topology {
        Topology::from_links(self.links.iter().cloned())
    }

    /// Write the topology file and the address file.
    pub fn write(&self, topology_path: &Path, addresses_path: &Path) -> Result<()> {
        write_lines(topology_path, self.links.iter())?;
        write_lines(addresses_path, self.addresses.iter())?;

        info!(
            "Wrote {} links to {:?} and {} addresses to {:?}",
            self.links.len(),
            topology_path,
            self.addresses.len(),
            addresses_path
        );
        Ok(())
    }
}

fn write_lines<T: std::fmt::Display>(path: &Path, items: impl Iterator<Item = T>) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    for item in items {
        writeln!(writer, "{}", item)
            .wrap_err_with(|| format!("Failed to write '{}'", path.display()))?;
    }
    writer
        .flush()
        .wrap_err_with(|| format!("Failed to flush '{}'", path.display()))?;
    Ok(())
}

/// Name of the `port`-th interface on a node.
pub fn interface_name(port: usize) -> String {
    format!("{}{}", INTERFACE_PREFIX, port)
}

/// Allocates interfaces and addresses as connections are added.
struct MeshBuilder<F> {
    names: Vec<String>,
    next_port: Vec<usize>,
    address_of: F,
    generated: GeneratedTopology,
}

impl<F> MeshBuilder<F>
where
    F: Fn(usize, usize) -> String,
{
    fn new(names: Vec<String>, address_of: F) -> Self {
        let next_port = vec![1; names.len()];
        Self {
            names,
            next_port,
            address_of,
            generated: GeneratedTopology::default(),
        }
    }

    fn connect(&mut self, a: usize, b: usize) {
        let port_a = self.next_port[a];
        let port_b = self.next_port[b];
        let iface_a = interface_name(port_a);
        let iface_b = interface_name(port_b);

        let forward = Link::new(
            self.names[a].clone(),
            iface_a.clone(),
            self.names[b].clone(),
            iface_b.clone(),
        );
        let reverse = forward.reversed();
        self.generated.links.push(forward);
        self.generated.links.push(reverse);

        self.generated.addresses.push(AddressRecord::new(
            self.names[a].clone(),
            iface_a,
            (self.address_of)(a, port_a),
        ));
        self.generated.addresses.push(AddressRecord::new(
            self.names[b].clone(),
            iface_b,
            (self.address_of)(b, port_b),
        ));

        self.next_port[a] += 1;
        self.next_port[b] += 1;
    }

    fn finish(self) -> GeneratedTopology {
        self.generated
    }
}

/// Connect every pair of `node_count` nodes named `node1..nodeN`.
///
/// Interface `k` of node `i` is addressed `10.i.k.1`. Returns `None` (with a
/// warning) when fewer than two nodes are requested.
pub fn full_mesh(node_count: usize) -> Option<GeneratedTopology> {
    if node_count < 2 {
        warn!("A full mesh needs at least 2 nodes, got {}; nothing generated", node_count);
        return None;
    }
    if node_count > MAX_OCTET {
        warn!(
            "{} nodes exceed the 10.<node>.<port>.1 addressing scheme; some addresses will be invalid",
            node_count
        );
    }

    let names = (1..=node_count).map(|i| format!("node{}", i)).collect();
    let mut builder = MeshBuilder::new(names, |node, port| format!("10.{}.{}.1", node + 1, port));

    for i in 0..node_count {
        for j in (i + 1)..node_count {
            builder.connect(i, j);
        }
    }

    let generated = builder.finish();
    info!(
        "Generated full mesh: {} nodes, {} connections",
        node_count,
        generated.connection_count()
    );
    Some(generated)
}

/// Connect all nodes sharing a row and all nodes sharing a column of a
/// `rows x cols` grid. Diagonal neighbors are not linked.
///
/// Nodes are named `node_<row>_<col>` (zero-based) and interface `k` of a node
/// is addressed `10.<row>.<col>.<k>`. Row connections are generated before
/// column connections. Returns `None` (with a warning) when the grid cannot
/// hold a single link.
pub fn mesh_2d(rows: usize, cols: usize) -> Option<GeneratedTopology> {
    if rows < 1 || cols < 1 {
        warn!("Rows and columns must both be at least 1, got {}x{}; nothing generated", rows, cols);
        return None;
    }
    if rows == 1 && cols == 1 {
        warn!("A 1x1 grid has a single node and no links; nothing generated");
        return None;
    }
    if rows > MAX_OCTET + 1 || cols > MAX_OCTET + 1 || rows + cols - 2 > MAX_OCTET {
        warn!(
            "A {}x{} grid exceeds the 10.<row>.<col>.<port> addressing scheme; some addresses will be invalid",
            rows, cols
        );
    }

    let index = |row: usize, col: usize| row * cols + col;
    let names = (0..rows)
        .flat_map(|row| (0..cols).map(move |col| format!("node_{}_{}", row, col)))
        .collect();
    let mut builder = MeshBuilder::new(names, |node, port| {
        format!("10.{}.{}.{}", node / cols, node % cols, port)
    });

    for row in 0..rows {
        for col in 0..cols {
            for other in (col + 1)..cols {
                builder.connect(index(row, col), index(row, other));
            }
        }
    }
    for col in 0..cols {
        for row in 0..rows {
            for other in (row + 1)..rows {
                builder.connect(index(row, col), index(other, col));
            }
        }
    }

    let generated = builder.finish();
    info!(
        "Generated {}x{} grid mesh: {} nodes, {} connections",
        rows,
        cols,
        rows * cols,
        generated.connection_count()
    );
    Some(generated)
}
