//! Topology type definitions.
//!
//! A [`Topology`] is the immutable, link-level view of a network: the set of
//! nodes plus, for every stated link direction, which local interface reaches
//! the neighbor and which interface on the neighbor is reached.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::utils::lines::LineError;

/// One directed link record: `<srcNode> <srcIface> <dstNode> <dstIface>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub source: String,
    pub source_interface: String,
    pub dest: String,
    pub dest_interface: String,
}

impl Link {
    pub fn new(
        source: impl Into<String>,
        source_interface: impl Into<String>,
        dest: impl Into<String>,
        dest_interface: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_interface: source_interface.into(),
            dest: dest.into(),
            dest_interface: dest_interface.into(),
        }
    }

    /// The same physical connection seen from the other end.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.dest.clone(),
            source_interface: self.dest_interface.clone(),
            dest: self.source.clone(),
            dest_interface: self.source_interface.clone(),
        }
    }
}

impl FromStr for Link {
    type Err = LineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        match fields.as_slice() {
            [source, source_interface, dest, dest_interface] => {
                Ok(Link::new(*source, *source_interface, *dest, *dest_interface))
            }
            _ => Err(LineError::LinkFields { line: 0, found: fields.len() }),
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.source, self.source_interface, self.dest, self.dest_interface
        )
    }
}

/// The two interfaces of one directed adjacency.
///
/// Both sides are stored together so the egress and peer relations can never
/// disagree about which neighbors exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    /// Interface on the owning node that reaches the neighbor.
    pub local_interface: String,
    /// Interface on the neighbor that the link lands on.
    pub peer_interface: String,
}

/// Immutable network topology.
///
/// Ordered maps give every traversal a lexicographic neighbor order, which is
/// what makes route computation deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    nodes: BTreeSet<String>,
    adjacency: BTreeMap<String, BTreeMap<String, Adjacency>>,
    link_count: usize,
}

impl Topology {
    /// Build a topology from link records. Later records for the same
    /// (source, dest) pair replace earlier ones.
    pub fn from_links<I>(links: I) -> Self
    where
        I: IntoIterator<Item = Link>,
    {
        let mut topology = Topology::default();
        for link in links {
            topology.insert(link);
        }
        topology
    }

    pub(crate) fn insert(&mut self, link: Link) {
        if let Some(existing) = self.interface_owner(&link.source, &link.source_interface) {
            if existing != link.dest {
                log::warn!(
                    "Interface {} on {} already reaches {}; reusing it for {}",
                    link.source_interface,
                    link.source,
                    existing,
                    link.dest
                );
            }
        }

        self.nodes.insert(link.source.clone());
        self.nodes.insert(link.dest.clone());

        let previous = self
            .adjacency
            .entry(link.source)
            .or_default()
            .insert(
                link.dest,
                Adjacency {
                    local_interface: link.source_interface,
                    peer_interface: link.dest_interface,
                },
            );
        if previous.is_none() {
            self.link_count += 1;
        }
    }

    /// Neighbor reached through `interface` on `node`, if any.
    fn interface_owner(&self, node: &str, interface: &str) -> Option<&str> {
        self.adjacency.get(node).and_then(|neighbors| {
            neighbors
                .iter()
                .find(|(_, adj)| adj.local_interface == interface)
                .map(|(neighbor, _)| neighbor.as_str())
        })
    }

    /// All nodes, in lexicographic order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn contains_node(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct directed (source, dest) adjacencies.
    pub fn link_count(&self) -> usize {
        self.link_count
    }

    pub fn is_empty(&self) -> bool {
        self.link_count == 0
    }

    /// Neighbors of `node` with their adjacency, in lexicographic order.
    pub fn neighbors<'a>(&'a self, node: &str) -> impl Iterator<Item = (&'a str, &'a Adjacency)> + 'a {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|neighbors| neighbors.iter().map(|(name, adj)| (name.as_str(), adj)))
    }

    pub fn adjacency(&self, source: &str, dest: &str) -> Option<&Adjacency> {
        self.adjacency.get(source).and_then(|neighbors| neighbors.get(dest))
    }

    /// Interface on `source` that reaches the direct neighbor `dest`.
    pub fn egress_interface(&self, source: &str, dest: &str) -> Option<&str> {
        self.adjacency(source, dest).map(|adj| adj.local_interface.as_str())
    }

    /// Interface on `dest` that a link from `source` lands on.
    pub fn peer_interface(&self, source: &str, dest: &str) -> Option<&str> {
        self.adjacency(source, dest).map(|adj| adj.peer_interface.as_str())
    }
}
