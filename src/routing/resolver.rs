//! Minimum-hop path resolution.
//!
//! A breadth-first search from one source node over the topology's adjacency.
//! Every discovered node records the first hop used to leave the source, the
//! source interface toward that first hop, and the interface on the
//! discovered node that the final link lands on.

use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::topology::Topology;

/// How one source reaches one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    /// Neighbor of the source that the path leaves through.
    pub next_hop: String,
    /// Source interface toward `next_hop`.
    pub egress_interface: String,
    /// Interface on the destination reached by the last link of the path.
    pub peer_interface: String,
    pub hop_count: u32,
}

/// Result of one BFS run, owned by a single source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPaths {
    source: String,
    paths: BTreeMap<String, PathInfo>,
}

impl ShortestPaths {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Path to `dest`. `None` for the source itself and for unreachable nodes.
    pub fn get(&self, dest: &str) -> Option<&PathInfo> {
        self.paths.get(dest)
    }

    /// Hop count to `dest`, `Some(0)` for the source.
    pub fn hop_count(&self, dest: &str) -> Option<u32> {
        if dest == self.source {
            return Some(0);
        }
        self.paths.get(dest).map(|path| path.hop_count)
    }

    pub fn is_reachable(&self, dest: &str) -> bool {
        self.hop_count(dest).is_some()
    }

    /// Number of reachable nodes, excluding the source.
    pub fn reachable_count(&self) -> usize {
        self.paths.len()
    }

    /// Paths to every reachable node, ordered by destination.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathInfo)> {
        self.paths.iter().map(|(dest, path)| (dest.as_str(), path))
    }
}

/// Compute minimum-hop paths from `source` to every reachable node.
///
/// Neighbors are expanded in lexicographic order, so when two equal-length
/// paths exist the one through the lexicographically smaller first hop wins,
/// and repeated runs give identical results.
pub fn resolve(topology: &Topology, source: &str) -> ShortestPaths {
    let mut paths: BTreeMap<String, PathInfo> = BTreeMap::new();
    let mut frontier: VecDeque<&str> = VecDeque::from([source]);
    let mut visited: HashSet<&str> = HashSet::from([source]);

    while let Some(current) = frontier.pop_front() {
        // Beyond the first hop, the next hop and egress interface are inherited
        // unchanged from the node the destination was discovered through.
        let inherited = if current == source {
            None
        } else {
            match paths.get(current) {
                Some(path) => Some((path.next_hop.clone(), path.egress_interface.clone(), path.hop_count)),
                None => continue,
            }
        };

        for (neighbor, adjacency) in topology.neighbors(current) {
            if !visited.insert(neighbor) {
                continue;
            }
            frontier.push_back(neighbor);

            let (next_hop, egress_interface, hop_count) = match &inherited {
                Some((next_hop, egress, hops)) => (next_hop.clone(), egress.clone(), hops + 1),
                None => (neighbor.to_string(), adjacency.local_interface.clone(), 1),
            };

            log::trace!(
                "{} -> {}: via {} on {}, {} hops",
                source,
                neighbor,
                next_hop,
                egress_interface,
                hop_count
            );
            paths.insert(
                neighbor.to_string(),
                PathInfo {
                    next_hop,
                    egress_interface,
                    peer_interface: adjacency.peer_interface.clone(),
                    hop_count,
                },
            );
        }
    }

    ShortestPaths {
        source: source.to_string(),
        paths,
    }
}
