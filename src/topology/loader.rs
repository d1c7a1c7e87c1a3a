//! Topology file loading.
//!
//! Each non-blank line is one directed link. Lines with the wrong number of
//! fields are reported and skipped; loading never stops on a bad line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{debug, info, warn};

use crate::topology::types::{Link, Topology};
use crate::utils::lines::{non_blank_lines, Loaded};

/// Parse a topology from any buffered reader.
pub fn parse_topology<R: BufRead>(reader: R) -> std::io::Result<Loaded<Topology>> {
    let mut topology = Topology::default();
    let mut skipped = Vec::new();

    for line in non_blank_lines(reader)? {
        match line.text.parse::<Link>() {
            Ok(link) => {
                debug!("Link {}", link);
                topology.insert(link);
            }
            Err(e) => {
                let e = e.at_line(line.number);
                warn!("Skipping invalid topology line '{}': {}", line.text, e);
                skipped.push(e);
            }
        }
    }

    Ok(Loaded { value: topology, skipped })
}

/// Load a topology file from disk.
pub fn load_topology(path: &Path) -> Result<Loaded<Topology>> {
    info!("Loading topology from: {:?}", path);

    let file = File::open(path)
        .wrap_err_with(|| format!("Failed to open topology file '{}'", path.display()))?;
    let loaded = parse_topology(BufReader::new(file))
        .wrap_err_with(|| format!("Failed to read topology file '{}'", path.display()))?;

    info!(
        "Topology parsed: {} nodes, {} links ({} lines skipped)",
        loaded.value.node_count(),
        loaded.value.link_count(),
        loaded.skipped.len()
    );
    Ok(loaded)
}
