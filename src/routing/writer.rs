//! Forwarding-table file output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;

use crate::ip::IpFormat;
use crate::routing::forwarding::ForwardingTable;

/// Write every entry of `table` to `writer`, one `+ fwd` line each.
pub fn write_table<W: Write>(table: &ForwardingTable, ip_format: IpFormat, mut writer: W) -> std::io::Result<usize> {
    let mut written = 0;
    for line in table.render_lines(ip_format) {
        writeln!(writer, "{}", line)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Create (or truncate) `path` and write the table to it.
///
/// A failure part-way leaves the partial file in place.
pub fn write_forwarding_table(table: &ForwardingTable, ip_format: IpFormat, path: &Path) -> Result<usize> {
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create forwarding table '{}'", path.display()))?;
    let written = write_table(table, ip_format, BufWriter::new(file))
        .wrap_err_with(|| format!("Failed to write forwarding table '{}'", path.display()))?;

    info!("Forwarding table ({} addresses, {} lines) written to {:?}", ip_format, written, path);
    Ok(written)
}
