//! IPv4 dotted-decimal / 32-bit integer conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur while decoding a dotted-decimal address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IpParseError {
    #[error("'{address}' has {found} octets, expected 4")]
    OctetCount { address: String, found: usize },

    #[error("'{address}' has invalid octet '{octet}'")]
    InvalidOctet { address: String, octet: String },
}

/// How destination addresses are rendered in a forwarding table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum IpFormat {
    /// Unsigned 32-bit integer, e.g. `167903489`
    #[default]
    Integer,
    /// Dotted-decimal, e.g. `10.2.1.1`
    Dotted,
}

impl fmt::Display for IpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpFormat::Integer => write!(f, "integer"),
            IpFormat::Dotted => write!(f, "dotted"),
        }
    }
}

/// Parse exactly four dot-separated decimal octets into a `u32`, most
/// significant octet first.
pub fn to_integer(dotted: &str) -> Result<u32, IpParseError> {
    let octets: Vec<&str> = dotted.split('.').collect();
    if octets.len() != 4 {
        return Err(IpParseError::OctetCount {
            address: dotted.to_string(),
            found: octets.len(),
        });
    }

    let mut value = 0u32;
    for (i, octet) in octets.iter().enumerate() {
        let parsed: u8 = octet.parse().map_err(|_| IpParseError::InvalidOctet {
            address: dotted.to_string(),
            octet: octet.to_string(),
        })?;
        value |= u32::from(parsed) << (24 - 8 * i);
    }
    Ok(value)
}

/// Dotted-decimal form of an integer address.
pub fn from_integer(value: u32) -> String {
    let [a, b, c, d] = value.to_be_bytes();
    format!("{}.{}.{}.{}", a, b, c, d)
}

/// Render `dotted` in the requested format. Dotted output is the input
/// text, unchanged.
pub fn format(dotted: &str, ip_format: IpFormat) -> Result<String, IpParseError> {
    match ip_format {
        IpFormat::Integer => to_integer(dotted).map(|v| v.to_string()),
        IpFormat::Dotted => Ok(dotted.to_string()),
    }
}
