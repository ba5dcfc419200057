//! IPv4 subnet value and CIDR parsing.

use super::ipv4::{broadcast_bits, format_addr, mask_bits, network_bits, parse_addr, MAX_LENGTH};
use crate::errors::ParseError;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// An IPv4 block, always normalized to its network address.
///
/// Values are only created by [`parse_cidr`] or by subdividing another
/// subnet, so every field is consistent with `network` and `mask`.
#[derive(Debug, Clone, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    cidr: String,
    network: u32,
    mask: u8,
    netmask: String,
    broadcast: u32,
    first_host: Option<u32>,
    last_host: Option<u32>,
    hosts: u64,
}

impl Subnet {
    /// Build the subnet containing `addr` with prefix `mask` (clamped to /32).
    pub(crate) fn from_parts(addr: u32, mask: u8) -> Subnet {
        let mask = mask.min(MAX_LENGTH);
        let network = network_bits(addr, mask);
        let broadcast = broadcast_bits(network, mask);
        let (first_host, last_host, hosts) = if mask >= MAX_LENGTH - 1 {
            (None, None, 0)
        } else {
            (
                Some(network + 1),
                Some(broadcast - 1),
                (1u64 << (MAX_LENGTH - mask)) - 2,
            )
        };
        Subnet {
            cidr: format!("{}/{}", format_addr(network), mask),
            network,
            mask,
            netmask: format_addr(mask_bits(mask)),
            broadcast,
            first_host,
            last_host,
            hosts,
        }
    }

    /// Canonical `network/mask` text.
    pub fn cidr(&self) -> &str {
        &self.cidr
    }

    pub fn network(&self) -> u32 {
        self.network
    }

    /// Prefix length, 0..=32.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Dotted netmask, e.g. `255.255.255.0`.
    pub fn netmask(&self) -> &str {
        &self.netmask
    }

    pub fn broadcast(&self) -> u32 {
        self.broadcast
    }

    /// First usable host, `None` for /31 and /32.
    pub fn first_host(&self) -> Option<u32> {
        self.first_host
    }

    /// Last usable host, `None` for /31 and /32.
    pub fn last_host(&self) -> Option<u32> {
        self.last_host
    }

    /// Usable host count (0 for /31 and /32).
    pub fn hosts(&self) -> u64 {
        self.hosts
    }

    /// The two children one prefix bit longer, `None` for a /32.
    pub fn halves(&self) -> Option<(Subnet, Subnet)> {
        if self.mask >= MAX_LENGTH {
            return None;
        }
        let child_mask = self.mask + 1;
        let upper = self.network | (1u32 << (MAX_LENGTH - child_mask));
        Some((
            Subnet::from_parts(self.network, child_mask),
            Subnet::from_parts(upper, child_mask),
        ))
    }

    /// True when `other` lies entirely within this subnet (including itself).
    pub fn contains(&self, other: &Subnet) -> bool {
        other.network >= self.network && other.broadcast <= self.broadcast
    }

    /// True when `other` is inside this subnet and strictly more specific.
    pub fn is_ancestor_of(&self, other: &Subnet) -> bool {
        other.mask > self.mask && self.contains(other)
    }
}

/// Parse `a.b.c.d/len` into a normalized [`Subnet`].
///
/// Host bits are cleared, so `10.0.0.7/24` yields `10.0.0.0/24`.
pub fn parse_cidr(input: &str) -> Result<Subnet, ParseError> {
    let input = input.trim();
    let parts: Vec<&str> = input.split('/').collect();
    if parts.len() != 2 || parts[0].is_empty() {
        return Err(ParseError::MissingMask(input.to_string()));
    }
    let mask_str = parts[1];
    if mask_str.is_empty() || !mask_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidMask(mask_str.to_string()));
    }
    let mask: u8 = mask_str
        .parse()
        .map_err(|_| ParseError::InvalidMask(mask_str.to_string()))?;
    if mask > MAX_LENGTH {
        return Err(ParseError::InvalidMask(mask_str.to_string()));
    }
    let addr = parse_addr(parts[0])?;
    Ok(Subnet::from_parts(addr, mask))
}

impl FromStr for Subnet {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cidr(s)
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.cidr)
    }
}

impl PartialEq for Subnet {
    fn eq(&self, other: &Subnet) -> bool {
        self.network == other.network && self.mask == other.mask
    }
}

/// Address order; a wider block sorts before narrower ones at the same address.
impl Ord for Subnet {
    fn cmp(&self, other: &Subnet) -> Ordering {
        (self.network, self.mask).cmp(&(other.network, other.mask))
    }
}

impl PartialOrd for Subnet {
    fn partial_cmp(&self, other: &Subnet) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Text rendering of a [`Subnet`] for tables and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    pub cidr: String,
    pub network: String,
    pub broadcast: String,
    pub first_host: Option<String>,
    pub last_host: Option<String>,
    pub hosts: u64,
    pub netmask: String,
}

impl DisplayRecord {
    /// `network – broadcast` range text.
    pub fn range(&self) -> String {
        format!("{} – {}", self.network, self.broadcast)
    }
}

/// Map the numeric fields of a subnet back to dotted quads.
pub fn format_subnet(subnet: &Subnet) -> DisplayRecord {
    DisplayRecord {
        cidr: subnet.cidr.clone(),
        network: format_addr(subnet.network),
        broadcast: format_addr(subnet.broadcast),
        first_host: subnet.first_host.map(format_addr),
        last_host: subnet.last_host.map(format_addr),
        hosts: subnet.hosts,
        netmask: subnet.netmask.clone(),
    }
}
