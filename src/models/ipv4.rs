//! IPv4 address codec and prefix mask arithmetic.
//!
//! Addresses are carried as `u32` in host order; text is always dotted quad.

use crate::errors::ParseError;
use lazy_static::lazy_static;
use regex::Regex;
use std::net::Ipv4Addr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

lazy_static! {
    static ref OCTET_RE: Regex = Regex::new(r"^[0-9]+$").expect("Invalid Regex?");
}

/// Convert a prefix length to a subnet mask as u32.
///
/// Lengths above 32 saturate to all ones.
///
/// # Examples
/// ```
/// use subnet_explorer::models::mask_bits;
/// assert_eq!(mask_bits(24), 0xFFFFFF00);
/// assert_eq!(mask_bits(0), 0);
/// ```
pub fn mask_bits(len: u8) -> u32 {
    let len = len.min(MAX_LENGTH);
    let right_len = MAX_LENGTH - len;
    let all_bits = u32::MAX as u64;
    ((all_bits >> right_len) << right_len) as u32
}

/// Clear every bit below the prefix.
pub fn network_bits(addr: u32, len: u8) -> u32 {
    addr & mask_bits(len)
}

/// Highest address in the block containing `addr`.
pub fn broadcast_bits(addr: u32, len: u8) -> u32 {
    let mask = mask_bits(len);
    (addr & mask) | !mask
}

/// Number of addresses covered by a prefix length.
pub fn block_size(len: u8) -> u64 {
    1u64 << (MAX_LENGTH - len.min(MAX_LENGTH))
}

/// Parse strict dotted-quad text: four decimal octets, each 0..=255.
pub fn parse_addr(text: &str) -> Result<u32, ParseError> {
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() != 4 {
        return Err(ParseError::InvalidAddress(text.to_string()));
    }
    parts.iter().try_fold(0u32, |acc, part| {
        if !OCTET_RE.is_match(part) {
            return Err(ParseError::InvalidOctet(part.to_string()));
        }
        // Digit runs too long for u16 are out of range as well.
        let n: u16 = part
            .parse()
            .map_err(|_| ParseError::OctetOutOfRange(part.to_string()))?;
        if n > 255 {
            return Err(ParseError::OctetOutOfRange(part.to_string()));
        }
        Ok((acc << 8) | n as u32)
    })
}

/// Format a u32 as dotted quad.
pub fn format_addr(addr: u32) -> String {
    Ipv4Addr::from(addr).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_bits() {
        assert_eq!(mask_bits(0), 0x00000000);
        assert_eq!(mask_bits(8), 0xFF000000);
        assert_eq!(mask_bits(16), 0xFFFF0000);
        assert_eq!(mask_bits(24), 0xFFFFFF00);
        assert_eq!(mask_bits(32), 0xFFFFFFFF);
        assert_eq!(mask_bits(40), 0xFFFFFFFF);
    }

    #[test]
    fn test_network_bits() {
        let ip = parse_addr("192.168.1.42").unwrap();
        assert_eq!(format_addr(network_bits(ip, 24)), "192.168.1.0");
        assert_eq!(format_addr(network_bits(ip, 16)), "192.168.0.0");
        assert_eq!(format_addr(network_bits(ip, 8)), "192.0.0.0");
        assert_eq!(format_addr(network_bits(ip, 32)), "192.168.1.42");
        assert_eq!(format_addr(network_bits(ip, 0)), "0.0.0.0");
    }

    #[test]
    fn test_broadcast_bits() {
        let ip = parse_addr("192.168.1.0").unwrap();
        assert_eq!(format_addr(broadcast_bits(ip, 24)), "192.168.1.255");
        assert_eq!(format_addr(broadcast_bits(ip, 16)), "192.168.255.255");
        assert_eq!(format_addr(broadcast_bits(ip, 8)), "192.255.255.255");
        assert_eq!(format_addr(broadcast_bits(ip, 32)), "192.168.1.0");
        assert_eq!(broadcast_bits(0, 0), u32::MAX);
    }

    #[test]
    fn test_block_size() {
        assert_eq!(block_size(32), 1);
        assert_eq!(block_size(24), 256);
        assert_eq!(block_size(0), 1u64 << 32);
    }

    #[test]
    fn test_parse_addr() {
        assert_eq!(parse_addr("10.0.0.1").unwrap(), 0x0A000001);
        assert_eq!(parse_addr("255.255.255.255").unwrap(), u32::MAX);
        assert_eq!(parse_addr("010.0.0.1").unwrap(), 0x0A000001);
    }

    #[test]
    fn test_parse_addr_rejects() {
        assert_eq!(
            parse_addr("10.0.0"),
            Err(ParseError::InvalidAddress("10.0.0".to_string()))
        );
        assert_eq!(
            parse_addr("10.0.0.1.5"),
            Err(ParseError::InvalidAddress("10.0.0.1.5".to_string()))
        );
        assert_eq!(
            parse_addr("10.a.0.1"),
            Err(ParseError::InvalidOctet("a".to_string()))
        );
        assert_eq!(
            parse_addr("10..0.1"),
            Err(ParseError::InvalidOctet("".to_string()))
        );
        assert_eq!(
            parse_addr("10.-1.0.1"),
            Err(ParseError::InvalidOctet("-1".to_string()))
        );
        assert_eq!(
            parse_addr("10.256.0.1"),
            Err(ParseError::OctetOutOfRange("256".to_string()))
        );
        assert!(parse_addr("10.99999999999.0.1").is_err());
    }

    #[test]
    fn test_format_addr() {
        assert_eq!(format_addr(0), "0.0.0.0");
        assert_eq!(format_addr(0xC0A80101), "192.168.1.1");
        assert_eq!(format_addr(u32::MAX), "255.255.255.255");
    }
}
