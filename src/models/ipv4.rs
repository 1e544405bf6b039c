//! IPv4 address and CIDR notation utilities.
//!
//! Addresses are handled as big-endian `u32` ordinals so ranges can be
//! compared numerically.

use crate::error::{IpCheckError, Result};
use std::net::Ipv4Addr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Parse a dotted-quad string into its ordinal.
///
/// # Examples
/// ```
/// use ip_range_check::models::parse_ipv4;
/// assert_eq!(parse_ipv4("10.0.0.1").unwrap(), 0x0A000001);
/// ```
pub fn parse_ipv4(ip: &str) -> Result<u32> {
    let ip = ip.trim();
    ip.parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| IpCheckError::InvalidAddress(ip.to_string()))
}

/// Format an ordinal as a dotted-quad string.
pub fn format_ipv4(ordinal: u32) -> String {
    Ipv4Addr::from(ordinal).to_string()
}

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use ip_range_check::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32> {
    if len > MAX_LENGTH {
        Err(IpCheckError::InvalidCidr(format!("/{len}")))
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Expand a CIDR block (`a.b.c.d/n`) to its inclusive `(start, end)` ordinals.
///
/// Host bits in the address are ignored, so `10.0.0.7/24` covers
/// `10.0.0.0 - 10.0.0.255`.
pub fn cidr_to_range(cidr: &str) -> Result<(u32, u32)> {
    let cidr = cidr.trim();
    let invalid = || IpCheckError::InvalidCidr(cidr.to_string());

    let (addr, len) = cidr.split_once('/').ok_or_else(invalid)?;
    let addr: Ipv4Addr = addr.parse().map_err(|_| invalid())?;
    if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let len: u8 = len.parse().map_err(|_| invalid())?;
    let mask = get_cidr_mask(len).map_err(|_| invalid())?;

    let start = u32::from(addr) & mask;
    let end = start | !mask;
    Ok((start, end))
}

/// Same as [`cidr_to_range`] but returns the bounds in dotted-quad form.
pub fn cidr_to_ip_range(cidr: &str) -> Result<(String, String)> {
    let (start, end) = cidr_to_range(cidr)?;
    Ok((format_ipv4(start), format_ipv4(end)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0).unwrap(), 0x00000000);
        assert_eq!(get_cidr_mask(8).unwrap(), 0xFF000000);
        assert_eq!(get_cidr_mask(16).unwrap(), 0xFFFF0000);
        assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
        assert_eq!(get_cidr_mask(32).unwrap(), 0xFFFFFFFF);
        assert!(get_cidr_mask(33).is_err());
    }

    #[test]
    fn test_parse_ipv4() {
        assert_eq!(parse_ipv4("0.0.0.0").unwrap(), 0);
        assert_eq!(parse_ipv4("255.255.255.255").unwrap(), u32::MAX);
        assert_eq!(parse_ipv4(" 192.168.1.42 ").unwrap(), 0xC0A8012A);
        assert_eq!(
            parse_ipv4("256.1.1.1"),
            Err(IpCheckError::InvalidAddress("256.1.1.1".to_string()))
        );
        assert!(parse_ipv4("1.2.3").is_err());
        assert!(parse_ipv4("1.2.3.4.5").is_err());
        assert!(parse_ipv4("").is_err());
        assert!(parse_ipv4("::1").is_err());
    }

    #[test]
    fn test_format_ipv4() {
        assert_eq!(format_ipv4(0), "0.0.0.0");
        assert_eq!(format_ipv4(0x0A141E28), "10.20.30.40");
        assert_eq!(format_ipv4(u32::MAX), "255.255.255.255");
    }

    #[test]
    fn test_cidr_to_range() {
        assert_eq!(
            cidr_to_ip_range("10.0.0.0/24").unwrap(),
            ("10.0.0.0".to_string(), "10.0.0.255".to_string())
        );
        assert_eq!(
            cidr_to_ip_range("0.0.0.0/0").unwrap(),
            ("0.0.0.0".to_string(), "255.255.255.255".to_string())
        );
        assert_eq!(
            cidr_to_ip_range("192.168.1.42/32").unwrap(),
            ("192.168.1.42".to_string(), "192.168.1.42".to_string())
        );
        // host bits are masked away
        assert_eq!(
            cidr_to_ip_range("10.1.2.3/16").unwrap(),
            ("10.1.0.0".to_string(), "10.1.255.255".to_string())
        );
    }

    #[test]
    fn test_cidr_to_range_invalid() {
        for bad in [
            "10.0.0.0",
            "10.0.0.0/33",
            "10.0.0/8",
            "10.0.0.0/",
            "x/8",
            "10.0.0.0/-1",
            "10.0.0.0/+8",
            "10.0.0.0/ 8",
        ] {
            assert_eq!(
                cidr_to_range(bad),
                Err(IpCheckError::InvalidCidr(bad.to_string())),
                "{bad}"
            );
        }
    }
}
