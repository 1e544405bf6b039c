//! Closed IPv4 ranges.

use super::ipv4::{cidr_to_range, format_ipv4, parse_ipv4};
use crate::error::{IpCheckError, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// An inclusive IP range `[low, high]`.
///
/// The textual bounds are kept for reporting only; equality and ordering use
/// the ordinals, ordered by `low` and then by `high`.
#[derive(Debug, Clone, Serialize)]
pub struct Interval {
    ip_range_min: String,
    ip_range_max: String,
    #[serde(skip)]
    low: u32,
    #[serde(skip)]
    high: u32,
}

impl Interval {
    /// Create an interval from two dotted-quad strings.
    pub fn new(ip_range_min: &str, ip_range_max: &str) -> Result<Interval> {
        let low = parse_ipv4(ip_range_min)?;
        let high = parse_ipv4(ip_range_max)?;
        if low > high {
            return Err(IpCheckError::InvalidRange {
                min: ip_range_min.trim().to_string(),
                max: ip_range_max.trim().to_string(),
            });
        }
        Ok(Interval {
            ip_range_min: ip_range_min.trim().to_string(),
            ip_range_max: ip_range_max.trim().to_string(),
            low,
            high,
        })
    }

    /// Single address interval, used for point queries.
    pub fn point(ip: &str) -> Result<Interval> {
        Interval::new(ip, ip)
    }

    /// Interval covering a CIDR block.
    pub fn from_cidr(cidr: &str) -> Result<Interval> {
        let (low, high) = cidr_to_range(cidr)?;
        Ok(Interval {
            ip_range_min: format_ipv4(low),
            ip_range_max: format_ipv4(high),
            low,
            high,
        })
    }

    /// Interval from ordinals; the display bounds are derived.
    pub fn from_ordinals(low: u32, high: u32) -> Result<Interval> {
        if low > high {
            return Err(IpCheckError::InvalidRange {
                min: format_ipv4(low),
                max: format_ipv4(high),
            });
        }
        Ok(Interval {
            ip_range_min: format_ipv4(low),
            ip_range_max: format_ipv4(high),
            low,
            high,
        })
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    pub fn ip_range_min(&self) -> &str {
        &self.ip_range_min
    }

    pub fn ip_range_max(&self) -> &str {
        &self.ip_range_max
    }

    /// True when both intervals share at least one address.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.low <= other.high && self.high >= other.low
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Interval) -> bool {
        self.low == other.low && self.high == other.high
    }
}

impl Eq for Interval {}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Interval) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Interval) -> Ordering {
        self.low
            .cmp(&other.low)
            .then_with(|| self.high.cmp(&other.high))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{} - {}]", self.ip_range_min, self.ip_range_max)
    }
}
