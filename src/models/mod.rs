//! Domain models for IP range checking.
//!
//! This module contains the core data structures used throughout the application:
//! - [`ipv4`] helpers - dotted-quad and CIDR conversion to `u32` ordinals
//! - [`Interval`] - inclusive IP range with overlap test
//! - [`MatchRecord`] - a scanned IP matched to its source

mod interval;
mod ipv4;
mod match_record;

// Re-export public types
pub use interval::Interval;
pub use ipv4::{
    cidr_to_ip_range, cidr_to_range, format_ipv4, get_cidr_mask, parse_ipv4, MAX_LENGTH,
};
pub use match_record::{MatchKind, MatchRecord};
