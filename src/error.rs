//! Error types for the range index and matching engine.

use thiserror::Error;

/// Failures raised while building or querying the index.
///
/// A query that finds nothing is not an error; lookups return `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IpCheckError {
    #[error("invalid IPv4 address: '{0}'")]
    InvalidAddress(String),

    #[error("invalid CIDR: '{0}'")]
    InvalidCidr(String),

    #[error("invalid ip range: range max before min [{min} - {max}]")]
    InvalidRange { min: String, max: String },

    #[error("too many sources registered (limit {})", u16::MAX as u32 + 1)]
    SourceLimit,

    #[error("record {record} has no column {column}")]
    MissingField { record: usize, column: usize },
}

pub type Result<T> = std::result::Result<T, IpCheckError>;
