//! Lookup structures built from range and blocklist inputs.
//!
//! - [`tree`] - augmented red-black tree of IP ranges
//! - [`exact`] - hash table of individually flagged IPs

mod exact;
mod tree;

pub use exact::{ExactMatchTable, SourceId};
pub use tree::{OverlapIndex, Overlapping, Upsert};
