//! Index building and scanning logic.
//!
//! - [`engine`] - the two-phase matching engine and run counters
//! - [`blocklist`] - classification of merged blocklist lines
//! - [`scanner`] - extraction of IPv4 tokens from text lines

mod blocklist;
mod engine;
mod scanner;

// Re-export public types and functions
pub use blocklist::{classify_line, BlocklistLine, INFO_SEPARATOR};
pub use engine::{EngineOptions, MatchingEngine, RangeColumns, RunSummary, UNKNOWN_SOURCE};
pub use scanner::extract_ipv4_candidates;
