//! Match results produced by the scan phase.

use serde::Serialize;
use std::fmt;

/// How an address was matched.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MatchKind {
    /// The address fell inside a stored range.
    Range { min: String, max: String },
    /// The address is listed individually by a blocklist.
    Exact,
}

/// One reported match.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub ip: String,
    pub source: String,
    #[serde(flatten)]
    pub kind: MatchKind,
}

impl MatchRecord {
    pub fn range(ip: &str, source: &str, min: &str, max: &str) -> MatchRecord {
        MatchRecord {
            ip: ip.to_string(),
            source: source.to_string(),
            kind: MatchKind::Range {
                min: min.to_string(),
                max: max.to_string(),
            },
        }
    }

    pub fn exact(ip: &str, source: &str) -> MatchRecord {
        MatchRecord {
            ip: ip.to_string(),
            source: source.to_string(),
            kind: MatchKind::Exact,
        }
    }

    /// `"<source> | <min> - <max>"` for a range match, the source name otherwise.
    pub fn info(&self) -> String {
        match &self.kind {
            MatchKind::Range { min, max } => format!("{} | {} - {}", self.source, min, max),
            MatchKind::Exact => self.source.clone(),
        }
    }
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <= {}", self.ip, self.info())
    }
}
