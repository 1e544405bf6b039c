//! Classification of merged blocklist lines.
//!
//! The merged file is a sequence of sections:
//!
//! ```text
//! # firehol_level1 | FireHOL | http://iplists.firehol.org/ (3 CIDRs, 1 IPs)
//! 0.0.0.0/8
//! 10.0.0.0/8
//! 5.188.10.179
//! ```

/// Separator between the set name and the maintainer details in a header.
pub const INFO_SEPARATOR: &str = " | ";

/// One classified blocklist line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlocklistLine<'a> {
    /// `# <name>` starts a new source.
    Source(&'a str),
    Cidr(&'a str),
    Ip(&'a str),
    /// Blank lines and bare comments.
    Skip,
}

/// Classify a single line.
///
/// With `more_info` disabled a header keeps only the part before the first
/// `" | "`, which is the set name.
pub fn classify_line(line: &str, more_info: bool) -> BlocklistLine<'_> {
    let line = line.trim();
    if line.is_empty() {
        return BlocklistLine::Skip;
    }
    if let Some(rest) = line.strip_prefix('#') {
        let name = rest.trim();
        if name.is_empty() {
            return BlocklistLine::Skip;
        }
        if more_info {
            return BlocklistLine::Source(name);
        }
        let name = name.split(INFO_SEPARATOR).next().unwrap_or(name).trim();
        return BlocklistLine::Source(name);
    }
    if line.contains('/') {
        BlocklistLine::Cidr(line)
    } else {
        BlocklistLine::Ip(line)
    }
}
