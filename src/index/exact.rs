//! Exact-match table for individually listed addresses.
//!
//! Blocklists can hold millions of single IPs. Storing them as one-address
//! ranges in the tree would cost a node and two strings each, so they are kept
//! here as `ordinal -> SourceId`, with the names held once in the registry.

use crate::error::{IpCheckError, Result};
use crate::models::parse_ipv4;
use std::collections::HashMap;

/// Index into the source registry.
pub type SourceId = u16;

#[derive(Debug, Default)]
pub struct ExactMatchTable {
    ips: HashMap<u32, SourceId>,
    sources: Vec<String>,
}

impl ExactMatchTable {
    pub fn new() -> ExactMatchTable {
        Self::default()
    }

    /// Append `name` to the registry and return its id.
    pub fn register_source(&mut self, name: &str) -> Result<SourceId> {
        let id = SourceId::try_from(self.sources.len()).map_err(|_| IpCheckError::SourceLimit)?;
        self.sources.push(name.to_string());
        Ok(id)
    }

    /// Record `ip` as belonging to `source`. A later call for the same address wins.
    pub fn add_ip(&mut self, ip: &str, source: SourceId) -> Result<()> {
        let ordinal = parse_ipv4(ip)?;
        self.ips.insert(ordinal, source);
        Ok(())
    }

    pub fn lookup(&self, ordinal: u32) -> Option<SourceId> {
        self.ips.get(&ordinal).copied()
    }

    pub fn source_name(&self, id: SourceId) -> Option<&str> {
        self.sources.get(usize::from(id)).map(String::as_str)
    }

    /// Lookup that resolves straight to the source name.
    pub fn lookup_name(&self, ordinal: u32) -> Option<&str> {
        self.lookup(ordinal).and_then(|id| self.source_name(id))
    }

    /// Number of flagged addresses.
    pub fn len(&self) -> usize {
        self.ips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}
