//! Matching engine: builds the range index and flagged-IP table, then checks
//! scanned addresses against them.
//!
//! A run has two phases. Range records and blocklist lines are loaded first
//! (mutating the index), then candidate addresses are checked. Lookups only
//! need `&self`; the `&mut self` scan methods update the run counters.

use super::blocklist::{classify_line, BlocklistLine};
use super::scanner::extract_ipv4_candidates;
use crate::error::{IpCheckError, Result};
use crate::index::{ExactMatchTable, OverlapIndex, SourceId, Upsert};
use crate::models::{Interval, MatchRecord};
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;

/// Source name for blocklist entries that appear before any header.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Column layout of a range CSV record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeColumns {
    /// CIDR, or the first address of an explicit range.
    pub cidr_or_min: usize,
    /// Last address, read only when `cidr_or_min` is not a CIDR.
    pub max: usize,
    /// Vendor / source display name.
    pub source: usize,
}

impl Default for RangeColumns {
    /// `cidr,hostmin,hostmax,vendor`
    fn default() -> Self {
        RangeColumns {
            cidr_or_min: 0,
            max: 2,
            source: 3,
        }
    }
}

impl std::str::FromStr for RangeColumns {
    type Err = String;

    /// `cidr_or_min,max,source` zero-based column numbers, e.g. `0,2,3`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let columns: Vec<usize> = s
            .split(',')
            .map(|c| c.trim().parse::<usize>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| format!("invalid column list '{s}': {e}"))?;
        match columns[..] {
            [cidr_or_min, max, source] => Ok(RangeColumns {
                cidr_or_min,
                max,
                source,
            }),
            _ => Err(format!(
                "invalid column list '{s}': expected 3 columns (cidr_or_min,max,source)"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Keep the maintainer details of blocklist headers in the source name.
    pub more_info: bool,
    /// Report every overlapping range instead of the first one found.
    pub all_matches: bool,
    pub columns: RangeColumns,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            more_info: true,
            all_matches: false,
            columns: RangeColumns::default(),
        }
    }
}

/// Counters for one run.
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Every reported match, repeats included.
    pub matches_found: usize,
    pub distinct_ips_matched: usize,
    pub ips_scanned: usize,
    pub ranges_loaded: usize,
    pub flagged_ips_loaded: usize,
    /// Matches for an IP that had already been reported earlier in the scan.
    pub duplicate_matches: usize,
    pub rejected_records: usize,
    pub rejected_candidates: usize,
}

#[derive(Debug, Default)]
pub struct MatchingEngine {
    ranges: OverlapIndex<String>,
    exact: ExactMatchTable,
    options: EngineOptions,
    current_source: Option<(String, SourceId)>,
    /// Matched IP -> info of every match reported for it.
    seen: HashMap<String, Vec<String>>,
    summary: RunSummary,
}

fn field(record: &[String], record_number: usize, column: usize) -> Result<&str> {
    record
        .get(column)
        .map(|f| f.trim())
        .ok_or(IpCheckError::MissingField {
            record: record_number,
            column,
        })
}

impl MatchingEngine {
    pub fn new(options: EngineOptions) -> MatchingEngine {
        MatchingEngine {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn ranges(&self) -> &OverlapIndex<String> {
        &self.ranges
    }

    pub fn exact(&self) -> &ExactMatchTable {
        &self.exact
    }

    // ---- Phase A: index build ----

    /// Store a range for `source`.
    pub fn add_range(&mut self, interval: Interval, source: impl Into<String>) -> Upsert {
        self.summary.ranges_loaded += 1;
        self.ranges.upsert(interval, source.into())
    }

    /// Load one range CSV record. Record 1 is the header and is skipped.
    ///
    /// A failing record is counted as rejected and its error returned; the
    /// index is left untouched.
    pub fn load_range_record(&mut self, record_number: usize, record: &[String]) -> Result<()> {
        if record_number == 1 {
            return Ok(());
        }
        let parsed = self.parse_range_record(record_number, record);
        match parsed {
            Ok((interval, source)) => {
                self.add_range(interval, source);
                Ok(())
            }
            Err(e) => {
                self.summary.rejected_records += 1;
                Err(e)
            }
        }
    }

    fn parse_range_record(
        &self,
        record_number: usize,
        record: &[String],
    ) -> Result<(Interval, String)> {
        let columns = self.options.columns;
        let first = field(record, record_number, columns.cidr_or_min)?;
        let source = field(record, record_number, columns.source)?;
        let interval = if first.contains('/') {
            Interval::from_cidr(first)?
        } else {
            Interval::new(first, field(record, record_number, columns.max)?)?
        };
        Ok((interval, source.to_string()))
    }

    /// Load numbered records, logging and skipping the ones that fail.
    /// Returns the number of failures.
    pub fn load_range_records<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = (usize, Vec<String>)>,
    {
        let mut failed = 0;
        for (n, record) in records {
            if let Err(e) = self.load_range_record(n, &record) {
                log::warn!("skipping range record #{n}: {e}");
                failed += 1;
            }
        }
        failed
    }

    /// Load one line of a merged blocklist.
    ///
    /// `# <name>` registers a new source; CIDR lines go to the range index and
    /// bare IPs to the exact-match table, both under the latest source.
    pub fn load_blocklist_line(&mut self, line: &str) -> Result<()> {
        let result = self.apply_blocklist_line(line);
        if result.is_err() {
            self.summary.rejected_records += 1;
        }
        result
    }

    fn apply_blocklist_line(&mut self, line: &str) -> Result<()> {
        match classify_line(line, self.options.more_info) {
            BlocklistLine::Skip => Ok(()),
            BlocklistLine::Source(name) => {
                let id = self.exact.register_source(name)?;
                log::debug!("blocklist source #{id}: {name}");
                self.current_source = Some((name.to_string(), id));
                Ok(())
            }
            BlocklistLine::Cidr(cidr) => {
                let interval = Interval::from_cidr(cidr)?;
                let source = self.current_source()?.0.to_string();
                self.add_range(interval, source);
                Ok(())
            }
            BlocklistLine::Ip(ip) => {
                let id = self.current_source()?.1;
                self.exact.add_ip(ip, id)
            }
        }
    }

    fn current_source(&mut self) -> Result<(&str, SourceId)> {
        if self.current_source.is_none() {
            let id = self.exact.register_source(UNKNOWN_SOURCE)?;
            log::warn!("blocklist entries before the first '# <name>' header are listed as '{UNKNOWN_SOURCE}'");
            self.current_source = Some((UNKNOWN_SOURCE.to_string(), id));
        }
        Ok(self
            .current_source
            .as_ref()
            .map_or((UNKNOWN_SOURCE, 0), |(name, id)| (name.as_str(), *id)))
    }

    /// Load blocklist lines, logging and skipping the ones that fail.
    /// Returns the number of failures.
    pub fn load_blocklist_lines<L, S>(&mut self, lines: L) -> usize
    where
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut failed = 0;
        for l in lines {
            let l = l.as_ref();
            if let Err(e) = self.load_blocklist_line(l) {
                log::warn!("invalid blocklist line '{l}': {e}");
                failed += 1;
            }
        }
        failed
    }

    // ---- Phase B: scan ----

    /// Read-only lookup: tree first, then the flagged-IP table.
    pub fn lookup(&self, query: &Interval) -> Option<MatchRecord> {
        let ip = query.ip_range_min();
        if let Some((range, source)) = self.ranges.find_first_overlapping(query) {
            return Some(MatchRecord::range(
                ip,
                source,
                range.ip_range_min(),
                range.ip_range_max(),
            ));
        }
        self.exact
            .lookup_name(query.low())
            .map(|source| MatchRecord::exact(ip, source))
    }

    /// Read-only lookup returning every overlapping range, plus the flagged-IP
    /// entry when no range matched.
    pub fn lookup_all(&self, query: &Interval) -> Vec<MatchRecord> {
        let ip = query.ip_range_min();
        let mut found: Vec<MatchRecord> = self
            .ranges
            .find_all_overlapping(query)
            .map(|(range, source)| {
                MatchRecord::range(ip, source, range.ip_range_min(), range.ip_range_max())
            })
            .sorted_by(|a, b| a.info().cmp(&b.info()))
            .collect();
        if found.is_empty() {
            found.extend(
                self.exact
                    .lookup_name(query.low())
                    .map(|source| MatchRecord::exact(ip, source)),
            );
        }
        found
    }

    fn point_query(&mut self, ip: &str) -> Result<Interval> {
        self.summary.ips_scanned += 1;
        Interval::point(ip).map_err(|e| {
            self.summary.rejected_candidates += 1;
            e
        })
    }

    /// Check one candidate address and record the match, if any.
    ///
    /// `Ok(None)` means the address is in no range and not flagged.
    pub fn check_ip(&mut self, ip: &str) -> Result<Option<MatchRecord>> {
        let query = self.point_query(ip)?;
        let found = self.lookup(&query);
        if let Some(record) = &found {
            self.record_match(record);
        }
        Ok(found)
    }

    /// Like [`check_ip`](Self::check_ip) but reports every overlapping range.
    pub fn check_ip_all(&mut self, ip: &str) -> Result<Vec<MatchRecord>> {
        let query = self.point_query(ip)?;
        let found = self.lookup_all(&query);
        for record in &found {
            self.record_match(record);
        }
        Ok(found)
    }

    /// Extract the addresses in `line` and check each of them.
    ///
    /// Tokens that look like addresses but are not valid IPv4 are logged and
    /// skipped.
    pub fn scan_line(&mut self, line: &str) -> Vec<MatchRecord> {
        let mut matches = Vec::new();
        for ip in extract_ipv4_candidates(line) {
            let checked = if self.options.all_matches {
                self.check_ip_all(ip)
            } else {
                self.check_ip(ip).map(|found| found.into_iter().collect())
            };
            match checked {
                Ok(found) => matches.extend(found),
                Err(e) => log::warn!("skipping candidate: {e}"),
            }
        }
        matches
    }

    fn record_match(&mut self, record: &MatchRecord) {
        self.summary.matches_found += 1;
        let infos = self.seen.entry(record.ip.clone()).or_default();
        if !infos.is_empty() {
            self.summary.duplicate_matches += 1;
        }
        infos.push(record.info());
    }

    /// How many times `ip` has been reported so far.
    pub fn times_reported(&self, ip: &str) -> usize {
        self.seen.get(ip).map_or(0, Vec::len)
    }

    /// IPs reported more than once, sorted, with the info of each report.
    pub fn duplicates(&self) -> Vec<(&str, &[String])> {
        self.seen
            .iter()
            .filter(|(_, infos)| infos.len() > 1)
            .map(|(ip, infos)| (ip.as_str(), infos.as_slice()))
            .sorted_by_key(|(ip, _)| *ip)
            .collect()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            distinct_ips_matched: self.seen.len(),
            flagged_ips_loaded: self.exact.len(),
            ..self.summary.clone()
        }
    }
}
