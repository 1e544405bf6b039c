//! FireHOL `.ipset` / `.netset` parsing and merging.
//!
//! A FireHOL list starts with a comment header:
//!
//! ```text
//! #
//! # bambenek_c2
//! #
//! # ipv4 hash:ip ipset
//! #
//! # ...
//! #
//! # Maintainer      : Bambenek Consulting
//! # Maintainer URL  : http://osint.bambenekconsulting.com/feeds/
//! ```
//!
//! followed by one IP or CIDR per line.

use crate::models::parse_ipv4;
use serde::Serialize;
use std::collections::HashSet;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Country-level lists are huge and not blocklists; they are never merged.
pub const EXCLUDED_SETS: [&str; 4] = [
    "ipdeny_country",
    "ipip_country",
    "ip2location_country",
    "geolite2_country",
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IpSet {
    pub name: String,
    pub maintainer: String,
    pub maintainer_url: String,
    pub cidrs: Vec<String>,
    pub ips: Vec<String>,
}

impl IpSet {
    /// Section header line written to the merged file.
    pub fn header(&self) -> String {
        format!(
            "# {} | {} | {} ({} CIDRs, {} IPs)",
            self.name,
            self.maintainer,
            self.maintainer_url,
            self.cidrs.len(),
            self.ips.len()
        )
    }
}

/// Counters of one merge.
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub sets: usize,
    pub ranges: usize,
    pub ips: usize,
    pub dupes: usize,
}

/// Parse the text of a FireHOL list.
pub fn parse_ipset(text: &str) -> IpSet {
    let mut set = IpSet::default();
    let mut bare_comments = 0;

    for l in text.lines() {
        let l = l.trim_end();
        if l == "#" {
            bare_comments += 1;
            continue;
        }
        if let Some(comment) = l.strip_prefix("# ") {
            match bare_comments {
                1 if set.name.is_empty() => set.name = comment.trim().to_string(),
                4 => {
                    if let Some((key, value)) = comment.split_once(" : ") {
                        match key.trim() {
                            "Maintainer URL" => set.maintainer_url = value.trim().to_string(),
                            "Maintainer" => set.maintainer = value.trim().to_string(),
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        } else if !l.starts_with('#') && l.trim().len() >= 8 {
            let entry = l.trim().to_string();
            if entry.contains('/') {
                set.cidrs.push(entry);
            } else {
                set.ips.push(entry);
            }
        }
    }
    set
}

pub fn load_ipset(path: &Path) -> Result<IpSet, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("could not load IPSet from file: {} - error: {e}", path.display()))?;
    let mut set = parse_ipset(&text);
    if set.name.is_empty() {
        set.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(set)
}

/// All `.ipset` and `.netset` files below `dir`, sorted.
pub fn find_ipset_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = std::fs::read_dir(&current)
            .map_err(|e| format!("could not walk dir: {} - error: {e}", current.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("ipset") | Some("netset")
            ) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

fn is_excluded(path: &Path) -> bool {
    let path = path.to_string_lossy();
    EXCLUDED_SETS.iter().any(|ex| path.contains(ex))
}

/// Write every non-empty, non-excluded set of `files` into one merged file.
///
/// A singleton IP already written by an earlier set is skipped and counted
/// as a dupe; CIDRs are written as they are.
pub fn merge_ipsets(files: &[PathBuf], out: &Path) -> Result<ImportReport, Box<dyn Error>> {
    let file = File::create(out)
        .map_err(|e| format!("could not create output file: {} - error: {e}", out.display()))?;
    let mut writer = BufWriter::new(file);
    let mut report = ImportReport::default();
    let mut written: HashSet<u32> = HashSet::new();

    for f in files.iter().filter(|f| !is_excluded(f)) {
        let set = match load_ipset(f) {
            Ok(set) => set,
            Err(e) => {
                log::warn!("Skipping invalid IP set: {} - {e}", f.display());
                continue;
            }
        };
        report.sets += 1;
        log::info!(
            "Loaded IP set: {} ({} CIDRs, {} IPs)",
            set.name,
            set.cidrs.len(),
            set.ips.len()
        );

        if set.cidrs.is_empty() && set.ips.is_empty() {
            continue;
        }

        writeln!(writer, "{}", set.header())?;
        for cidr in &set.cidrs {
            writeln!(writer, "{cidr}")?;
            report.ranges += 1;
        }
        for ip in &set.ips {
            let ordinal = match parse_ipv4(ip) {
                Ok(n) => n,
                Err(e) => {
                    log::warn!("{}: {e}", set.name);
                    continue;
                }
            };
            if written.insert(ordinal) {
                writeln!(writer, "{ip}")?;
                report.ips += 1;
            } else {
                report.dupes += 1;
            }
        }
    }
    writer.flush()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "src/tests/test_data/firehol/blocklist-ipsets-master/sample_c2.ipset";

    #[test]
    fn test_parse_ipset_header() {
        let text = std::fs::read_to_string(SAMPLE).unwrap();
        let set = parse_ipset(&text);
        assert_eq!(set.name, "sample_c2");
        assert_eq!(set.maintainer, "Sample Consulting");
        assert_eq!(set.maintainer_url, "http://osint.example.com/feeds/");
        assert_eq!(set.cidrs, vec!["192.0.2.0/24".to_string()]);
        assert_eq!(set.ips, vec!["198.51.100.7".to_string(), "203.0.113.9".to_string()]);
        assert_eq!(
            set.header(),
            "# sample_c2 | Sample Consulting | http://osint.example.com/feeds/ (1 CIDRs, 2 IPs)"
        );
    }

    #[test]
    fn test_parse_ipset_ignores_short_lines() {
        let set = parse_ipset("#\n# tiny\n#\n1.2.3\n10.0.0.1\n");
        assert_eq!(set.name, "tiny");
        assert_eq!(set.ips, vec!["10.0.0.1".to_string()]);
        assert!(set.cidrs.is_empty());
    }

    #[test]
    fn test_find_ipset_files() {
        let files = find_ipset_files(Path::new("src/tests/test_data/firehol")).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["ipdeny_country_zz.netset", "other_list.netset", "sample_c2.ipset"]
        );
    }

    #[test]
    fn test_merge_ipsets() {
        let files = find_ipset_files(Path::new("src/tests/test_data/firehol")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("firehol.ips");

        let report = merge_ipsets(&files, &out).unwrap();
        assert_eq!(
            report,
            ImportReport {
                sets: 2,
                ranges: 2,
                ips: 3,
                dupes: 1
            }
        );

        let merged = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = merged.lines().collect();
        assert!(lines[0].starts_with("# other_list | "));
        assert!(!merged.contains("ipdeny_country"));
        // 203.0.113.9 is listed by both sets but written once
        assert_eq!(lines.iter().filter(|l| **l == "203.0.113.9").count(), 1);
    }
}
