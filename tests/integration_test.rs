//! Integration tests for ip-range-check
//!
//! These tests verify the complete workflow from loading ranges and
//! blocklists to scanning input and writing the exports.

use clap::Parser;
use ip_range_check::{
    config::Cli,
    index::OverlapIndex,
    load_blocklist, load_ranges,
    models::{Interval, MatchKind},
    processing::{EngineOptions, MatchingEngine, RunSummary},
    run, scan_file,
};
use std::io::Write;
use std::path::Path;

const RANGES: &str = "src/tests/test_data/ranges.csv";
const FIREHOL: &str = "src/tests/test_data/firehol.ips";
const INPUT: &str = "src/tests/test_data/test-ips.txt";

fn loaded_engine(options: EngineOptions) -> MatchingEngine {
    let mut engine = MatchingEngine::new(options);
    load_ranges(&mut engine, Path::new(RANGES)).expect("Failed to load ranges");
    load_blocklist(&mut engine, Path::new(FIREHOL)).expect("Failed to load blocklist");
    engine
}

#[test]
fn test_full_workflow_with_test_data() {
    let mut engine = loaded_engine(EngineOptions::default());
    assert_eq!(engine.ranges().len(), 6, "5 CSV ranges + 1 blocklist CIDR");
    assert_eq!(engine.exact().len(), 3);
    assert_eq!(engine.exact().source_count(), 2);

    let found = scan_file(&mut engine, Path::new(INPUT), false).expect("Failed to scan");
    let ips: Vec<&str> = found.iter().map(|r| r.ip.as_str()).collect();
    assert_eq!(ips, vec!["10.10.10.5", "8.8.8.8", "10.10.10.5", "8.8.8.8", "52.1.2.3"]);

    // 52.1.2.3 is both flagged and in a range; the range wins
    assert_eq!(found[4].source, "Amazon, AWS");
    assert_eq!(found[1].kind, MatchKind::Exact);
    assert!(found[1].source.starts_with("spamhaus_drop | Spamhaus.org"));

    assert_eq!(
        engine.summary(),
        RunSummary {
            matches_found: 5,
            distinct_ips_matched: 3,
            ips_scanned: 6,
            ranges_loaded: 6,
            flagged_ips_loaded: 3,
            duplicate_matches: 2,
            rejected_records: 0,
            rejected_candidates: 1,
        }
    );
    assert_eq!(engine.times_reported("10.10.10.5"), 2);
    assert_eq!(engine.duplicates().len(), 2);
}

#[test]
fn test_scan_continues_past_invalid_utf8() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"10.10.10.5 first\nGET /\xff\xfe 1.1.1.1\n10.10.10.6 after\n")
        .unwrap();

    let mut engine = MatchingEngine::default();
    engine.add_range(Interval::new("10.10.10.0", "10.20.30.40").unwrap(), "Azure");

    let found = scan_file(&mut engine, file.path(), false).expect("Failed to scan");
    let ips: Vec<&str> = found.iter().map(|r| r.ip.as_str()).collect();
    assert_eq!(ips, vec!["10.10.10.5", "10.10.10.6"]);
    assert_eq!(engine.summary().ips_scanned, 3);
}

#[test]
fn test_short_source_names() {
    let mut engine = loaded_engine(EngineOptions {
        more_info: false,
        ..Default::default()
    });
    let found = engine.check_ip("8.8.4.4").unwrap().expect("8.8.4.4 is flagged");
    assert_eq!(found.source, "bambenek_c2");
    assert_eq!(found.info(), "bambenek_c2");
}

#[test]
fn test_range_boundaries() {
    let mut engine = loaded_engine(EngineOptions::default());

    let first = engine.check_ip("10.10.10.0").unwrap().unwrap();
    assert_eq!(first.info(), "Azure | 10.10.10.0 - 10.20.30.40");
    let last = engine.check_ip("10.20.30.40").unwrap().unwrap();
    assert_eq!(last.source, "Azure");
    assert!(engine.check_ip("10.20.30.41").unwrap().is_none());

    let cidr = engine.check_ip("100.127.255.255").unwrap().unwrap();
    assert_eq!(
        cidr.kind,
        MatchKind::Range {
            min: "100.64.0.0".to_string(),
            max: "100.127.255.255".to_string()
        }
    );
}

#[test]
fn test_tree_height_stays_logarithmic() {
    let mut index = OverlapIndex::new();
    let n: u32 = 10_000;
    for i in 0..n {
        let low = i * 256;
        index.upsert(Interval::from_ordinals(low, low + 255).unwrap(), i);
    }
    assert_eq!(index.len(), n as usize);
    let bound = 2.0 * ((n + 1) as f64).log2();
    assert!(index.height() as f64 <= bound, "height {} > {bound}", index.height());

    let query = Interval::from_ordinals(5000 * 256 + 7, 5000 * 256 + 7).unwrap();
    assert_eq!(index.find_first_overlapping(&query).map(|(_, p)| *p), Some(5000));
}

#[tokio::test]
async fn test_run_writes_exports() {
    let dir = tempfile::tempdir().unwrap();
    let csv_file = dir.path().join("matches.csv");
    let json_file = dir.path().join("summary.json");

    let cli = Cli::try_parse_from([
        "ip-range-check",
        "--input-file",
        INPUT,
        "--ip-ranges",
        RANGES,
        "--firehol-file",
        FIREHOL,
        "--to-csv-file",
        csv_file.to_str().unwrap(),
        "--summary-json",
        json_file.to_str().unwrap(),
    ])
    .unwrap();

    let summary = run(&cli).await.expect("run failed");
    assert_eq!(summary.matches_found, 5);

    let csv = std::fs::read_to_string(&csv_file).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "IP,Info");
    assert_eq!(lines[1], "10.10.10.5,Azure | 10.10.10.0 - 10.20.30.40");
    assert_eq!(lines[5], "52.1.2.3,\"Amazon, AWS | 52.0.0.0 - 52.31.255.255\"");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_file).unwrap()).unwrap();
    assert_eq!(json["distinct_ips_matched"], 3);
    assert_eq!(json["rejected_candidates"], 1);
}

#[tokio::test]
async fn test_run_without_input() {
    let cli = Cli::try_parse_from(["ip-range-check", "--ip-ranges", RANGES]).unwrap();
    assert!(run(&cli).await.is_err());
}
