//! Terminal output of matches and the run summary.

use crate::models::{MatchKind, MatchRecord};
use crate::processing::RunSummary;
use colored::Colorize;

/// `<display> <= <source> | <min> - <max>`, or `<display> <= <source>` for a
/// flagged-IP match. `display` is the IP or the whole input line.
pub fn format_match_line(display: &str, record: &MatchRecord) -> String {
    format!("{display} <= {}", record.info())
}

/// Print one match to stdout, with the source highlighted.
pub fn print_match(display: &str, record: &MatchRecord) {
    match &record.kind {
        MatchKind::Range { min, max } => println!(
            "{display} <= {source} | {min} - {max}",
            source = record.source.yellow()
        ),
        MatchKind::Exact => println!("{display} <= {source}", source = record.source.red()),
    }
}

pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "Found {} matches ({} distinct IPs) | Checked {} IPs against {} ranges and {} blocked or flagged IPs ({} dupes)",
        summary.matches_found,
        summary.distinct_ips_matched,
        summary.ips_scanned,
        summary.ranges_loaded,
        summary.flagged_ips_loaded,
        summary.duplicate_matches,
    )
}

pub fn print_summary(summary: &RunSummary) {
    println!("\n{}", format_summary(summary).bold());
    if summary.rejected_records > 0 || summary.rejected_candidates > 0 {
        println!(
            "#{}# skipped {} invalid range/blocklist records and {} invalid IP candidates",
            "NOTE".on_red(),
            summary.rejected_records,
            summary.rejected_candidates
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_match_line_range() {
        let r = MatchRecord::range("10.10.10.5", "Azure", "10.10.10.0", "10.20.30.40");
        assert_eq!(
            format_match_line("10.10.10.5", &r),
            "10.10.10.5 <= Azure | 10.10.10.0 - 10.20.30.40"
        );
        assert_eq!(
            format_match_line("GET / from 10.10.10.5", &r),
            "GET / from 10.10.10.5 <= Azure | 10.10.10.0 - 10.20.30.40"
        );
    }

    #[test]
    fn test_format_match_line_exact() {
        let r = MatchRecord::exact("8.8.8.8", "X");
        assert_eq!(format_match_line("8.8.8.8", &r), "8.8.8.8 <= X");
    }

    #[test]
    fn test_format_summary() {
        let summary = RunSummary {
            matches_found: 3,
            distinct_ips_matched: 2,
            ips_scanned: 10,
            ranges_loaded: 4,
            flagged_ips_loaded: 5,
            duplicate_matches: 1,
            ..Default::default()
        };
        assert_eq!(
            format_summary(&summary),
            "Found 3 matches (2 distinct IPs) | Checked 10 IPs against 4 ranges and 5 blocked or flagged IPs (1 dupes)"
        );
    }
}
