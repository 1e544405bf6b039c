//! CSV and JSON export of match results.

use crate::models::MatchRecord;
use crate::processing::RunSummary;
use std::error::Error;
use std::path::Path;

pub const CSV_HEADER: &str = "IP,Info";

/// Quote a field when it contains a comma, quote or line break.
pub fn escape_csv_field(input: &str) -> String {
    if input.contains([',', '"', '\n', '\r']) {
        // Enclose in double quotes and escape any double quotes within the field.
        let escaped = input.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        input.to_string()
    }
}

/// Render the `IP,Info` export, header first.
pub fn render_matches_csv(records: &[MatchRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for r in records {
        out.push_str(&escape_csv_field(&r.ip));
        out.push(',');
        out.push_str(&escape_csv_field(&r.info()));
        out.push('\n');
    }
    out
}

pub fn write_matches_csv(path: &Path, records: &[MatchRecord]) -> Result<(), Box<dyn Error>> {
    std::fs::write(path, render_matches_csv(records))
        .map_err(|e| format!("Error writing CSV file {}: {e}", path.display()))?;
    log::info!("Exported {} matches to {}", records.len(), path.display());
    Ok(())
}

pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| format!("Error serializing JSON: {e}"))?;
    std::fs::write(path, json)
        .map_err(|e| format!("Error writing summary file {}: {e}", path.display()))?;
    log::info!("Wrote run summary to {}", path.display());
    Ok(())
}
