//! Output formatting for match results.
//!
//! This module handles formatting and outputting matches:
//! - [`csv`] - CSV export of matches and JSON export of the run summary
//! - [`terminal`] - Terminal output with colors

mod csv;
mod terminal;

pub use csv::{
    escape_csv_field, render_matches_csv, write_matches_csv, write_summary_json, CSV_HEADER,
};
pub use terminal::{format_match_line, format_summary, print_match, print_summary};
