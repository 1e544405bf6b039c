//! Command line arguments, every option also readable from the environment.

use crate::processing::{EngineOptions, RangeColumns};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

pub const DEFAULT_IP_RANGES_URL: &str =
    "https://raw.githubusercontent.com/jhassine/server-ip-addresses/master/data/datacenters.csv";

#[derive(Parser, Debug, Clone)]
#[command(name = "ip-range-check")]
#[command(version, about = "Check IPv4 addresses against cloud ranges and blocklists")]
pub struct Cli {
    /// File or URL with text to scan for IPv4 addresses
    #[arg(short, long, env = "IPCHECK_INPUT_FILE")]
    pub input_file: Option<String>,

    /// File or URL of the IP range CSV
    #[arg(long, env = "IPCHECK_IP_RANGES", default_value = DEFAULT_IP_RANGES_URL)]
    pub ip_ranges: String,

    /// Range CSV columns holding the CIDR or first address, the last address
    /// and the source name, zero-based
    #[arg(long, env = "IPCHECK_RANGE_COLUMNS", default_value = "0,2,3")]
    pub range_columns: RangeColumns,

    /// Download and merge the FireHOL blocklists into DIR, then exit
    #[arg(long, value_name = "DIR", env = "IPCHECK_DOWNLOAD")]
    pub download: Option<PathBuf>,

    /// Download again even if the lists are already unpacked
    #[arg(long, env = "IPCHECK_FORCE_DOWNLOAD")]
    pub force_download: bool,

    /// Merged FireHOL blocklist to load
    #[arg(short, long, env = "IPCHECK_FIREHOL_FILE")]
    pub firehol_file: Option<PathBuf>,

    /// Progress output and debug logging
    #[arg(long, env = "IPCHECK_VERBOSE")]
    pub verbose: bool,

    /// Keep the full blocklist header text as the source name
    #[arg(
        long,
        env = "IPCHECK_MORE_INFO",
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub more_info: bool,

    /// Print the whole input line instead of just the IP
    #[arg(long, env = "IPCHECK_PRINT_LINES")]
    pub print_lines: bool,

    /// Report every overlapping range per IP instead of the first
    #[arg(long, env = "IPCHECK_ALL_MATCHES")]
    pub all_matches: bool,

    /// Export matches as CSV
    #[arg(long, env = "IPCHECK_TO_CSV_FILE")]
    pub to_csv_file: Option<PathBuf>,

    /// Write the run summary as JSON
    #[arg(long, env = "IPCHECK_SUMMARY_JSON")]
    pub summary_json: Option<PathBuf>,
}

impl Cli {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            more_info: self.more_info,
            all_matches: self.all_matches,
            columns: self.range_columns,
        }
    }
}
