//! Extraction of IPv4-shaped tokens from free text.

use regex::Regex;
use std::sync::OnceLock;

/// Four dot-separated groups of 1-3 digits. Boundaries are checked separately.
static IPV4_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_ipv4_regex() -> &'static Regex {
    IPV4_REGEX.get_or_init(|| {
        Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("Invalid Regex")
    })
}

fn is_ip_char(b: u8) -> bool {
    b.is_ascii_digit() || b == b'.'
}

/// Find every IPv4-shaped token in `line`.
///
/// A token must not touch another digit or dot on either side, so
/// `1.2.3.4.5` and `1234.1.1.1` yield nothing. Octet values are not checked.
pub fn extract_ipv4_candidates(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    get_ipv4_regex()
        .find_iter(line)
        .filter(|m| {
            let before_ok = m.start() == 0 || !is_ip_char(bytes[m.start() - 1]);
            let after_ok = m.end() == bytes.len() || !is_ip_char(bytes[m.end()]);
            before_ok && after_ok
        })
        .map(|m| m.as_str())
        .collect()
}
