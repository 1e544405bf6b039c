//! Line and CSV record readers.

use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Call `on_line(line_number, line)` for every line of `path`.
///
/// Line numbers start at 1. Bytes that are not valid UTF-8 are replaced with
/// U+FFFD, so binary noise never ends the pass. A read error or an error from
/// the callback stops the pass and is returned. Returns the number of lines
/// read.
pub fn for_each_line<F>(path: &Path, mut on_line: F) -> Result<usize, Box<dyn Error>>
where
    F: FnMut(usize, &str) -> Result<(), Box<dyn Error>>,
{
    let file = File::open(path)
        .map_err(|e| format!("failed to open file: {} - error: {e}", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut line_number = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|e| {
            format!("failed to read line from file: {} - error: {e}", path.display())
        })?;
        if read == 0 {
            break;
        }
        let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        let line = String::from_utf8_lossy(bytes);

        line_number += 1;
        on_line(line_number, &*line)
            .map_err(|e| format!("failed to process line {line_number} - error: {e}"))?;
    }
    Ok(line_number)
}

/// Call `on_record(record_number, fields)` for every CSV record of `path`.
///
/// Blank lines are skipped and do not get a record number.
pub fn for_each_csv_record<F>(path: &Path, mut on_record: F) -> Result<usize, Box<dyn Error>>
where
    F: FnMut(usize, &[String]) -> Result<(), Box<dyn Error>>,
{
    let mut record_number = 0;
    for_each_line(path, |_, line| {
        if line.trim().is_empty() {
            return Ok(());
        }
        record_number += 1;
        let record = split_csv_line(line);
        on_record(record_number, &record)
    })?;
    Ok(record_number)
}

/// Split one CSV line into fields.
///
/// Handles double-quoted fields with embedded commas and `""` escapes.
/// Records spanning several lines are not supported.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if field.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
