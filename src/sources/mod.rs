//! Input handling.
//!
//! - [`fetch`] - resolving a path or URL to a readable local file
//! - [`reader`] - line and CSV record readers

mod fetch;
mod reader;

// Re-export public types and functions
pub use fetch::{download_to_temp_file, is_url, resolve, LocalInput};
pub use reader::{for_each_csv_record, for_each_line, split_csv_line};
