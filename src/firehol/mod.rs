//! FireHOL blocklist import.
//!
//! Downloads the `firehol/blocklist-ipsets` archive, unpacks it and merges
//! every `.ipset`/`.netset` list into a single file the engine can load
//! with `--firehol-file`.

pub mod cli;
mod ipset;

pub use ipset::{
    find_ipset_files, load_ipset, merge_ipsets, parse_ipset, ImportReport, IpSet, EXCLUDED_SETS,
};

use std::error::Error;
use std::path::{Path, PathBuf};

pub const FIREHOL_REPO_URL: &str =
    "https://github.com/firehol/blocklist-ipsets/archive/refs/heads/master.zip";
pub const UNPACKED_DIR: &str = "blocklist-ipsets-master";
pub const ARCHIVE_NAME: &str = "master.zip";
pub const MERGED_FILE: &str = "firehol.ips";

/// Path of the merged blocklist written by [`download`].
pub fn merged_file_path(out_dir: &Path) -> PathBuf {
    out_dir.join(MERGED_FILE)
}

/// Fetch (unless already unpacked) and merge the FireHOL lists into
/// `<out_dir>/firehol.ips`.
pub fn download(out_dir: &Path, force: bool) -> Result<ImportReport, Box<dyn Error>> {
    std::fs::create_dir_all(out_dir)
        .map_err(|e| format!("could not create dir: {} - error: {e}", out_dir.display()))?;

    let unpacked = out_dir.join(UNPACKED_DIR);
    let archive = out_dir.join(ARCHIVE_NAME);

    if force && unpacked.exists() {
        log::info!("Removing previous download {}", unpacked.display());
        std::fs::remove_dir_all(&unpacked)?;
        if archive.exists() {
            std::fs::remove_file(&archive)?;
        }
    }

    if unpacked.exists() {
        log::info!("Using existing FireHOL lists in {}", unpacked.display());
    } else {
        let dir = out_dir.to_string_lossy();
        cli::run(&format!("wget -q -P {} {FIREHOL_REPO_URL}", cli::quote(&dir)))?;
        cli::run(&format!(
            "unzip -oq -d {} {}",
            cli::quote(&dir),
            cli::quote(&archive.to_string_lossy())
        ))?;
    }

    let files = find_ipset_files(&unpacked)?;
    log::info!("Found {} FireHOL list files", files.len());

    let out = merged_file_path(out_dir);
    let report = merge_ipsets(&files, &out)?;
    log::info!(
        "Wrote {}: {} sets, {} ranges, {} IPs ({} dupes)",
        out.display(),
        report.sets,
        report.ranges,
        report.ips,
        report.dupes
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copy_fixture(to: &Path) {
        let from = Path::new("src/tests/test_data/firehol").join(UNPACKED_DIR);
        let dest = to.join(UNPACKED_DIR);
        std::fs::create_dir_all(&dest).unwrap();
        for entry in std::fs::read_dir(from).unwrap() {
            let path = entry.unwrap().path();
            std::fs::copy(&path, dest.join(path.file_name().unwrap())).unwrap();
        }
    }

    #[test]
    fn test_download_uses_existing_lists() {
        let dir = tempfile::tempdir().unwrap();
        copy_fixture(dir.path());

        let report = download(dir.path(), false).unwrap();
        assert_eq!(report.sets, 2);
        assert_eq!(report.dupes, 1);

        let merged = std::fs::read_to_string(merged_file_path(dir.path())).unwrap();
        assert!(merged.contains("# sample_c2 | Sample Consulting |"));
        assert!(merged.contains("198.18.0.0/15"));
    }
}
