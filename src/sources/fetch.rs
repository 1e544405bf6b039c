//! Resolution of file-or-URL inputs to a local file.

use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

/// A local file ready to be read.
///
/// Downloaded inputs live in a temp file that is removed when this is dropped.
#[derive(Debug)]
pub struct LocalInput {
    path: PathBuf,
    temp: Option<TempPath>,
}

impl LocalInput {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_download(&self) -> bool {
        self.temp.is_some()
    }
}

pub fn is_url(file_or_url: &str) -> bool {
    file_or_url.starts_with("http://") || file_or_url.starts_with("https://")
}

/// Return a local path for `file_or_url`, downloading URLs first.
pub async fn resolve(file_or_url: &str) -> Result<LocalInput, Box<dyn Error>> {
    if is_url(file_or_url) {
        let temp = download_to_temp_file(file_or_url).await?;
        return Ok(LocalInput {
            path: temp.to_path_buf(),
            temp: Some(temp),
        });
    }

    let path = Path::new(file_or_url);
    if !path.is_file() {
        return Err(format!("Input file does not exist: {file_or_url}").into());
    }
    log::debug!("Using local file: {file_or_url}");
    Ok(LocalInput {
        path: path.to_path_buf(),
        temp: None,
    })
}

/// Download `url` into a new temp file.
pub async fn download_to_temp_file(url: &str) -> Result<TempPath, Box<dyn Error>> {
    log::info!("Downloading {url} ..");
    let mut response = reqwest::get(url)
        .await
        .map_err(|e| format!("failed to download data from URL: {url} - error: {e}"))?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(
            format!("failed to download data from URL: {url} - got status code: {status}").into(),
        );
    }

    let prefix = format!("ipcheck-{}-", chrono::Utc::now().format("%Y%m%d-%H%M%S"));
    let mut file = tempfile::Builder::new()
        .prefix(&prefix)
        .tempfile()
        .map_err(|e| format!("failed to create a temp file to store data in - error: {e}"))?;

    let mut size = 0;
    while let Some(chunk) = response.chunk().await? {
        size += chunk.len();
        file.write_all(&chunk)?;
    }
    file.flush()?;
    log::info!("Downloaded {size} bytes from {url} to {}", file.path().display());

    Ok(NamedTempFile::into_temp_path(file))
}
