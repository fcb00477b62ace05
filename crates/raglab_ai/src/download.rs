use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use raglab_core::error::AppError;
use serde::{Deserialize, Serialize};

/// Public-domain text used by the demo commands.
pub const MEDITATIONS_URL: &str = "https://www.gutenberg.org/cache/epub/2680/pg2680.txt";
pub const MEDITATIONS_PATH: &str = "data/meditations_marcus_aurelius.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadSummary {
    pub path: PathBuf,
    pub bytes: u64,
}

/// GET `url` and save the body as UTF-8 text at `save_path`, creating parent
/// directories. A non-success status is an error; nothing is retried.
pub fn download_file(url: &str, save_path: impl AsRef<Path>) -> Result<DownloadSummary, AppError> {
    let save_path = save_path.as_ref();

    let resp = match ureq::get(url).call() {
        Ok(r) => r,
        Err(ureq::Error::Status(status, _)) => {
            return Err(AppError::new("DOWNLOAD_FAILED", "Download returned an error status")
                .with_details(format!("url={url}; status={status}")));
        }
        Err(e) => {
            return Err(AppError::new("DOWNLOAD_FAILED", "Failed to fetch download URL")
                .with_details(format!("url={url}; err={e}"))
                .with_retryable(true));
        }
    };

    let mut raw = Vec::new();
    resp.into_reader().read_to_end(&mut raw).map_err(|e| {
        AppError::new("DOWNLOAD_FAILED", "Failed to read download body")
            .with_details(format!("url={url}; err={e}"))
            .with_retryable(true)
    })?;
    let text = String::from_utf8_lossy(&raw);

    if let Some(parent) = save_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io_write("Failed to create download directory", parent, &e))?;
    }
    fs::write(save_path, text.as_bytes())
        .map_err(|e| AppError::io_write("Failed to write downloaded text", save_path, &e))?;

    tracing::info!(%url, path = %save_path.display(), bytes = text.len(), "downloaded text");
    Ok(DownloadSummary {
        path: save_path.to_path_buf(),
        bytes: text.len() as u64,
    })
}
