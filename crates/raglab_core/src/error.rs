use std::fmt;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Error shape shared by the chunker, the vector store and the remote
/// collaborators.
///
/// `code` is a stable SCREAMING_SNAKE identifier (`CHUNK_INVALID_PARAMS`,
/// `AI_EMBEDDINGS_FAILED`, ...) that callers match on; `message` is for humans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    /// Set for transient transport failures. Nothing in this workspace retries;
    /// the flag only tells the caller a retry could succeed.
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// `IO_READ_FAILED` carrying the path and the OS error.
    pub fn io_read(message: impl Into<String>, path: &Path, err: &io::Error) -> Self {
        Self::new("IO_READ_FAILED", message).with_details(io_details(path, err))
    }

    /// `IO_WRITE_FAILED` carrying the path and the OS error.
    pub fn io_write(message: impl Into<String>, path: &Path, err: &io::Error) -> Self {
        Self::new("IO_WRITE_FAILED", message).with_details(io_details(path, err))
    }

    /// `AI_CONFIG_INVALID` for a setting whose value could not be used. The
    /// value is echoed in `details`, so never pass secrets here.
    pub fn config_invalid(message: impl Into<String>, value: &str) -> Self {
        Self::new("AI_CONFIG_INVALID", message).with_details(format!("value={value}"))
    }
}

fn io_details(path: &Path, err: &io::Error) -> String {
    format!("path={}; err={}", path.display(), err)
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
