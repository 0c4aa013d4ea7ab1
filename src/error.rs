//! Typed failures surfaced by the comparison. Public functions return [`anyhow::Result`] with one
//! of these as the root cause, so callers can `downcast_ref::<DirDiffError>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirDiffError {
    /// A comparison root does not exist. Raised before any scanning.
    #[error("Check your file paths: {} does not exist", path.display())]
    MissingRoot { path: PathBuf },

    /// A comparison root exists but is not a directory.
    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// Invalid option (zero threads, zero chunk size, bad config file).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A file could not be opened or fully read while hashing.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed (unreadable directory, broken link loop, ...).
    #[error("walk error: {0}")]
    Walk(String),
}

impl DirDiffError {
    /// True for errors that are raised before any work starts.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            DirDiffError::MissingRoot { .. } | DirDiffError::NotADirectory { .. }
        )
    }
}
