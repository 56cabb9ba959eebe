//! Error types for depsync-git

use std::path::PathBuf;

/// Result type for depsync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in depsync-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Git error from git2
    #[error(transparent)]
    Git(#[from] git2::Error),

    /// The pinned revision does not exist in the repository's history
    #[error("Revision '{revision}' not found in {path}")]
    RevisionNotFound { revision: String, path: PathBuf },
}
