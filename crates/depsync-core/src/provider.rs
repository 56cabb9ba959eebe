//! Version-control capability trait
//!
//! The synchronizer drives version control through this seam. Any backend
//! that can clone, fetch, and materialize an exact revision in a working
//! tree is acceptable; `depsync-git` supplies the git implementation.

use std::path::Path;

/// Error from a [`VcsProvider`] operation.
///
/// Providers flatten their backend-specific failures into a message here;
/// the synchronizer classifies the failure (fetch, dirty tree, cancelled)
/// from context, not from the backend error type.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    /// Create a provider error from any displayable cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The underlying message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for provider operations
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Operations the synchronizer requires from a version-control backend.
///
/// All operations take explicit paths; no implementation may depend on the
/// process working directory.
pub trait VcsProvider: Send + Sync {
    /// Clone `url` into `path`. The path does not exist when called; the
    /// provider may leave partial state behind on failure, which the
    /// synchronizer removes.
    fn clone_repo(&self, url: &str, path: &Path) -> ProviderResult<()>;

    /// Update the checkout at `path` with the remote history from `url`,
    /// without touching the working tree.
    fn fetch(&self, path: &Path, url: &str) -> ProviderResult<()>;

    /// Materialize `revision` in the working tree at `path`. With `force`,
    /// local modifications may be overwritten; without it, the checkout
    /// must refuse rather than clobber.
    fn checkout(&self, path: &Path, revision: &str, force: bool) -> ProviderResult<()>;

    /// The revision currently checked out at `path`, as a full identifier.
    fn current_revision(&self, path: &Path) -> ProviderResult<String>;

    /// Whether `path` is a checkout this provider recognizes.
    fn is_valid_checkout(&self, path: &Path) -> bool;

    /// Whether the working tree at `path` has uncommitted modifications to
    /// tracked content.
    fn has_local_changes(&self, path: &Path) -> ProviderResult<bool>;
}
