//! Error types for depsync-core

use std::path::PathBuf;

/// Result type for depsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in depsync-core operations
///
/// These are configuration-level failures that abort a run before any
/// dependency is touched. Per-record synchronization failures are reported
/// as [`crate::sync::SyncResult`] values instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two declared dependencies would share a directory
    #[error("Duplicate dependency name: {name}")]
    DuplicateName { name: String },

    /// Dependency name is empty or not usable as a single path segment
    #[error("Invalid dependency name: {name:?}")]
    InvalidName { name: String },

    /// Pinned revision is empty or not a hex commit identifier
    #[error("Invalid pinned revision {revision:?} for dependency {name}")]
    InvalidRevision { name: String, revision: String },

    /// Manifest file could not be read
    #[error("Failed to read manifest at {path}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML deserialization error
    #[error(transparent)]
    ManifestParse(#[from] toml::de::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
