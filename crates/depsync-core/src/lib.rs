//! Core synchronization layer for depsync
//!
//! Given a declarative set of dependencies, each pinned to an exact
//! revision, the [`Synchronizer`] drives every directory under a workspace
//! root to its pinned revision with the minimal set of version-control
//! operations: clone when absent, fetch and checkout when stale, nothing
//! when already satisfied, and a loud failure when the path is occupied by
//! something that is not a checkout.
//!
//! # Architecture
//!
//! `depsync-core` knows nothing about any particular version-control
//! system. It drives a [`VcsProvider`], and a backend crate supplies the
//! implementation:
//!
//! ```text
//!        CLI
//!         |
//!    depsync-core ---- VcsProvider trait
//!         |
//!    depsync-git  (git2 implementation)
//! ```
//!
//! Per-record failures are data, not exceptions: [`Synchronizer::sync`]
//! returns one [`SyncResult`] per declared dependency, in declaration
//! order, even when some of them failed.

pub mod cancel;
pub mod error;
pub mod manifest;
pub mod provider;
pub mod sync;

pub use cancel::CancelToken;
pub use error::{Error, Result};
pub use manifest::{DependencyRecord, DependencySet, Manifest};
pub use provider::{ProviderError, ProviderResult, VcsProvider};
pub use sync::{
    CheckResult, CheckState, FailureKind, SyncOptions, SyncOutcome, SyncResult, Synchronizer,
    WorkspaceState,
};
