//! Git backend for depsync
//!
//! Implements the `depsync-core` provider capability with `git2`: clone,
//! fetch, detached checkout at an exact revision, and working-tree probes.

pub mod error;
pub mod vcs;

pub use error::{Error, Result};
pub use vcs::GitVcs;
