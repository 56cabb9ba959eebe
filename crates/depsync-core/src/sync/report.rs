//! Per-record synchronization outcomes
//!
//! Failures are values, not exceptions: a run always yields one result per
//! declared dependency, in declaration order, so callers can map outcomes
//! back to names deterministically.

use serde::{Deserialize, Serialize};

/// What went wrong for a single dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// The remote could not be reached, or the pinned revision could not
    /// be obtained from it
    Fetch,
    /// The target path is occupied by content that is not a checkout
    WorkspaceConflict,
    /// Local uncommitted modifications block a safe checkout
    DirtyWorkingTree,
    /// The run was cancelled before this dependency completed
    Cancelled,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::Fetch => "fetch failed",
            FailureKind::WorkspaceConflict => "workspace conflict",
            FailureKind::DirtyWorkingTree => "dirty working tree",
            FailureKind::Cancelled => "cancelled",
        };
        write!(f, "{}", label)
    }
}

/// Outcome of synchronizing a single dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum SyncOutcome {
    /// The checkout was already at the pinned revision; nothing was done
    AlreadySatisfied,
    /// The dependency was fetched and checked out at the pinned revision
    Synced,
    /// The dependency could not be brought to the pinned revision
    Failed {
        /// Failure classification
        kind: FailureKind,
        /// Underlying message for diagnostics
        message: String,
    },
}

impl SyncOutcome {
    pub(crate) fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn cancelled(message: impl Into<String>) -> Self {
        Self::failed(FailureKind::Cancelled, message)
    }

    /// Whether this outcome is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome of one dependency, tagged with its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    /// The dependency's declared name
    pub name: String,
    /// What happened
    #[serde(flatten)]
    pub outcome: SyncOutcome,
}

impl SyncResult {
    /// Whether this record failed to synchronize.
    pub fn is_failure(&self) -> bool {
        self.outcome.is_failure()
    }
}

/// Probe-only classification of one dependency directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum CheckState {
    /// Checked out at the pinned revision
    Satisfied,
    /// A valid checkout, but at a different revision
    Stale {
        /// The revision currently checked out
        current: String,
    },
    /// Not cloned yet
    Missing,
    /// Path occupied by non-checkout content
    Conflict,
}

/// Probe result for one dependency, tagged with its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The dependency's declared name
    pub name: String,
    /// The probed state
    #[serde(flatten)]
    pub state: CheckState,
}

impl CheckResult {
    /// Whether the checkout is already at its pinned revision.
    pub fn is_satisfied(&self) -> bool {
        matches!(self.state, CheckState::Satisfied)
    }
}
