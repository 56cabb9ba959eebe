//! The synchronization state machine and its result types

pub mod engine;
pub mod report;
pub mod state;

pub use engine::{SyncOptions, Synchronizer};
pub use report::{CheckResult, CheckState, FailureKind, SyncOutcome, SyncResult};
pub use state::WorkspaceState;
