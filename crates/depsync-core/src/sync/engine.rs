//! Synchronizer implementation
//!
//! For each declared dependency the synchronizer probes the directory under
//! the workspace root and runs the smallest transition that reaches the
//! pinned revision:
//!
//! ```text
//! Absent ------------- clone + checkout ------------> Checkout(pin)
//! NotACheckout ------- fail (WorkspaceConflict) ----> unchanged
//!              \------ force: remove + clone -------> Checkout(pin)
//! Checkout(pin) ------ nothing -----------------------already satisfied
//! Checkout(other) ---- fetch + checkout ------------> Checkout(pin)
//! ```
//!
//! Records are mutually independent: a failure on one is reported in its
//! result and never aborts the others.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::manifest::{DependencyRecord, DependencySet};
use crate::provider::{ProviderError, VcsProvider};

use super::report::{CheckResult, CheckState, FailureKind, SyncOutcome, SyncResult};
use super::state::{WorkspaceState, revision_satisfies_pin};

/// Options for a synchronization run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Replace conflicting content and discard local modifications instead
    /// of failing. Never the default.
    pub force: bool,
    /// Number of dependencies to process in parallel. Values of 0 and 1
    /// both mean sequential processing.
    pub jobs: usize,
    /// Cooperative cancellation flag shared with the caller
    pub cancel: CancelToken,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            force: false,
            jobs: 1,
            cancel: CancelToken::new(),
        }
    }
}

/// Engine that drives each declared dependency to its pinned revision
///
/// The synchronizer owns the workspace root and a [`VcsProvider`] backend.
/// It provides two operations:
/// - **sync**: perform the transitions, returning one result per record
/// - **check**: probe-only drift report, no network or mutation
///
/// Records operate on disjoint subdirectories, so one run may process them
/// in parallel. Concurrent runs against the same root are not supported;
/// callers that may overlap must serialize externally.
pub struct Synchronizer<P> {
    /// Workspace root the dependency directories live under
    root: PathBuf,
    /// Version-control backend
    provider: P,
    /// Run options
    options: SyncOptions,
}

impl<P: VcsProvider> Synchronizer<P> {
    /// Create a synchronizer with default options.
    pub fn new(root: impl Into<PathBuf>, provider: P) -> Self {
        Self::with_options(root, provider, SyncOptions::default())
    }

    /// Create a synchronizer with explicit options.
    pub fn with_options(root: impl Into<PathBuf>, provider: P, options: SyncOptions) -> Self {
        Self {
            root: root.into(),
            provider,
            options,
        }
    }

    /// The workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Bring every declared dependency to its pinned revision.
    ///
    /// Returns one [`SyncResult`] per record, in declaration order,
    /// regardless of scheduling. Failures are reported per record and do
    /// not prevent the remaining records from being processed.
    pub fn sync(&self, set: &DependencySet) -> Vec<SyncResult> {
        let records = set.records();
        if records.len() <= 1 || self.options.jobs <= 1 {
            return records.iter().map(|r| self.sync_one(r)).collect();
        }
        self.sync_parallel(records, self.options.jobs.min(records.len()))
    }

    /// Probe every declared dependency without fetching anything.
    pub fn check(&self, set: &DependencySet) -> Vec<CheckResult> {
        set.iter()
            .map(|record| {
                let path = self.root.join(&record.name);
                let state = match self.probe(&path) {
                    WorkspaceState::Absent => CheckState::Missing,
                    WorkspaceState::NotACheckout => CheckState::Conflict,
                    WorkspaceState::Checkout { revision } => {
                        if revision_satisfies_pin(&revision, &record.revision) {
                            CheckState::Satisfied
                        } else {
                            CheckState::Stale { current: revision }
                        }
                    }
                };
                CheckResult {
                    name: record.name.clone(),
                    state,
                }
            })
            .collect()
    }

    /// Run the per-record state machine on a bounded pool of workers.
    ///
    /// Workers draw record indices from a shared cursor; results are
    /// reassembled into declaration order afterwards.
    fn sync_parallel(&self, records: &[DependencyRecord], workers: usize) -> Vec<SyncResult> {
        let cursor = AtomicUsize::new(0);
        let mut indexed: Vec<(usize, SyncResult)> = Vec::with_capacity(records.len());

        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(|| {
                        let mut chunk = Vec::new();
                        loop {
                            let index = cursor.fetch_add(1, Ordering::Relaxed);
                            if index >= records.len() {
                                break;
                            }
                            chunk.push((index, self.sync_one(&records[index])));
                        }
                        chunk
                    })
                })
                .collect();

            for handle in handles {
                indexed.extend(handle.join().expect("sync worker panicked"));
            }
        });

        indexed.sort_unstable_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    fn sync_one(&self, record: &DependencyRecord) -> SyncResult {
        let outcome = self.sync_record(record);
        match &outcome {
            SyncOutcome::AlreadySatisfied => {
                debug!(name = %record.name, "already at pinned revision");
            }
            SyncOutcome::Synced => {
                info!(name = %record.name, revision = %record.revision, "fetched and checked out");
            }
            SyncOutcome::Failed { kind, message } => {
                warn!(name = %record.name, %kind, %message, "synchronization failed");
            }
        }
        SyncResult {
            name: record.name.clone(),
            outcome,
        }
    }

    fn sync_record(&self, record: &DependencyRecord) -> SyncOutcome {
        if self.options.cancel.is_cancelled() {
            return SyncOutcome::cancelled("cancelled before processing");
        }

        let path = self.root.join(&record.name);
        match self.probe(&path) {
            WorkspaceState::Absent => self.clone_pinned(record, &path),
            WorkspaceState::NotACheckout => {
                if self.options.force {
                    debug!(path = %path.display(), "removing conflicting content before clone");
                    if let Err(error) = remove_existing(&path) {
                        return SyncOutcome::failed(
                            FailureKind::WorkspaceConflict,
                            format!("failed to remove {}: {}", path.display(), error),
                        );
                    }
                    self.clone_pinned(record, &path)
                } else {
                    SyncOutcome::failed(
                        FailureKind::WorkspaceConflict,
                        format!(
                            "{} exists but is not a recognized checkout",
                            path.display()
                        ),
                    )
                }
            }
            WorkspaceState::Checkout { revision } => {
                if revision_satisfies_pin(&revision, &record.revision) {
                    SyncOutcome::AlreadySatisfied
                } else {
                    self.update_pinned(record, &path, &revision)
                }
            }
        }
    }

    /// Inspect the path for one dependency.
    fn probe(&self, path: &Path) -> WorkspaceState {
        if !path.exists() {
            return WorkspaceState::Absent;
        }
        if !self.provider.is_valid_checkout(path) {
            return WorkspaceState::NotACheckout;
        }
        match self.provider.current_revision(path) {
            Ok(revision) => WorkspaceState::Checkout { revision },
            Err(error) => {
                // a checkout whose head cannot be read is debris from an
                // interrupted run, not a checkout
                debug!(path = %path.display(), %error, "unreadable checkout head");
                WorkspaceState::NotACheckout
            }
        }
    }

    /// Transition from `Absent`: clone, then pin.
    fn clone_pinned(&self, record: &DependencyRecord, path: &Path) -> SyncOutcome {
        debug!(name = %record.name, url = %record.url, "cloning");
        if let Err(error) = self.provider.clone_repo(&record.url, path) {
            self.discard_partial(path);
            return self.fetch_failure(error);
        }
        if self.options.cancel.is_cancelled() {
            self.discard_partial(path);
            return SyncOutcome::cancelled("cancelled after clone");
        }
        // a fresh clone has no local modifications to protect
        if let Err(error) = self.provider.checkout(path, &record.revision, true) {
            self.discard_partial(path);
            return self.fetch_failure(error);
        }
        SyncOutcome::Synced
    }

    /// Transition from `Checkout(other)`: fetch so the pin is reachable,
    /// then check it out.
    fn update_pinned(&self, record: &DependencyRecord, path: &Path, current: &str) -> SyncOutcome {
        debug!(name = %record.name, %current, pinned = %record.revision, "updating to pinned revision");
        if !self.options.force {
            match self.provider.has_local_changes(path) {
                Ok(false) => {}
                Ok(true) => {
                    return SyncOutcome::failed(
                        FailureKind::DirtyWorkingTree,
                        format!("{} has local modifications", path.display()),
                    );
                }
                Err(error) => {
                    // a tree whose status cannot be determined is not safe
                    // to overwrite
                    return SyncOutcome::failed(FailureKind::DirtyWorkingTree, error.to_string());
                }
            }
        }
        if let Err(error) = self.provider.fetch(path, &record.url) {
            return self.fetch_failure(error);
        }
        if self.options.cancel.is_cancelled() {
            return SyncOutcome::cancelled("cancelled after fetch");
        }
        if let Err(error) = self.provider.checkout(path, &record.revision, self.options.force) {
            return self.fetch_failure(error);
        }
        SyncOutcome::Synced
    }

    /// Remove a directory this run created, so the entry probes as absent
    /// on the next run instead of as a half-made checkout.
    fn discard_partial(&self, path: &Path) {
        if path.exists()
            && let Err(error) = fs::remove_dir_all(path)
        {
            warn!(path = %path.display(), %error, "failed to remove partial clone");
        }
    }

    /// Classify a failed network-adjacent operation, attributing it to
    /// cancellation when the token fired mid-operation.
    fn fetch_failure(&self, error: ProviderError) -> SyncOutcome {
        if self.options.cancel.is_cancelled() {
            SyncOutcome::cancelled(error.to_string())
        } else {
            SyncOutcome::failed(FailureKind::Fetch, error.to_string())
        }
    }
}

fn remove_existing(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
