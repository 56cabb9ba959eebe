//! git2-backed provider implementation
//!
//! Checkouts are pinned by detaching HEAD at the target commit, so the
//! current revision of a dependency is always readable from HEAD without
//! consulting any branch state.

use std::path::Path;

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{AutotagOption, FetchOptions, ObjectType, RemoteCallbacks, Repository, StatusOptions};
use tracing::debug;

use depsync_core::{CancelToken, ProviderError, ProviderResult, VcsProvider};

use crate::error::{Error, Result};

/// Git implementation of the depsync provider capability.
///
/// Network transfers poll the cancellation token through libgit2's
/// transfer-progress callback, so an in-flight clone or fetch stops soon
/// after cancellation instead of running to completion.
#[derive(Debug, Clone, Default)]
pub struct GitVcs {
    cancel: CancelToken,
}

impl GitVcs {
    /// Create a provider that is never cancelled externally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider sharing the caller's cancellation token.
    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self { cancel }
    }

    fn remote_callbacks(&self) -> RemoteCallbacks<'static> {
        let cancel = self.cancel.clone();
        let mut callbacks = RemoteCallbacks::new();
        // returning false aborts the transfer
        callbacks.transfer_progress(move |_progress| !cancel.is_cancelled());
        callbacks
    }

    fn fetch_options(&self) -> FetchOptions<'static> {
        let mut options = FetchOptions::new();
        options.remote_callbacks(self.remote_callbacks());
        options
    }

    fn clone_into(&self, url: &str, path: &Path) -> Result<()> {
        debug!(%url, path = %path.display(), "cloning repository");
        let mut builder = RepoBuilder::new();
        builder.fetch_options(self.fetch_options());
        builder.clone(url, path)?;
        Ok(())
    }

    fn fetch_from(&self, path: &Path, url: &str) -> Result<()> {
        debug!(%url, path = %path.display(), "fetching updates");
        let repo = Repository::open(path)?;
        // the clone configures origin; fall back to an anonymous remote if
        // the checkout was wired up differently
        let mut remote = match repo.find_remote("origin") {
            Ok(remote) => remote,
            Err(_) => repo.remote_anonymous(url)?,
        };
        let mut options = self.fetch_options();
        options.download_tags(AutotagOption::All);
        remote.fetch(
            &["+refs/heads/*:refs/remotes/origin/*"],
            Some(&mut options),
            None,
        )?;
        Ok(())
    }

    fn checkout_revision(&self, path: &Path, revision: &str, force: bool) -> Result<()> {
        debug!(%revision, path = %path.display(), force, "checking out revision");
        let repo = Repository::open(path)?;
        let object = repo
            .revparse_single(revision)
            .map_err(|_| Error::RevisionNotFound {
                revision: revision.to_string(),
                path: path.to_path_buf(),
            })?;
        let commit = object.peel(ObjectType::Commit)?;

        let mut checkout = CheckoutBuilder::new();
        if force {
            checkout.force();
        } else {
            checkout.safe();
        }
        repo.checkout_tree(&commit, Some(&mut checkout))?;
        repo.set_head_detached(commit.id())?;
        Ok(())
    }

    fn head_revision(&self, path: &Path) -> Result<String> {
        let repo = Repository::open(path)?;
        let commit = repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    fn working_tree_changed(&self, path: &Path) -> Result<bool> {
        let repo = Repository::open(path)?;
        let mut options = StatusOptions::new();
        // untracked and ignored files do not block a checkout
        options.include_untracked(false).include_ignored(false);
        let statuses = repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }
}

impl VcsProvider for GitVcs {
    fn clone_repo(&self, url: &str, path: &Path) -> ProviderResult<()> {
        self.clone_into(url, path)
            .map_err(|e| ProviderError::new(e.to_string()))
    }

    fn fetch(&self, path: &Path, url: &str) -> ProviderResult<()> {
        self.fetch_from(path, url)
            .map_err(|e| ProviderError::new(e.to_string()))
    }

    fn checkout(&self, path: &Path, revision: &str, force: bool) -> ProviderResult<()> {
        self.checkout_revision(path, revision, force)
            .map_err(|e| ProviderError::new(e.to_string()))
    }

    fn current_revision(&self, path: &Path) -> ProviderResult<String> {
        self.head_revision(path)
            .map_err(|e| ProviderError::new(e.to_string()))
    }

    fn is_valid_checkout(&self, path: &Path) -> bool {
        Repository::open(path).is_ok()
    }

    fn has_local_changes(&self, path: &Path) -> ProviderResult<bool> {
        self.working_tree_changed(path)
            .map_err(|e| ProviderError::new(e.to_string()))
    }
}
