//! Active-directory tracking with last-request-wins ordering.
//!
//! A [`TreeNavigator`] holds the provider a sidebar is currently showing.
//! Every navigation takes a sequence number when it starts; when its load
//! finishes, the result is applied only if no later navigation has started in
//! the meantime. Stale results, successful or not, are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::fetcher::ResolutionError;
use crate::loader::{TreeLoader, open_file_tree};
use crate::tree::{CommitId, FileTreeProvider, RepoId, Result, UsageError, VisibleEntry};

/// Outcome of a navigation that did not fail.
#[derive(Debug)]
pub enum Navigation {
    /// The new provider is now active.
    Applied(Arc<FileTreeProvider>),
    /// A newer navigation started before this one finished; its result was
    /// discarded.
    Superseded,
}

impl Navigation {
    pub fn applied(&self) -> Option<&Arc<FileTreeProvider>> {
        match self {
            Navigation::Applied(provider) => Some(provider),
            Navigation::Superseded => None,
        }
    }
}

/// Owner of a sidebar's active provider.
pub struct TreeNavigator {
    current: RwLock<Arc<FileTreeProvider>>,
    /// Sequence number of the most recently started navigation.
    sequence: AtomicU64,
}

impl TreeNavigator {
    pub fn new(provider: FileTreeProvider) -> Self {
        Self {
            current: RwLock::new(Arc::new(provider)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Load the initial directory and start navigating from it.
    pub async fn open(
        loader: Arc<dyn TreeLoader>,
        repo_id: impl Into<RepoId>,
        commit_id: impl Into<CommitId>,
        path: impl Into<String>,
    ) -> std::result::Result<Self, ResolutionError> {
        let provider = open_file_tree(loader, repo_id, commit_id, path).await?;
        Ok(Self::new(provider))
    }

    /// The provider currently shown.
    pub fn current(&self) -> Arc<FileTreeProvider> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Expand an entry of the current provider.
    ///
    /// Non-expandable entries are rejected with [`UsageError`] before any
    /// load starts.
    pub async fn expand(&self, entry: &VisibleEntry) -> Result<Navigation> {
        let current = self.current();
        if !current.is_expandable(entry) {
            return Err(UsageError {
                node_id: entry.node_id().to_string(),
            }
            .into());
        }

        let ticket = self.begin();
        let result = current.fetch_children(entry).await;
        self.finish(ticket, result)
    }

    /// Replace the current provider with a fresh lookup of its parent.
    pub async fn go_to_parent(&self) -> Result<Navigation> {
        let current = self.current();
        let ticket = self.begin();
        let result = current.fetch_parent().await;
        self.finish(ticket, result)
    }

    /// Jump to an arbitrary directory of the same repository and commit.
    pub async fn navigate_to(&self, path: &str) -> Result<Navigation> {
        let current = self.current();
        let ticket = self.begin();
        let result = current.fetch_path(path).await;
        self.finish(ticket, result)
    }

    fn begin(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn finish(&self, ticket: u64, result: Result<FileTreeProvider>) -> Result<Navigation> {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let latest = self.sequence.load(Ordering::SeqCst);
        if ticket != latest {
            debug!(
                ticket,
                latest,
                failed = result.is_err(),
                "discarding superseded navigation"
            );
            return Ok(Navigation::Superseded);
        }

        let provider = Arc::new(result?);
        *current = Arc::clone(&provider);
        Ok(Navigation::Applied(provider))
    }
}
