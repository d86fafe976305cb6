use std::sync::Arc;

use async_trait::async_trait;

use crate::fetcher::Result;
use crate::tree::{CommitId, FileTreeProvider, ProviderId, RepoId};

/// A request to load one directory as a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub repo_id: RepoId,
    pub commit_id: CommitId,
    /// Slash-separated directory path; empty for the root.
    pub path: String,
    /// The provider that asked for this load when expanding one of its
    /// entries. Attached to the result as-is.
    pub parent: Option<ProviderId>,
}

/// Factory that turns a load request into a ready-to-use provider.
///
/// Each provider holds the loader that created it and uses it for all
/// further navigation, so it never talks to the transport directly.
#[async_trait]
pub trait TreeLoader: Send + Sync {
    /// Fetch the requested directory and wrap it in a new provider.
    ///
    /// Resolution failures are returned unchanged; nothing is retried.
    async fn load(self: Arc<Self>, request: LoadRequest) -> Result<FileTreeProvider>;
}

/// Load the initial provider for a sidebar, without parent context.
pub async fn open_file_tree(
    loader: Arc<dyn TreeLoader>,
    repo_id: impl Into<RepoId>,
    commit_id: impl Into<CommitId>,
    path: impl Into<String>,
) -> Result<FileTreeProvider> {
    loader
        .load(LoadRequest {
            repo_id: repo_id.into(),
            commit_id: commit_id.into(),
            path: path.into(),
            parent: None,
        })
        .await
}
