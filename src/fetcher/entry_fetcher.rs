use std::future::Future;
use std::num::NonZeroUsize;

use thiserror::Error;

use crate::tree::{CommitId, DirectoryNode, RepoId};

/// Default maximum number of children fetched per directory.
pub const DEFAULT_MAX_ENTRIES: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Error type for resolving a (repository, commit, path) triple.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The repository does not exist or is not visible.
    #[error("repository not found: {repo_id}")]
    RepositoryNotFound { repo_id: RepoId },

    /// The commit cannot be resolved on the repository.
    #[error("commit {commit_id} not found in repository {repo_id}")]
    CommitNotFound { repo_id: RepoId, commit_id: CommitId },

    /// Nothing exists at the path.
    #[error("path not found: {path:?}")]
    PathNotFound { path: String },

    /// The path exists but names a file.
    #[error("path is not a directory: {path:?}")]
    NotADirectory { path: String },

    /// The request could not be completed.
    #[error("unable to fetch directory contents: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, ResolutionError>;

/// Source of directory listings for a repository at a pinned commit.
///
/// Implementations turn a (repository, commit, path) triple into a
/// [`DirectoryNode`] holding at most `max_entries` immediate children.
pub trait EntryFetcher: Send + Sync {
    /// Fetch the directory at `path` (empty string for the root).
    ///
    /// Returns `ResolutionError` if the repository, commit, or path cannot
    /// be resolved, or if the path is not a directory.
    fn fetch_tree(
        &self,
        repo_id: &RepoId,
        commit_id: &CommitId,
        path: &str,
        max_entries: NonZeroUsize,
    ) -> impl Future<Output = Result<DirectoryNode>> + Send;
}
