use thiserror::Error;

use crate::fetcher::ResolutionError;

/// A navigation was requested on an entry that cannot be expanded.
///
/// This is a caller defect: navigation code must check
/// `FileTreeProvider::is_expandable` first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot fetch children for non-expandable tree entry '{node_id}'")]
pub struct UsageError {
    /// Node ID of the rejected entry.
    pub node_id: String,
}

/// Error type for tree navigation operations.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The caller asked to expand a non-expandable entry.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// The repository, commit, or path could not be loaded.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

pub type Result<T> = std::result::Result<T, TreeError>;
