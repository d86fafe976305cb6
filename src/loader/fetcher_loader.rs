use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::fetcher::{DEFAULT_MAX_ENTRIES, EntryFetcher, Result};
use crate::tree::{FileTreeProvider, ProviderArgs};

use super::{LoadRequest, TreeLoader};

/// A [`TreeLoader`] that fetches directories through an [`EntryFetcher`].
///
/// Every fetch is bounded by `max_entries`; providers it creates append the
/// limit marker when a fetch comes back full.
pub struct FetcherLoader<F> {
    fetcher: F,
    max_entries: NonZeroUsize,
}

impl<F: EntryFetcher> FetcherLoader<F> {
    /// Create a loader using the default cap of 1000 entries.
    pub fn new(fetcher: F) -> Self {
        Self::with_max_entries(fetcher, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(fetcher: F, max_entries: NonZeroUsize) -> Self {
        Self {
            fetcher,
            max_entries,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn max_entries(&self) -> NonZeroUsize {
        self.max_entries
    }
}

#[async_trait]
impl<F: EntryFetcher + 'static> TreeLoader for FetcherLoader<F> {
    async fn load(self: Arc<Self>, request: LoadRequest) -> Result<FileTreeProvider> {
        let root = self
            .fetcher
            .fetch_tree(
                &request.repo_id,
                &request.commit_id,
                &request.path,
                self.max_entries,
            )
            .await?;

        debug!(
            repo_id = %request.repo_id,
            commit_id = %request.commit_id,
            path = %request.path,
            entries = root.entries.len(),
            truncated = root.entries.len() >= self.max_entries.get(),
            expanded = request.parent.is_some(),
            "loaded directory"
        );

        let max_entries = self.max_entries;
        let loader: Arc<dyn TreeLoader> = self;
        Ok(FileTreeProvider::new(ProviderArgs {
            root,
            repo_id: request.repo_id,
            commit_id: request.commit_id,
            loader,
            parent: request.parent,
            max_entries,
        }))
    }
}
