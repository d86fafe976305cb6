//! The navigable view of one directory.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::loader::{LoadRequest, TreeLoader};

use super::{
    CommitId, DirectoryNode, RepoId, Result, TreeEntry, UsageError, VisibleEntry, parent_path,
};

static NEXT_PROVIDER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a [`FileTreeProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderId(u64);

impl ProviderId {
    fn next() -> Self {
        ProviderId(NEXT_PROVIDER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a provider came to exist, which decides whether it shows an up-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Loaded without parent context at the repository root.
    Root,
    /// Produced by expanding an entry of another provider.
    ExpandedFrom(ProviderId),
    /// Loaded without parent context below the root (deep link or parent
    /// navigation).
    FreshLookup,
}

/// Construction inputs for a [`FileTreeProvider`].
pub struct ProviderArgs {
    /// The fetched directory, including its children.
    pub root: DirectoryNode,
    pub repo_id: RepoId,
    pub commit_id: CommitId,
    /// Loader used for every navigation out of this provider.
    pub loader: Arc<dyn TreeLoader>,
    /// The provider whose entry was expanded to produce this one.
    pub parent: Option<ProviderId>,
    /// The cap the directory was fetched with.
    pub max_entries: NonZeroUsize,
}

/// An immutable, navigable snapshot of one directory at a pinned commit.
///
/// Navigation never mutates a provider: [`fetch_children`] and
/// [`fetch_parent`] go through the loader and return a new provider, so a
/// failed navigation leaves the current one intact.
///
/// [`fetch_children`]: FileTreeProvider::fetch_children
/// [`fetch_parent`]: FileTreeProvider::fetch_parent
pub struct FileTreeProvider {
    id: ProviderId,
    root: DirectoryNode,
    repo_id: RepoId,
    commit_id: CommitId,
    loader: Arc<dyn TreeLoader>,
    provenance: Provenance,
    max_entries: NonZeroUsize,
    /// The up-entry followed by the children (and limit marker, if any).
    entries: Vec<VisibleEntry>,
}

impl FileTreeProvider {
    /// Create a provider, computing its visible entries once.
    ///
    /// A [`VisibleEntry::Limit`] is appended when the directory holds at least
    /// `max_entries` children. Without parent context below the root, the
    /// directory itself is prepended as an up-entry.
    pub fn new(args: ProviderArgs) -> Self {
        let provenance = match args.parent {
            Some(parent) => Provenance::ExpandedFrom(parent),
            None if args.root.is_root => Provenance::Root,
            None => Provenance::FreshLookup,
        };

        let cap = args.max_entries.get();
        let count = args.root.entries.len();
        if count > cap {
            warn!(
                path = %args.root.path,
                count,
                cap,
                "fetcher returned more entries than requested; truncating"
            );
        }

        let mut entries = Vec::with_capacity(count.min(cap) + 2);
        entries.push(VisibleEntry::Entry(args.root.as_entry()));
        entries.extend(
            args.root
                .entries
                .iter()
                .take(cap)
                .cloned()
                .map(VisibleEntry::Entry),
        );
        if count >= cap {
            entries.push(VisibleEntry::Limit);
        }

        Self {
            id: ProviderId::next(),
            root: args.root,
            repo_id: args.repo_id,
            commit_id: args.commit_id,
            loader: args.loader,
            provenance,
            max_entries: args.max_entries,
            entries,
        }
    }

    pub fn id(&self) -> ProviderId {
        self.id
    }

    /// The directory this provider shows.
    pub fn root(&self) -> &DirectoryNode {
        &self.root
    }

    pub fn repo_id(&self) -> &RepoId {
        &self.repo_id
    }

    pub fn commit_id(&self) -> &CommitId {
        &self.commit_id
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn max_entries(&self) -> NonZeroUsize {
        self.max_entries
    }

    /// The entries to display, in order.
    ///
    /// For a [`Provenance::FreshLookup`] provider the first element is the
    /// directory itself, offered as an up-navigation target.
    pub fn get_entries(&self) -> &[VisibleEntry] {
        match self.provenance {
            Provenance::Root | Provenance::ExpandedFrom(_) => self.children(),
            Provenance::FreshLookup => &self.entries,
        }
    }

    /// The directory's children, without any up-entry.
    pub fn children(&self) -> &[VisibleEntry] {
        &self.entries[1..]
    }

    /// Whether the child list was cut off at the cap.
    pub fn is_truncated(&self) -> bool {
        self.entries.last().is_some_and(VisibleEntry::is_limit)
    }

    /// Load the provider for an expandable entry of this one.
    ///
    /// Returns [`UsageError`] without calling the loader if `entry` is not
    /// expandable.
    pub async fn fetch_children(&self, entry: &VisibleEntry) -> Result<FileTreeProvider> {
        if !self.is_expandable(entry) {
            return Err(UsageError {
                node_id: entry.node_id().to_string(),
            }
            .into());
        }

        let request = LoadRequest {
            repo_id: self.repo_id.clone(),
            commit_id: self.commit_id.clone(),
            path: entry.node_id().to_string(),
            parent: Some(self.id),
        };
        Ok(Arc::clone(&self.loader).load(request).await?)
    }

    /// Load the parent directory with a fresh lookup.
    ///
    /// The result carries no parent context. At the repository root this
    /// reloads the root.
    pub async fn fetch_parent(&self) -> Result<FileTreeProvider> {
        self.fetch_path(parent_path(&self.root.path)).await
    }

    /// Load an arbitrary directory of the same repository and commit with a
    /// fresh lookup.
    pub async fn fetch_path(&self, path: &str) -> Result<FileTreeProvider> {
        let request = LoadRequest {
            repo_id: self.repo_id.clone(),
            commit_id: self.commit_id.clone(),
            path: path.to_string(),
            parent: None,
        };
        Ok(Arc::clone(&self.loader).load(request).await?)
    }

    /// Stable identifier of `entry` within this provider's entry list.
    pub fn get_node_id<'a>(&self, entry: &'a VisibleEntry) -> &'a str {
        entry.node_id()
    }

    /// True for directories other than the up-entry.
    pub fn is_expandable(&self, entry: &VisibleEntry) -> bool {
        match entry {
            VisibleEntry::Limit => false,
            VisibleEntry::Entry(e) => e.is_directory() && !self.is_up_entry(e),
        }
    }

    /// True for everything except the limit marker.
    pub fn is_selectable(&self, entry: &VisibleEntry) -> bool {
        !entry.is_limit()
    }

    /// Whether `entry` describes this provider's own directory.
    pub fn is_up_entry(&self, entry: &TreeEntry) -> bool {
        entry.path() == self.root.path
    }
}

impl fmt::Debug for FileTreeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTreeProvider")
            .field("id", &self.id)
            .field("repo_id", &self.repo_id)
            .field("commit_id", &self.commit_id)
            .field("path", &self.root.path)
            .field("provenance", &self.provenance)
            .field("entries", &self.get_entries().len())
            .finish()
    }
}
