//! Revision-pinned directory model and the navigable provider built on it.
//!
//! A [`FileTreeProvider`] shows one directory: its node, the visible entry
//! list (children, an optional up-entry, and an optional
//! [`VisibleEntry::Limit`] marker), and the coordinates needed to load
//! neighbouring directories through a [`TreeLoader`](crate::loader::TreeLoader).

mod entry;
mod error;
mod provider;
mod visible_entry;

pub use entry::{
    CommitId, DirectoryEntry, DirectoryNode, FileEntry, RepoId, TreeEntry, base_name, parent_path,
};
pub use error::{Result, TreeError, UsageError};
pub use provider::{FileTreeProvider, Provenance, ProviderArgs, ProviderId};
pub use visible_entry::{NODE_LIMIT_ID, VisibleEntry};
