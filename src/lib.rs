//! filetree-rs - Lazy, paginated file tree navigation for remote repositories.
//!
//! A sidebar shows one directory at a time as a [`FileTreeProvider`]. Expanding
//! an entry or moving to the parent loads a new provider through a
//! [`TreeLoader`]; providers are never mutated, and large directories end in a
//! [`VisibleEntry::Limit`] marker instead of being silently cut off.

pub mod config;
pub mod fetcher;
pub mod loader;
pub mod navigator;
pub mod tree;

pub use fetcher::{
    DEFAULT_MAX_ENTRIES, EntryFetcher, GraphqlFetcher, MemoryFetcher, ResolutionError,
};
pub use loader::{FetcherLoader, LoadRequest, TreeLoader, create_loader, open_file_tree};
pub use navigator::{Navigation, TreeNavigator};
pub use tree::{
    DirectoryNode, FileTreeProvider, NODE_LIMIT_ID, Provenance, ProviderId, TreeEntry, TreeError,
    UsageError, VisibleEntry,
};
