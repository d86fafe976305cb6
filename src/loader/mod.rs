//! Loaders bind an entry fetcher to provider construction.

mod create_loader;
mod fetcher_loader;
mod tree_loader;

pub use create_loader::{CreateLoaderError, create_loader};
pub use fetcher_loader::FetcherLoader;
pub use tree_loader::{LoadRequest, TreeLoader, open_file_tree};
