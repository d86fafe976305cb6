//! Entry fetchers: the transport boundary that turns a (repository, commit,
//! path) triple into a directory listing.

mod entry_fetcher;
mod graphql_fetcher;
mod memory_fetcher;

pub use entry_fetcher::{DEFAULT_MAX_ENTRIES, EntryFetcher, ResolutionError, Result};
pub use graphql_fetcher::{DEFAULT_GRAPHQL_PATH, GraphqlFetcher, parse_tree_entries_response};
pub use memory_fetcher::{FetchRequest, MemoryFetcher, MemoryFetcherBuilder};
