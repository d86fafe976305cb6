//! Loader construction from configuration.

use std::sync::Arc;

use thiserror::Error;

use crate::config::Config;
use crate::fetcher::GraphqlFetcher;

use super::FetcherLoader;

/// Errors that can occur while building a loader from configuration.
#[derive(Debug, Error)]
pub enum CreateLoaderError {
    /// `endpoint.url` is not set.
    #[error("no endpoint URL configured (set endpoint.url)")]
    MissingEndpointUrl,

    /// The endpoint URL is not an http(s) URL.
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// The HTTP client could not be created.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, CreateLoaderError>;

/// Build a GraphQL-backed loader from the `[endpoint]` and `[tree]` sections.
pub fn create_loader(config: &Config) -> Result<Arc<FetcherLoader<GraphqlFetcher>>> {
    let url = config
        .endpoint
        .url
        .as_deref()
        .ok_or(CreateLoaderError::MissingEndpointUrl)?;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(CreateLoaderError::UnsupportedScheme(url.to_string()));
    }

    let mut fetcher =
        GraphqlFetcher::with_timeout(url, &config.endpoint.graphql_path, config.endpoint.timeout())
            .map_err(|e| CreateLoaderError::Client(e.to_string()))?;
    if let Some(ref token) = config.endpoint.access_token {
        fetcher = fetcher.with_access_token(token.clone());
    }

    Ok(Arc::new(FetcherLoader::with_max_entries(
        fetcher,
        config.tree.max_entries,
    )))
}
