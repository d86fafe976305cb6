//! Configuration types for filetree-rs.
//!
//! This module defines the structures used to represent configuration as
//! parsed from an INI-format config file.

use std::num::NonZeroUsize;
use std::time::Duration;

/// [tree] section - how directories are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Maximum number of children fetched per directory.
    pub max_entries: NonZeroUsize,
}

/// [endpoint] section - the GraphQL API serving tree entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Base URL of the code host. Required to build a network loader.
    pub url: Option<String>,
    pub access_token: Option<String>,
    /// Path of the GraphQL endpoint relative to `url`.
    pub graphql_path: String,
    pub timeout_seconds: u64,
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Complete configuration as parsed from config files and overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tree: TreeConfig,
    pub endpoint: EndpointConfig,
}
