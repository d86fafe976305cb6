use std::num::NonZeroUsize;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tree::{CommitId, DirectoryEntry, DirectoryNode, FileEntry, RepoId, TreeEntry};

use super::entry_fetcher::{EntryFetcher, ResolutionError, Result};

/// Default path of the GraphQL endpoint relative to the base URL.
pub const DEFAULT_GRAPHQL_PATH: &str = "/.api/graphql";

const TREE_ENTRIES_QUERY: &str = r#"
query TreeEntries($repoID: ID!, $commitID: String!, $filePath: String!, $first: Int) {
    node(id: $repoID) {
        __typename
        id
        ... on Repository {
            commit(rev: $commitID) {
                ...GitCommitFieldsWithTree
            }
        }
    }
}

fragment GitCommitFieldsWithTree on GitCommit {
    id
    tree(path: $filePath) {
        canonicalURL
        isRoot
        name
        path
        isDirectory
        entries(first: $first) {
            canonicalURL
            name
            path
            isDirectory
            ... on GitBlob {
                languages
            }
        }
    }
}
"#;

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TreeEntriesVariables<'a> {
    #[serde(rename = "repoID")]
    repo_id: &'a str,
    #[serde(rename = "commitID")]
    commit_id: &'a str,
    file_path: &'a str,
    first: usize,
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'static str,
    variables: TreeEntriesVariables<'a>,
}

#[derive(Deserialize)]
struct GraphqlResponse {
    data: Option<TreeEntriesData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct TreeEntriesData {
    node: Option<NodeFields>,
}

#[derive(Deserialize)]
struct NodeFields {
    #[serde(rename = "__typename")]
    typename: String,
    commit: Option<CommitFields>,
}

#[derive(Deserialize)]
struct CommitFields {
    tree: Option<TreeFields>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeFields {
    #[serde(rename = "canonicalURL")]
    canonical_url: String,
    is_root: bool,
    name: String,
    path: String,
    is_directory: bool,
    #[serde(default)]
    entries: Vec<EntryFields>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryFields {
    #[serde(rename = "canonicalURL")]
    canonical_url: String,
    name: String,
    path: String,
    is_directory: bool,
    #[serde(default)]
    languages: Option<Vec<String>>,
}

impl From<EntryFields> for TreeEntry {
    fn from(e: EntryFields) -> Self {
        if e.is_directory {
            TreeEntry::Directory(DirectoryEntry {
                path: e.path,
                name: e.name,
                canonical_url: e.canonical_url,
            })
        } else {
            TreeEntry::File(FileEntry {
                path: e.path,
                name: e.name,
                canonical_url: e.canonical_url,
                languages: e.languages.unwrap_or_default(),
            })
        }
    }
}

/// Map a decoded `TreeEntries` response to a directory node.
fn tree_from_response(
    response: GraphqlResponse,
    repo_id: &RepoId,
    commit_id: &CommitId,
    path: &str,
) -> Result<DirectoryNode> {
    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(ResolutionError::Transport(messages.join("; ")));
    }

    let node = response
        .data
        .and_then(|d| d.node)
        .filter(|n| n.typename == "Repository")
        .ok_or_else(|| ResolutionError::RepositoryNotFound {
            repo_id: repo_id.clone(),
        })?;
    let commit = node.commit.ok_or_else(|| ResolutionError::CommitNotFound {
        repo_id: repo_id.clone(),
        commit_id: commit_id.clone(),
    })?;
    let tree = commit.tree.ok_or_else(|| ResolutionError::PathNotFound {
        path: path.to_string(),
    })?;
    if !tree.is_directory {
        return Err(ResolutionError::NotADirectory { path: tree.path });
    }

    Ok(DirectoryNode {
        path: tree.path,
        name: tree.name,
        is_root: tree.is_root,
        canonical_url: tree.canonical_url,
        entries: tree.entries.into_iter().map(TreeEntry::from).collect(),
    })
}

/// Parse a raw `TreeEntries` response body.
pub fn parse_tree_entries_response(
    body: &[u8],
    repo_id: &RepoId,
    commit_id: &CommitId,
    path: &str,
) -> Result<DirectoryNode> {
    let response: GraphqlResponse = serde_json::from_slice(body)
        .map_err(|e| ResolutionError::Transport(format!("failed to parse response: {}", e)))?;
    tree_from_response(response, repo_id, commit_id, path)
}

// =============================================================================
// GraphqlFetcher
// =============================================================================

/// An `EntryFetcher` backed by a code host's GraphQL API.
pub struct GraphqlFetcher {
    client: Client,
    endpoint: String,
    access_token: Option<String>,
}

impl GraphqlFetcher {
    /// Create a fetcher for the given base URL, using the default GraphQL path.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, DEFAULT_GRAPHQL_PATH)
    }

    /// Create a fetcher with a custom reqwest client and GraphQL path.
    pub fn with_client(client: Client, base_url: impl Into<String>, graphql_path: &str) -> Self {
        Self {
            client,
            endpoint: endpoint_url(&base_url.into(), graphql_path),
            access_token: None,
        }
    }

    /// Create a fetcher whose requests time out after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        graphql_path: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResolutionError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url, graphql_path))
    }

    /// Send `Authorization: token <access_token>` with every request.
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn endpoint_url(base_url: &str, graphql_path: &str) -> String {
    format!(
        "{}/{}?TreeEntries",
        base_url.trim_end_matches('/'),
        graphql_path.trim_start_matches('/')
    )
}

impl EntryFetcher for GraphqlFetcher {
    async fn fetch_tree(
        &self,
        repo_id: &RepoId,
        commit_id: &CommitId,
        path: &str,
        max_entries: NonZeroUsize,
    ) -> Result<DirectoryNode> {
        let body = GraphqlRequest {
            query: TREE_ENTRIES_QUERY,
            variables: TreeEntriesVariables {
                repo_id,
                commit_id,
                file_path: path,
                first: max_entries.get(),
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(ref token) = self.access_token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("token {}", token));
        }

        debug!(
            endpoint = %self.endpoint,
            repo_id = %repo_id,
            commit_id = %commit_id,
            path,
            "fetching tree entries"
        );
        let response = request
            .send()
            .await
            .map_err(|e| ResolutionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolutionError::Transport(format!(
                "unexpected status code: {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ResolutionError::Transport(e.to_string()))?;
        parse_tree_entries_response(&bytes, repo_id, commit_id, path)
    }
}
