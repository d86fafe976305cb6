use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use crate::tree::{
    CommitId, DirectoryEntry, DirectoryNode, FileEntry, RepoId, TreeEntry, base_name,
    parent_path,
};

use super::entry_fetcher::{EntryFetcher, ResolutionError, Result};

/// A node stored in an in-memory commit tree.
#[derive(Debug, Clone)]
enum MemoryNode {
    Directory,
    File { languages: Vec<String> },
}

/// Full tree of one commit, keyed by normalized path. The root is `""`.
type MemoryTree = BTreeMap<String, MemoryNode>;

/// One call made to [`MemoryFetcher::fetch_tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub repo_id: RepoId,
    pub commit_id: CommitId,
    pub path: String,
    pub max_entries: usize,
}

/// An in-memory implementation of `EntryFetcher`, intended primarily for testing.
///
/// Children are listed directories first, then files, each group ordered by
/// name. Every request is recorded and can be inspected with
/// [`MemoryFetcher::requests`].
pub struct MemoryFetcher {
    repos: HashMap<RepoId, HashMap<CommitId, MemoryTree>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl MemoryFetcher {
    /// Start building a new in-memory fetcher.
    pub fn builder() -> MemoryFetcherBuilder {
        MemoryFetcherBuilder::new()
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn record(&self, request: FetchRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }
}

fn commit_url(repo_id: &str, commit_id: &str) -> String {
    format!("/{}@{}", repo_id, commit_id)
}

fn list_children(
    tree: &MemoryTree,
    base_url: &str,
    dir_path: &str,
    max_entries: NonZeroUsize,
) -> Vec<TreeEntry> {
    let mut directories = Vec::new();
    let mut files = Vec::new();

    // Siblings share a prefix, so path order within one directory is name order.
    for (path, node) in tree {
        if path.is_empty() || parent_path(path) != dir_path {
            continue;
        }
        match node {
            MemoryNode::Directory => directories.push(TreeEntry::Directory(DirectoryEntry {
                path: path.clone(),
                name: base_name(path).to_string(),
                canonical_url: format!("{}/-/tree/{}", base_url, path),
            })),
            MemoryNode::File { languages } => files.push(TreeEntry::File(FileEntry {
                path: path.clone(),
                name: base_name(path).to_string(),
                canonical_url: format!("{}/-/blob/{}", base_url, path),
                languages: languages.clone(),
            })),
        }
    }

    directories
        .into_iter()
        .chain(files)
        .take(max_entries.get())
        .collect()
}

impl EntryFetcher for MemoryFetcher {
    async fn fetch_tree(
        &self,
        repo_id: &RepoId,
        commit_id: &CommitId,
        path: &str,
        max_entries: NonZeroUsize,
    ) -> Result<DirectoryNode> {
        self.record(FetchRequest {
            repo_id: repo_id.clone(),
            commit_id: commit_id.clone(),
            path: path.to_string(),
            max_entries: max_entries.get(),
        });

        let commits = self
            .repos
            .get(repo_id)
            .ok_or_else(|| ResolutionError::RepositoryNotFound {
                repo_id: repo_id.clone(),
            })?;
        let tree = commits
            .get(commit_id)
            .ok_or_else(|| ResolutionError::CommitNotFound {
                repo_id: repo_id.clone(),
                commit_id: commit_id.clone(),
            })?;

        let path = path.trim_matches('/');
        match tree.get(path) {
            None => {
                return Err(ResolutionError::PathNotFound {
                    path: path.to_string(),
                });
            }
            Some(MemoryNode::File { .. }) => {
                return Err(ResolutionError::NotADirectory {
                    path: path.to_string(),
                });
            }
            Some(MemoryNode::Directory) => {}
        }

        let base_url = commit_url(repo_id, commit_id);
        let canonical_url = if path.is_empty() {
            base_url.clone()
        } else {
            format!("{}/-/tree/{}", base_url, path)
        };

        Ok(DirectoryNode {
            path: path.to_string(),
            name: base_name(path).to_string(),
            is_root: path.is_empty(),
            canonical_url,
            entries: list_children(tree, &base_url, path, max_entries),
        })
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`MemoryFetcher`].
///
/// Parent directories of added paths are created implicitly.
#[derive(Default)]
pub struct MemoryFetcherBuilder {
    repos: HashMap<RepoId, HashMap<CommitId, MemoryTree>>,
}

impl MemoryFetcherBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit with an empty tree (only the root directory).
    pub fn commit(mut self, repo_id: &str, commit_id: &str) -> Self {
        self.tree_mut(repo_id, commit_id);
        self
    }

    /// Add a file with its detected languages.
    pub fn file(mut self, repo_id: &str, commit_id: &str, path: &str, languages: &[&str]) -> Self {
        let languages = languages.iter().map(|l| l.to_string()).collect();
        self.insert(repo_id, commit_id, path, MemoryNode::File { languages });
        self
    }

    /// Add a directory, which may stay empty.
    pub fn directory(mut self, repo_id: &str, commit_id: &str, path: &str) -> Self {
        self.insert(repo_id, commit_id, path, MemoryNode::Directory);
        self
    }

    pub fn build(self) -> MemoryFetcher {
        MemoryFetcher {
            repos: self.repos,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn tree_mut(&mut self, repo_id: &str, commit_id: &str) -> &mut MemoryTree {
        self.repos
            .entry(repo_id.to_string())
            .or_default()
            .entry(commit_id.to_string())
            .or_insert_with(|| BTreeMap::from([(String::new(), MemoryNode::Directory)]))
    }

    fn insert(&mut self, repo_id: &str, commit_id: &str, path: &str, node: MemoryNode) {
        let tree = self.tree_mut(repo_id, commit_id);
        let path = path.trim_matches('/');
        if path.is_empty() {
            return;
        }

        let mut ancestor = parent_path(path);
        while !ancestor.is_empty() {
            tree.entry(ancestor.to_string())
                .or_insert(MemoryNode::Directory);
            ancestor = parent_path(ancestor);
        }
        tree.insert(path.to_string(), node);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn max(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn sample() -> MemoryFetcher {
        MemoryFetcher::builder()
            .file("repo", "c1", "b.go", &["Go"])
            .file("repo", "c1", "a/x.rs", &["Rust"])
            .file("repo", "c1", "c.md", &["Markdown"])
            .directory("repo", "c1", "z/empty")
            .build()
    }

    #[tokio::test]
    async fn test_fetch_root_lists_directories_first() {
        let fetcher = sample();
        let node = fetcher
            .fetch_tree(&"repo".to_string(), &"c1".to_string(), "", max(1000))
            .await
            .unwrap();

        assert!(node.is_root);
        assert_eq!(node.path, "");
        assert_eq!(node.canonical_url, "/repo@c1");
        let paths: Vec<&str> = node.entries.iter().map(|e| e.path()).collect();
        assert_eq!(paths, vec!["a", "z", "b.go", "c.md"]);
        assert!(node.entries[0].is_directory());
        assert_eq!(node.entries[0].canonical_url(), "/repo@c1/-/tree/a");
        assert_eq!(node.entries[2].canonical_url(), "/repo@c1/-/blob/b.go");
        match &node.entries[2] {
            TreeEntry::File(f) => assert_eq!(f.languages, vec!["Go".to_string()]),
            other => panic!("expected file, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_nested_directory() {
        let fetcher = sample();
        let node = fetcher
            .fetch_tree(&"repo".to_string(), &"c1".to_string(), "z", max(1000))
            .await
            .unwrap();

        assert!(!node.is_root);
        assert_eq!(node.name, "z");
        assert_eq!(node.entries.len(), 1);
        assert_eq!(node.entries[0].path(), "z/empty");

        let empty = fetcher
            .fetch_tree(&"repo".to_string(), &"c1".to_string(), "z/empty", max(1000))
            .await
            .unwrap();
        assert!(empty.entries.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_respects_max_entries() {
        let fetcher = sample();
        let node = fetcher
            .fetch_tree(&"repo".to_string(), &"c1".to_string(), "", max(2))
            .await
            .unwrap();
        assert_eq!(node.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_resolution_errors() {
        let fetcher = sample();
        let repo = "repo".to_string();
        let commit = "c1".to_string();

        let result = fetcher
            .fetch_tree(&"missing".to_string(), &commit, "", max(10))
            .await;
        assert!(matches!(
            result,
            Err(ResolutionError::RepositoryNotFound { .. })
        ));

        let result = fetcher
            .fetch_tree(&repo, &"c2".to_string(), "", max(10))
            .await;
        assert!(matches!(result, Err(ResolutionError::CommitNotFound { .. })));

        let result = fetcher.fetch_tree(&repo, &commit, "nope", max(10)).await;
        assert_eq!(
            result,
            Err(ResolutionError::PathNotFound {
                path: "nope".to_string()
            })
        );

        let result = fetcher.fetch_tree(&repo, &commit, "b.go", max(10)).await;
        assert_eq!(
            result,
            Err(ResolutionError::NotADirectory {
                path: "b.go".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_requests_are_recorded() {
        let fetcher = sample();
        assert_eq!(fetcher.request_count(), 0);

        let _ = fetcher
            .fetch_tree(&"repo".to_string(), &"c1".to_string(), "a", max(5))
            .await;
        let _ = fetcher
            .fetch_tree(&"repo".to_string(), &"c1".to_string(), "nope", max(5))
            .await;

        assert_eq!(
            fetcher.requests(),
            vec![
                FetchRequest {
                    repo_id: "repo".to_string(),
                    commit_id: "c1".to_string(),
                    path: "a".to_string(),
                    max_entries: 5,
                },
                FetchRequest {
                    repo_id: "repo".to_string(),
                    commit_id: "c1".to_string(),
                    path: "nope".to_string(),
                    max_entries: 5,
                },
            ]
        );
    }
}
