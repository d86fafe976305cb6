//! Directory and entry types for a repository tree at a pinned revision.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a repository, passed through unchanged to the fetcher.
pub type RepoId = String;

/// Opaque identifier of a commit within a repository.
pub type CommitId = String;

/// A subdirectory listed as a child of a [`DirectoryNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Slash-separated path from the repository root.
    pub path: String,
    /// Last path component.
    pub name: String,
    /// Stable locator for this directory.
    pub canonical_url: String,
}

/// A file (blob) listed as a child of a [`DirectoryNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Slash-separated path from the repository root.
    pub path: String,
    /// Last path component.
    pub name: String,
    /// Stable locator for this file.
    pub canonical_url: String,
    /// Languages detected for this file. May be empty.
    pub languages: Vec<String>,
}

/// One child of a directory: either a subdirectory or a file.
///
/// Entries are immutable once fetched. Their identity is the path, which is
/// unique among siblings for a fixed repository and commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeEntry {
    /// A subdirectory.
    Directory(DirectoryEntry),
    /// A file.
    File(FileEntry),
}

impl TreeEntry {
    /// Get the path of this entry.
    pub fn path(&self) -> &str {
        match self {
            TreeEntry::Directory(d) => &d.path,
            TreeEntry::File(f) => &f.path,
        }
    }

    /// Get the name of this entry.
    pub fn name(&self) -> &str {
        match self {
            TreeEntry::Directory(d) => &d.name,
            TreeEntry::File(f) => &f.name,
        }
    }

    /// Get the canonical URL of this entry.
    pub fn canonical_url(&self) -> &str {
        match self {
            TreeEntry::Directory(d) => &d.canonical_url,
            TreeEntry::File(f) => &f.canonical_url,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, TreeEntry::Directory(_))
    }
}

/// A directory (or the repository root) together with the children returned
/// by the fetch that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    /// Slash-separated path; the root is the empty string.
    pub path: String,
    pub name: String,
    /// True only for the repository's top-level directory.
    pub is_root: bool,
    pub canonical_url: String,
    /// Immediate children, bounded by the fetch cap.
    pub entries: Vec<TreeEntry>,
}

impl DirectoryNode {
    /// Always true: a directory node never describes a file.
    pub fn is_directory(&self) -> bool {
        true
    }

    /// Describe this directory as a tree entry, without its children.
    ///
    /// This is the value used for the synthetic "navigate up" entry.
    pub fn as_entry(&self) -> TreeEntry {
        TreeEntry::Directory(DirectoryEntry {
            path: self.path.clone(),
            name: self.name.clone(),
            canonical_url: self.canonical_url.clone(),
        })
    }
}

/// Compute the parent directory of a slash-separated path.
///
/// Trailing slashes are ignored. Top-level paths and the root itself map to
/// the root (empty string).
pub fn parent_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((head, _)) => head.trim_end_matches('/'),
        None => "",
    }
}

/// Get the last component of a slash-separated path.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, name)) => name,
        None => trimmed,
    }
}
