//! The values a sidebar iterates over: real entries plus the limit marker.

use super::TreeEntry;

/// Node ID reported for [`VisibleEntry::Limit`].
///
/// Real entries use their path as node ID. Paths come from the repository, so
/// consumers must compare against [`VisibleEntry::Limit`] rather than this
/// string when deciding whether a value is the marker.
pub const NODE_LIMIT_ID: &str = "node-limit";

/// One element of a directory's visible entry list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibleEntry {
    /// A file or subdirectory.
    Entry(TreeEntry),
    /// More entries exist than were fetched. Always last, at most once.
    Limit,
}

impl VisibleEntry {
    /// Get the wrapped tree entry, or `None` for the limit marker.
    pub fn as_entry(&self) -> Option<&TreeEntry> {
        match self {
            VisibleEntry::Entry(entry) => Some(entry),
            VisibleEntry::Limit => None,
        }
    }

    pub fn is_limit(&self) -> bool {
        matches!(self, VisibleEntry::Limit)
    }

    /// Stable identifier for this value within one entry list.
    pub fn node_id(&self) -> &str {
        match self {
            VisibleEntry::Entry(entry) => entry.path(),
            VisibleEntry::Limit => NODE_LIMIT_ID,
        }
    }
}

impl From<TreeEntry> for VisibleEntry {
    fn from(entry: TreeEntry) -> Self {
        VisibleEntry::Entry(entry)
    }
}
