use serde::{Deserialize, Serialize};

/// Configuration for a [`DiffRunner`](crate::DiffRunner).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Snapshots whose current side has at least this many records track
    /// move positions with the ordered index tree instead of a plain vector.
    pub index_tree_threshold: usize,
    /// Run the duplicate-key pass inside `compare` and log what it finds.
    /// The diff still completes; this only makes the problem visible.
    pub validate_keys: bool,
    /// Emit `Update` changes for retained records whose content differs.
    /// When off, the script only reorders and resizes the list.
    pub detect_updates: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            index_tree_threshold: 64,
            validate_keys: cfg!(debug_assertions),
            detect_updates: true,
        }
    }
}

impl DiffConfig {
    /// Always use the ordered index tree, whatever the input size.
    pub fn tree_backed() -> Self {
        Self {
            index_tree_threshold: 0,
            ..Default::default()
        }
    }

    /// Never use the ordered index tree.
    pub fn vector_backed() -> Self {
        Self {
            index_tree_threshold: usize::MAX,
            ..Default::default()
        }
    }
}
