//! Ordered index tree for keysync.
//!
//! A self-balancing (AVL) binary search tree keyed by `i64` order values.
//! Every node caches aggregates over its subtree, so the root-level
//! statistics are O(1) reads and rank queries are O(log n).
//!
//! The diff runner in `keysync-diff` builds one of these per call to track
//! record positions while it replays moves; the tree is equally usable on
//! its own by anyone who needs ordered-key statistics.
//!
//! # Key Types
//!
//! - [`OrderedIndexTree`] -- The tree: insert/remove/search plus aggregate reads
//! - [`NodeRef`] -- Read-only view of a node and its subtree aggregates
//! - [`TreeError`] -- Violations reported by [`OrderedIndexTree::check_invariants`]
//!
//! # Empty-tree sentinels
//!
//! `height()`, `len()` and `sum()` are `0` on an empty tree; `min()` and
//! `max()` are `None`.

pub mod error;
mod node;
pub mod tree;

pub use error::{TreeError, TreeResult};
pub use node::NodeRef;
pub use tree::{Iter, OrderedIndexTree};
