//! The [`OrderedIndexTree`] and its in-order iterator.
//!
//! # Invariants
//!
//! - BST order: left subtree values < node value < right subtree values.
//!   Equal values share one node and bump its `count`.
//! - Every node's cached `min`, `max`, `sum`, `len` and `height` equal a
//!   recomputation from its children whenever a public method returns.
//! - AVL balance: sibling subtree heights differ by at most one.

use std::cmp::Ordering;

use crate::error::{TreeError, TreeResult};
use crate::node::{self, Link, Node, NodeRef};

/// A self-balancing BST over `i64` order values with per-subtree aggregates.
///
/// Built fresh whenever it is needed; nothing here is persistent or shared.
#[derive(Clone, Debug, Default)]
pub struct OrderedIndexTree {
    root: Link,
}

impl OrderedIndexTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total multiplicity of all stored values, saturating at `u64::MAX`.
    pub fn len(&self) -> u64 {
        node::len(&self.root)
    }

    /// Returns `true` if the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Smallest stored value, `None` when empty.
    pub fn min(&self) -> Option<i64> {
        self.root.as_ref().map(|n| n.min)
    }

    /// Largest stored value, `None` when empty.
    pub fn max(&self) -> Option<i64> {
        self.root.as_ref().map(|n| n.max)
    }

    /// Sum of `value * count` over the whole tree; `0` when empty.
    pub fn sum(&self) -> i128 {
        self.root.as_ref().map_or(0, |n| n.sum)
    }

    /// Height of the tree; `0` when empty, `1` for a single node.
    pub fn height(&self) -> u32 {
        node::height(&self.root)
    }

    /// Root node, if any.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.as_deref().map(NodeRef::new)
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Insert `value` with multiplicity `count`.
    ///
    /// An existing value has its count increased instead of gaining a second
    /// node. Returns the affected node, or `None` when `count` is zero (in
    /// which case nothing changes).
    pub fn insert(&mut self, value: i64, count: u64) -> Option<NodeRef<'_>> {
        if count == 0 {
            return None;
        }
        self.root = Some(node::insert(self.root.take(), value, count));
        self.search(value)
    }

    /// Remove one occurrence of `value`.
    ///
    /// Absent values are ignored: this is a no-op, not an error, because
    /// callers that care ask [`search`](Self::search) first. Returns whether
    /// the value was present.
    pub fn remove(&mut self, value: i64) -> bool {
        self.remove_n(value, 1)
    }

    /// Remove up to `count` occurrences of `value`, unlinking the node when
    /// its multiplicity reaches zero.
    pub fn remove_n(&mut self, value: i64, count: u64) -> bool {
        if count == 0 {
            return self.contains(value);
        }
        let (root, found) = node::remove(self.root.take(), value, count);
        self.root = root;
        found
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.root = None;
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Exact-match lookup.
    pub fn search(&self, value: i64) -> Option<NodeRef<'_>> {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match value.cmp(&node.value) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(NodeRef::new(node)),
            };
        }
        None
    }

    /// Returns `true` if `value` is stored at least once.
    pub fn contains(&self, value: i64) -> bool {
        self.search(value).is_some()
    }

    /// Multiplicity of `value` (`0` when absent).
    pub fn count_of(&self, value: i64) -> u64 {
        self.search(value).map_or(0, |n| n.count())
    }

    /// Total multiplicity of values strictly less than `value`.
    ///
    /// With every value inserted once this is the zero-based rank of
    /// `value` in sorted order.
    /// Saturates at `u64::MAX`, like [`len`](Self::len).
    pub fn count_less_than(&self, value: i64) -> u64 {
        let mut rank: u64 = 0;
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            if value <= node.value {
                cursor = node.left.as_deref();
            } else {
                rank = rank
                    .saturating_add(node::len(&node.left))
                    .saturating_add(node.count);
                cursor = node.right.as_deref();
            }
        }
        rank
    }

    /// In-order `(value, count)` pairs.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }

    // ---------------------------------------------------------------
    // Validation
    // ---------------------------------------------------------------

    /// Walk the whole tree and verify order, aggregates and balance.
    ///
    /// This is O(n) and meant for tests and debug assertions.
    pub fn check_invariants(&self) -> TreeResult<()> {
        match self.root.as_deref() {
            Some(root) => check_node(root, None, None),
            None => Ok(()),
        }
    }
}

fn check_node(node: &Node, lower: Option<i64>, upper: Option<i64>) -> TreeResult<()> {
    if lower.is_some_and(|l| node.value <= l) || upper.is_some_and(|u| node.value >= u) {
        return Err(TreeError::OrderViolation {
            value: node.value,
            lower,
            upper,
        });
    }
    if node.count == 0 {
        return Err(TreeError::ZeroCount(node.value));
    }
    if let Some(left) = node.left.as_deref() {
        check_node(left, lower, Some(node.value))?;
    }
    if let Some(right) = node.right.as_deref() {
        check_node(right, Some(node.value), upper)?;
    }

    let (min, max, sum, len, height) = node.recompute();
    let fields = [
        ("min", i128::from(node.min), i128::from(min)),
        ("max", i128::from(node.max), i128::from(max)),
        ("sum", node.sum, sum),
        ("len", i128::from(node.len), i128::from(len)),
        ("height", i128::from(node.height), i128::from(height)),
    ];
    for (field, cached, expected) in fields {
        if cached != expected {
            return Err(TreeError::StaleAggregate {
                value: node.value,
                field,
                cached,
                expected,
            });
        }
    }

    let balance = node.balance();
    if balance.abs() > 1 {
        return Err(TreeError::Unbalanced {
            value: node.value,
            balance,
        });
    }
    Ok(())
}

/// In-order iterator over `(value, count)` pairs.
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn push_left(&mut self, mut cursor: Option<&'a Node>) {
        while let Some(node) = cursor {
            self.stack.push(node);
            cursor = node.left.as_deref();
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = (i64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some((node.value, node.count))
    }
}

impl<'a> IntoIterator for &'a OrderedIndexTree {
    type Item = (i64, u64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(i64, u64)> for OrderedIndexTree {
    fn from_iter<I: IntoIterator<Item = (i64, u64)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (value, count) in iter {
            tree.insert(value, count);
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tree_of(values: &[i64]) -> OrderedIndexTree {
        values.iter().map(|&v| (v, 1)).collect()
    }

    #[test]
    fn empty_tree_sentinels() {
        let tree = OrderedIndexTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.sum(), 0);
        assert_eq!(tree.min(), None);
        assert_eq!(tree.max(), None);
        assert!(tree.root().is_none());
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn single_insert_sets_root_aggregates() {
        let mut tree = OrderedIndexTree::new();
        let node = tree.insert(7, 3).unwrap();
        assert_eq!(node.value(), 7);
        assert_eq!(node.count(), 3);

        assert_eq!(tree.height(), 1);
        assert_eq!(tree.min(), Some(7));
        assert_eq!(tree.max(), Some(7));
        assert_eq!(tree.sum(), 21);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn insert_existing_value_bumps_count() {
        let mut tree = tree_of(&[5, 3, 8]);
        let node = tree.insert(3, 2).unwrap();
        assert_eq!(node.count(), 3);
        assert_eq!(tree.iter().count(), 3);
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.sum(), 5 + 3 * 3 + 8);
    }

    #[test]
    fn huge_multiplicities_saturate() {
        let mut tree = OrderedIndexTree::new();
        tree.insert(1, u64::MAX);
        tree.insert(2, 1);
        tree.insert(0, 7);
        assert_eq!(tree.len(), u64::MAX);
        assert_eq!(tree.count_less_than(3), u64::MAX);
        assert_eq!(tree.count_less_than(1), 7);
        assert_eq!(tree.count_of(1), u64::MAX);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn insert_zero_count_is_noop() {
        let mut tree = tree_of(&[1]);
        assert!(tree.insert(2, 0).is_none());
        assert!(!tree.contains(2));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let values: Vec<i64> = (0..1024).collect();
        let tree = tree_of(&values);
        // 1024 nodes need at least 11 levels; AVL keeps it within one more.
        assert!(tree.height() <= 12, "height {}", tree.height());
        assert_eq!(tree.min(), Some(0));
        assert_eq!(tree.max(), Some(1023));
        assert_eq!(tree.sum(), (0..1024i128).sum::<i128>());
        tree.check_invariants().unwrap();
    }

    #[test]
    fn remove_decrements_then_unlinks() {
        let mut tree = OrderedIndexTree::new();
        tree.insert(4, 2);
        assert!(tree.remove(4));
        assert_eq!(tree.count_of(4), 1);
        assert!(tree.remove(4));
        assert!(!tree.contains(4));
        assert!(tree.is_empty());
    }

    #[test]
    fn remove_absent_value_is_silent_noop() {
        let mut tree = tree_of(&[1, 2, 3]);
        assert!(!tree.remove(42));
        assert_eq!(tree.len(), 3);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn remove_interior_node_keeps_order() {
        let mut tree = tree_of(&[50, 30, 70, 20, 40, 60, 80]);
        assert!(tree.remove(50));
        let values: Vec<i64> = tree.iter().map(|(v, _)| v).collect();
        assert_eq!(values, vec![20, 30, 40, 60, 70, 80]);
        assert_eq!(tree.min(), Some(20));
        assert_eq!(tree.max(), Some(80));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn remove_n_removes_whole_node_when_count_exhausted() {
        let mut tree = OrderedIndexTree::new();
        tree.insert(9, 4);
        assert!(tree.remove_n(9, 10));
        assert!(tree.is_empty());
    }

    #[test]
    fn search_exposes_subtree_aggregates() {
        let tree = tree_of(&[2, 1, 3]);
        let root = tree.root().unwrap();
        assert_eq!(root.value(), 2);
        assert_eq!(root.len(), 3);
        assert_eq!(root.left().map(|n| n.value()), Some(1));
        assert_eq!(root.right().map(|n| n.value()), Some(3));
        assert!(tree.search(4).is_none());
    }

    #[test]
    fn count_less_than_is_rank() {
        let mut tree = tree_of(&[10, 20, 30, 40]);
        tree.insert(20, 1);
        assert_eq!(tree.count_less_than(5), 0);
        assert_eq!(tree.count_less_than(10), 0);
        assert_eq!(tree.count_less_than(20), 1);
        assert_eq!(tree.count_less_than(25), 3);
        assert_eq!(tree.count_less_than(100), 5);
    }

    #[test]
    fn negative_values_are_ordered() {
        let tree = tree_of(&[-3, 7, -10, 0]);
        assert_eq!(tree.min(), Some(-10));
        assert_eq!(tree.max(), Some(7));
        assert_eq!(tree.sum(), -6);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i64, u64),
        Remove(i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-50i64..50, 1u64..4).prop_map(|(v, c)| Op::Insert(v, c)),
            (-50i64..50).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn aggregates_match_inorder_recomputation(ops in prop::collection::vec(op(), 0..200)) {
            let mut tree = OrderedIndexTree::new();
            let mut model = std::collections::BTreeMap::<i64, u64>::new();

            for op in ops {
                match op {
                    Op::Insert(v, c) => {
                        tree.insert(v, c);
                        *model.entry(v).or_default() += c;
                    }
                    Op::Remove(v) => {
                        let present = model.contains_key(&v);
                        prop_assert_eq!(tree.remove(v), present);
                        if let Some(c) = model.get_mut(&v) {
                            *c -= 1;
                            if *c == 0 {
                                model.remove(&v);
                            }
                        }
                    }
                }

                prop_assert!(tree.check_invariants().is_ok());
                let inorder: Vec<(i64, u64)> = tree.iter().collect();
                let expected: Vec<(i64, u64)> = model.iter().map(|(v, c)| (*v, *c)).collect();
                prop_assert_eq!(&inorder, &expected);

                prop_assert_eq!(tree.min(), inorder.first().map(|(v, _)| *v));
                prop_assert_eq!(tree.max(), inorder.last().map(|(v, _)| *v));
                let sum: i128 = inorder.iter().map(|(v, c)| i128::from(*v) * i128::from(*c)).sum();
                prop_assert_eq!(tree.sum(), sum);
                prop_assert_eq!(tree.len(), inorder.iter().map(|(_, c)| c).sum::<u64>());
            }
        }
    }
}
