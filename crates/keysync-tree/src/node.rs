//! Tree nodes, their cached subtree aggregates, and AVL rotations.
//!
//! Children are owned through `Option<Box<Node>>`; there are no parent
//! links. Anything that needs to walk back up (aggregate refresh,
//! rebalancing) does so on the return path of a recursive call.

use std::cmp::Ordering;

pub(crate) type Link = Option<Box<Node>>;

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) value: i64,
    pub(crate) count: u64,
    pub(crate) min: i64,
    pub(crate) max: i64,
    pub(crate) sum: i128,
    pub(crate) len: u64,
    pub(crate) height: u32,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    pub(crate) fn new(value: i64, count: u64) -> Box<Self> {
        Box::new(Self {
            value,
            count,
            min: value,
            max: value,
            sum: weighted(value, count),
            len: count,
            height: 1,
            left: None,
            right: None,
        })
    }

    /// Recompute this node's aggregates from its own fields and its
    /// children's (already correct) aggregates.
    pub(crate) fn refresh(&mut self) {
        let (min, max, sum, len, height) = self.recompute();
        self.min = min;
        self.max = max;
        self.sum = sum;
        self.len = len;
        self.height = height;
    }

    pub(crate) fn recompute(&self) -> (i64, i64, i128, u64, u32) {
        let mut min = self.value;
        let mut max = self.value;
        let mut sum = weighted(self.value, self.count);
        let mut len = self.count;
        for child in [&self.left, &self.right].into_iter().flatten() {
            min = min.min(child.min);
            max = max.max(child.max);
            sum = sum.saturating_add(child.sum);
            len = len.saturating_add(child.len);
        }
        let height = 1 + height(&self.left).max(height(&self.right));
        (min, max, sum, len, height)
    }

    pub(crate) fn balance(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

pub(crate) fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |n| n.height)
}

pub(crate) fn len(link: &Link) -> u64 {
    link.as_ref().map_or(0, |n| n.len)
}

fn weighted(value: i64, count: u64) -> i128 {
    i128::from(value) * i128::from(count)
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.refresh();
    pivot.right = Some(node);
    pivot.refresh();
    pivot
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.refresh();
    pivot.left = Some(node);
    pivot.refresh();
    pivot
}

/// Refresh `node` and restore the AVL property at it. Children are assumed
/// balanced with correct aggregates.
pub(crate) fn rebalance(mut node: Box<Node>) -> Box<Node> {
    node.refresh();
    let balance = node.balance();
    if balance > 1 {
        if node.left.as_ref().is_some_and(|l| l.balance() < 0) {
            node.left = node.left.take().map(rotate_left);
        }
        rotate_right(node)
    } else if balance < -1 {
        if node.right.as_ref().is_some_and(|r| r.balance() > 0) {
            node.right = node.right.take().map(rotate_right);
        }
        rotate_left(node)
    } else {
        node
    }
}

/// Insert `count` copies of `value` below `link`, returning the new subtree root.
pub(crate) fn insert(link: Link, value: i64, count: u64) -> Box<Node> {
    let Some(mut node) = link else {
        return Node::new(value, count);
    };
    match value.cmp(&node.value) {
        Ordering::Less => node.left = Some(insert(node.left.take(), value, count)),
        Ordering::Greater => node.right = Some(insert(node.right.take(), value, count)),
        Ordering::Equal => {
            node.count = node.count.saturating_add(count);
            node.refresh();
            return node;
        }
    }
    rebalance(node)
}

/// Remove up to `count` copies of `value` below `link`. Returns the new
/// subtree root and whether `value` was present at all.
pub(crate) fn remove(link: Link, value: i64, count: u64) -> (Link, bool) {
    let Some(mut node) = link else {
        return (None, false);
    };
    let found = match value.cmp(&node.value) {
        Ordering::Less => {
            let (left, found) = remove(node.left.take(), value, count);
            node.left = left;
            found
        }
        Ordering::Greater => {
            let (right, found) = remove(node.right.take(), value, count);
            node.right = right;
            found
        }
        Ordering::Equal if node.count > count => {
            node.count -= count;
            node.refresh();
            return (Some(node), true);
        }
        Ordering::Equal => return (unlink(node), true),
    };
    (Some(rebalance(node)), found)
}

fn unlink(mut node: Box<Node>) -> Link {
    match (node.left.take(), node.right.take()) {
        (None, right) => right,
        (left, None) => left,
        (left, Some(right)) => {
            let (rest, mut successor) = take_min(right);
            successor.left = left;
            successor.right = rest;
            Some(rebalance(successor))
        }
    }
}

fn take_min(mut node: Box<Node>) -> (Link, Box<Node>) {
    match node.left.take() {
        None => (node.right.take(), node),
        Some(left) => {
            let (rest, min) = take_min(left);
            node.left = rest;
            (Some(rebalance(node)), min)
        }
    }
}

/// Read-only view of a tree node.
///
/// The aggregate accessors describe the subtree rooted at this node; the
/// view cannot be used to reach a parent or to mutate the tree.
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a> {
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(node: &'a Node) -> Self {
        Self { node }
    }

    /// The order value stored at this node.
    pub fn value(&self) -> i64 {
        self.node.value
    }

    /// Multiplicity of [`value`](Self::value).
    pub fn count(&self) -> u64 {
        self.node.count
    }

    /// Smallest value in the subtree.
    pub fn min(&self) -> i64 {
        self.node.min
    }

    /// Largest value in the subtree.
    pub fn max(&self) -> i64 {
        self.node.max
    }

    /// Sum of `value * count` over the subtree.
    pub fn sum(&self) -> i128 {
        self.node.sum
    }

    /// Total multiplicity in the subtree.
    pub fn len(&self) -> u64 {
        self.node.len
    }

    /// Height of the subtree; a leaf has height 1.
    pub fn height(&self) -> u32 {
        self.node.height
    }

    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.node.left.as_deref().map(NodeRef::new)
    }

    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.node.right.as_deref().map(NodeRef::new)
    }
}
