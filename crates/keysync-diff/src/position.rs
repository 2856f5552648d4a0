//! Position tracking for the move pass.
//!
//! Items are identified by their final index. A tracker answers "where does
//! this item sit in the list right now" and relocates blocks of items,
//! reporting the `from`/`to` a `Move` change needs.

use keysync_tree::OrderedIndexTree;

pub(crate) trait PositionTracker {
    /// Current index of `item`.
    fn position(&self, item: usize) -> usize;

    /// Relocate the `count` items `first..first + count` (consecutive in the
    /// list right now) so they follow `anchor`, or lead the list when
    /// `anchor` is `None`. Returns `(from, to)` in the sense of
    /// `Change::move_range`.
    fn relocate(&mut self, first: usize, count: usize, anchor: Option<usize>) -> (usize, usize);

    fn name(&self) -> &'static str;
}

/// Direct simulation on a vector. O(n) per query, no setup cost.
pub(crate) struct VecTracker {
    list: Vec<usize>,
}

impl VecTracker {
    pub(crate) fn new(order: &[usize]) -> Self {
        Self {
            list: order.to_vec(),
        }
    }
}

impl PositionTracker for VecTracker {
    fn position(&self, item: usize) -> usize {
        self.list
            .iter()
            .position(|&i| i == item)
            .unwrap_or(self.list.len())
    }

    fn relocate(&mut self, first: usize, count: usize, anchor: Option<usize>) -> (usize, usize) {
        let from = self.position(first);
        let end = (from + count).min(self.list.len());
        let block: Vec<usize> = self.list.drain(from..end).collect();
        let to = anchor.map_or(0, |a| self.position(a) + 1).min(self.list.len());
        self.list.splice(to..to, block);
        (from, to)
    }

    fn name(&self) -> &'static str {
        "vector"
    }
}

/// Order-statistics tracking on an [`OrderedIndexTree`]. O(log n) per query.
///
/// Every item carries an integer label and the tree holds the set of
/// labels, so an item's position is the rank of its label. The item at
/// slot `i` of the starting list gets label `(i + 1) * stride`. A block
/// relocated behind `anchor` gets `label(anchor) + 1`, `+ 2`, ...; a block
/// moved to the front gets `1`, `2`, .... Blocks that chain onto each other
/// keep extending the same run of offsets, which never reach `stride`.
pub(crate) struct TreeTracker {
    tree: OrderedIndexTree,
    labels: Vec<i64>,
}

impl TreeTracker {
    pub(crate) fn new(order: &[usize]) -> Self {
        let stride = order.len() as i64 + 1;
        let mut labels = vec![0; order.len()];
        let mut tree = OrderedIndexTree::new();
        for (slot, &item) in order.iter().enumerate() {
            let label = (slot as i64 + 1) * stride;
            labels[item] = label;
            tree.insert(label, 1);
        }
        Self { tree, labels }
    }
}

impl PositionTracker for TreeTracker {
    fn position(&self, item: usize) -> usize {
        self.tree.count_less_than(self.labels[item]) as usize
    }

    fn relocate(&mut self, first: usize, count: usize, anchor: Option<usize>) -> (usize, usize) {
        let from = self.position(first);
        for item in first..first + count {
            self.tree.remove(self.labels[item]);
        }
        let base = anchor.map_or(0, |a| self.labels[a]);
        for (offset, item) in (first..first + count).enumerate() {
            let label = base + offset as i64 + 1;
            self.labels[item] = label;
            self.tree.insert(label, 1);
        }
        (from, self.position(first))
    }

    fn name(&self) -> &'static str {
        "index-tree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(tracker: &mut dyn PositionTracker, steps: &[(usize, usize, Option<usize>)]) -> Vec<(usize, usize)> {
        steps
            .iter()
            .map(|&(first, count, anchor)| tracker.relocate(first, count, anchor))
            .collect()
    }

    #[test]
    fn initial_positions_follow_order() {
        let order = [2, 0, 3, 1];
        let vec = VecTracker::new(&order);
        let tree = TreeTracker::new(&order);
        for (slot, &item) in order.iter().enumerate() {
            assert_eq!(vec.position(item), slot);
            assert_eq!(tree.position(item), slot);
        }
    }

    #[test]
    fn relocate_to_front_and_behind_anchor() {
        // [2, 0, 1]: move item 0 to the front, then item 2 behind item 1.
        let order = [2, 0, 1];
        let steps = [(0, 1, None), (2, 1, Some(1))];

        let mut vec = VecTracker::new(&order);
        let mut tree = TreeTracker::new(&order);
        let expected = vec![(1, 0), (1, 2)];
        assert_eq!(replay(&mut vec, &steps), expected);
        assert_eq!(replay(&mut tree, &steps), expected);
        assert_eq!(vec.list, vec![0, 1, 2]);
    }

    #[test]
    fn chained_blocks_keep_their_order() {
        // Items 1 and 2 each move behind their predecessor, one at a time.
        let order = [1, 2, 3, 0];
        let steps = [(1, 2, Some(0)), (3, 1, Some(2))];

        let mut vec = VecTracker::new(&order);
        let mut tree = TreeTracker::new(&order);
        assert_eq!(replay(&mut vec, &steps), replay(&mut tree, &steps));
        for item in 0..4 {
            assert_eq!(tree.position(item), item);
        }
    }
}
