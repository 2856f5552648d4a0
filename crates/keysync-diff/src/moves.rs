//! The move pass: pick the records that stay put, then relocate the rest.
//!
//! Input is the list after removals and insertions, written as the final
//! index of each item (`order[slot] = final index`). The kept records are a
//! longest increasing subsequence of `order`; everything else moves exactly
//! once, in final order, to sit right behind its final predecessor.

use tracing::trace;

use crate::change::{push_coalesced, Change};
use crate::position::PositionTracker;

/// Mark, per final index, whether the item belongs to the kept subsequence.
///
/// Patience sorting with a binary search over pile tops. The subsequence is
/// rebuilt from the top of the last pile, which is the smallest final index
/// any maximum-length subsequence can end at. When several subsequences
/// are equally long, this keeps the records that come earliest in the final
/// list, so later-occurring records are the ones marked as moved.
pub(crate) fn stable_set(order: &[usize]) -> Vec<bool> {
    let mut tops: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; order.len()];

    for (slot, &value) in order.iter().enumerate() {
        let pile = tops.partition_point(|&t| order[t] < value);
        prev[slot] = pile.checked_sub(1).map(|p| tops[p]);
        if pile == tops.len() {
            tops.push(slot);
        } else {
            tops[pile] = slot;
        }
    }

    let mut stable = vec![false; order.len()];
    let mut cursor = tops.last().copied();
    while let Some(slot) = cursor {
        stable[order[slot]] = true;
        cursor = prev[slot];
    }
    stable
}

/// Produce the `Move` changes that turn `order` into `0..n`.
///
/// Runs of moved records that are consecutive both in the final list and in
/// the list as it stands are relocated as one block. Every emitted move is
/// in backward form (`to < from`).
pub(crate) fn plan_moves<T, P>(order: &[usize], tracker: &mut P) -> Vec<Change<T>>
where
    P: PositionTracker + ?Sized,
{
    let stable = stable_set(order);
    let mut moves = Vec::new();

    let mut item = 0;
    while item < stable.len() {
        if stable[item] {
            item += 1;
            continue;
        }

        let first = item;
        let start = tracker.position(first);
        let mut count = 1;
        while first + count < stable.len()
            && !stable[first + count]
            && tracker.position(first + count) == start + count
        {
            count += 1;
        }

        let anchor = first.checked_sub(1);
        let (from, to) = tracker.relocate(first, count, anchor);
        trace!(first, count, from, to, backend = tracker.name(), "relocated block");
        if from != to {
            push_coalesced(&mut moves, backward(from, to, count));
        }
        item = first + count;
    }

    moves
}

/// Rewrite a forward move as the equivalent backward one: moving `count`
/// items from `from` to `to > from` is the same as pulling the `to - from`
/// items they jump over back to `from`.
fn backward<T>(from: usize, to: usize, count: usize) -> Change<T> {
    if to > from {
        Change::move_range(from + count, from, to - from)
    } else {
        Change::move_range(from, to, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{TreeTracker, VecTracker};

    fn kept(order: &[usize]) -> Vec<usize> {
        stable_set(order)
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| s.then_some(i))
            .collect()
    }

    fn plan(order: &[usize]) -> Vec<Change<()>> {
        let from_vec = plan_moves(order, &mut VecTracker::new(order));
        let from_tree = plan_moves(order, &mut TreeTracker::new(order));
        assert_eq!(from_vec, from_tree);
        from_vec
    }

    #[test]
    fn identity_keeps_everything() {
        assert_eq!(kept(&[0, 1, 2, 3]), vec![0, 1, 2, 3]);
        assert!(plan(&[0, 1, 2, 3]).is_empty());
    }

    #[test]
    fn stable_set_is_longest_increasing() {
        assert_eq!(kept(&[1, 2, 0]), vec![1, 2]);
        assert_eq!(kept(&[2, 0, 1]), vec![0, 1]);
        assert_eq!(kept(&[3, 0, 4, 1, 2]), vec![0, 1, 2]);
    }

    #[test]
    fn tie_break_moves_later_records() {
        // Both [0] and [1] are longest; the earlier final index is kept.
        assert_eq!(kept(&[1, 0]), vec![0]);
    }

    #[test]
    fn last_to_first() {
        // [a, b, c] -> [c, a, b]
        assert_eq!(plan(&[1, 2, 0]), vec![Change::move_range(2, 0, 1)]);
    }

    #[test]
    fn first_to_last_is_pulled_back() {
        // [a, b, c] -> [b, c, a]: `a` moves forward, reported as pulling [b, c] ahead.
        assert_eq!(plan(&[2, 0, 1]), vec![Change::move_range(1, 0, 2)]);
    }

    #[test]
    fn adjacent_block_moves_once() {
        // [a, b, c, d] -> [c, d, a, b]
        assert_eq!(plan(&[2, 3, 0, 1]), vec![Change::move_range(2, 0, 2)]);
    }

    #[test]
    fn separated_movers_stay_separate() {
        // [b, a, c, d] -> [a, b, c, d]
        assert_eq!(plan(&[1, 0, 2, 3]), vec![Change::move_range(1, 0, 1)]);
        // [e, b, c, d, a] -> [a, b, c, d, e]
        let moves = plan(&[4, 1, 2, 3, 0]);
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|m| m.to() < m.from()));
    }
}
