//! Applying an edit script to a target list.
//!
//! The script produced by `compare` is grouped Remove, Insert, Move, Update.
//! [`patch`] walks it in that order, taking the Remove group from the last
//! range back to the first so pre-removal indices stay valid.

use crate::change::{Change, ChangeKind};
use crate::error::{DiffError, DiffResult};

/// A list-like target that an edit script can be applied to.
///
/// Ranges passed in have already been checked against [`len`](Self::len).
pub trait Patchable<T> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `items` so the first lands at `index`.
    fn insert_items(&mut self, index: usize, items: &[T]);

    /// Remove `count` items starting at `from`.
    fn remove_items(&mut self, from: usize, count: usize);

    /// Take `count` items at `from` out and re-insert them at `to`.
    fn move_items(&mut self, from: usize, to: usize, count: usize);

    /// Overwrite the items starting at `index`.
    fn set_items(&mut self, index: usize, items: &[T]);
}

impl<T: Clone> Patchable<T> for Vec<T> {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn insert_items(&mut self, index: usize, items: &[T]) {
        self.splice(index..index, items.iter().cloned());
    }

    fn remove_items(&mut self, from: usize, count: usize) {
        self.drain(from..from + count);
    }

    fn move_items(&mut self, from: usize, to: usize, count: usize) {
        let block: Vec<T> = self.drain(from..from + count).collect();
        self.splice(to..to, block);
    }

    fn set_items(&mut self, index: usize, items: &[T]) {
        self[index..index + items.len()].clone_from_slice(items);
    }
}

/// Apply `changes` to `target`.
///
/// Fails with [`DiffError::OutOfRange`] on the first change that does not
/// fit the target as it stands at that point; changes before it have
/// already been applied. A Remove whose `from`, `to` and `count` disagree
/// (only possible for a deserialized script) is rejected the same way.
pub fn patch<T, P>(target: &mut P, changes: &[Change<T>]) -> DiffResult<()>
where
    P: Patchable<T> + ?Sized,
{
    let removes = changes.iter().filter(|c| c.kind() == ChangeKind::Remove);
    for change in removes.rev() {
        let well_formed = change.count() > 0
            && change.from() <= change.to()
            && change.from().checked_add(change.count()) == change.to().checked_add(1);
        if !well_formed {
            return Err(out_of_range(change, change.to(), target.len()));
        }
        span(target.len(), change, change.from(), change.count())?;
        target.remove_items(change.from(), change.count());
    }

    for change in changes {
        match change.kind() {
            ChangeKind::Null | ChangeKind::Remove => {}
            ChangeKind::Insert => {
                span(target.len(), change, change.from(), 0)?;
                target.insert_items(change.from(), change.items());
            }
            ChangeKind::Move => {
                span(target.len(), change, change.from(), change.count())?;
                span(target.len() - change.count(), change, change.to(), 0)?;
                target.move_items(change.from(), change.to(), change.count());
            }
            ChangeKind::Update => {
                span(target.len(), change, change.from(), change.items().len())?;
                target.set_items(change.from(), change.items());
            }
        }
    }
    Ok(())
}

/// Check that `start..start + count` fits in a list of `len` items.
fn span<T>(len: usize, change: &Change<T>, start: usize, count: usize) -> DiffResult<usize> {
    match start.checked_add(count) {
        Some(end) if end <= len => Ok(end),
        _ => Err(out_of_range(change, start.saturating_add(count), len)),
    }
}

fn out_of_range<T>(change: &Change<T>, index: usize, len: usize) -> DiffError {
    DiffError::OutOfRange {
        kind: change.kind(),
        index,
        len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_apply_from_the_back() {
        let mut list = vec!['a', 'b', 'c', 'd', 'e'];
        patch(&mut list, &[Change::remove(0, 0), Change::remove(2, 3)]).unwrap();
        assert_eq!(list, vec!['b', 'e']);
    }

    #[test]
    fn inserts_then_moves_then_updates() {
        let mut list = vec![1, 2, 3];
        let script = vec![
            Change::insert(3, vec![4]),
            Change::move_range(2, 0, 2),
            Change::update(0, vec![30]),
        ];
        patch(&mut list, &script).unwrap();
        assert_eq!(list, vec![30, 4, 1, 2]);
    }

    #[test]
    fn null_changes_are_skipped() {
        let mut list = vec![1];
        patch(&mut list, &[Change::null()]).unwrap();
        assert_eq!(list, vec![1]);
    }

    #[test]
    fn out_of_range_is_an_error() {
        let mut list = vec![1, 2];
        let err = patch(&mut list, &[Change::<i32>::remove(1, 4)]).unwrap_err();
        assert_eq!(
            err,
            DiffError::OutOfRange { kind: ChangeKind::Remove, index: 5, len: 2 }
        );

        let err = patch(&mut list, &[Change::<i32>::move_range(0, 2, 1)]).unwrap_err();
        assert!(matches!(err, DiffError::OutOfRange { kind: ChangeKind::Move, .. }));
        assert_eq!(list, vec![1, 2]);
    }

    #[test]
    fn inconsistent_remove_is_rejected() {
        let mut list = vec![1, 2];
        let change: Change<i32> = serde_json::from_str(
            r#"{"kind":"Remove","from":3,"to":0,"count":1,"items":[]}"#,
        )
        .unwrap();
        let err = patch(&mut list, &[change]).unwrap_err();
        assert!(matches!(err, DiffError::OutOfRange { kind: ChangeKind::Remove, .. }));

        let change: Change<i32> = serde_json::from_str(
            r#"{"kind":"Remove","from":0,"to":0,"count":5,"items":[]}"#,
        )
        .unwrap();
        assert!(patch(&mut list, &[change]).is_err());
        assert_eq!(list, vec![1, 2]);
    }

    #[test]
    fn overflowing_ranges_are_rejected() {
        let mut list = vec![1, 2];
        let err = patch(&mut list, &[Change::<i32>::move_range(1, 0, usize::MAX)]).unwrap_err();
        assert_eq!(
            err,
            DiffError::OutOfRange { kind: ChangeKind::Move, index: usize::MAX, len: 2 }
        );

        let err = patch(&mut list, &[Change::update(usize::MAX, vec![9])]).unwrap_err();
        assert!(matches!(err, DiffError::OutOfRange { kind: ChangeKind::Update, .. }));

        let err = patch(&mut list, &[Change::<i32>::remove(usize::MAX, usize::MAX)]).unwrap_err();
        assert!(matches!(err, DiffError::OutOfRange { kind: ChangeKind::Remove, .. }));
        assert_eq!(list, vec![1, 2]);
    }
}
