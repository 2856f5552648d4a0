//! The [`Change`] record: one operation of an edit script, plus the merge
//! rules used to compact adjacent operations.
//!
//! # Index conventions
//!
//! - `Remove { from, to }` is an inclusive range in the index space of the
//!   list *before any removal*.
//! - `Insert { from, to }` is the inclusive destination range in the final
//!   index space; `items` holds the inserted records.
//! - `Move { from, to, count }` takes `count` items starting at `from` out of
//!   the current list and re-inserts them so the first one lands at `to`.
//! - `Update { from, to }` is the inclusive range, in the final index space,
//!   whose records are replaced by `items`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a [`Change`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    /// No-op. Produced when a merge is not possible.
    #[default]
    Null,
    Insert,
    Remove,
    Move,
    Update,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeKind::Null => "Null",
            ChangeKind::Insert => "Insert",
            ChangeKind::Remove => "Remove",
            ChangeKind::Move => "Move",
            ChangeKind::Update => "Update",
        };
        f.write_str(name)
    }
}

/// A single edit operation.
///
/// Equality is structural over every field, items included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change<T> {
    kind: ChangeKind,
    from: usize,
    to: usize,
    count: usize,
    items: Vec<T>,
}

impl<T> Default for Change<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> Change<T> {
    /// The no-op change.
    pub fn null() -> Self {
        Self {
            kind: ChangeKind::Null,
            from: 0,
            to: 0,
            count: 0,
            items: Vec::new(),
        }
    }

    /// Remove the inclusive range `from..=to`. The bounds are swapped if
    /// given in reverse.
    pub fn remove(from: usize, to: usize) -> Self {
        let (from, to) = (from.min(to), from.max(to));
        Self {
            kind: ChangeKind::Remove,
            from,
            to,
            count: (to - from).saturating_add(1),
            items: Vec::new(),
        }
    }

    /// Insert `items` so the first one lands at `at`.
    pub fn insert(at: usize, items: Vec<T>) -> Self {
        Self::with_items(ChangeKind::Insert, at, items)
    }

    /// Replace the records starting at `at` with `items`.
    pub fn update(at: usize, items: Vec<T>) -> Self {
        Self::with_items(ChangeKind::Update, at, items)
    }

    /// Move `count` items starting at `from` so the first lands at `to`.
    pub fn move_range(from: usize, to: usize, count: usize) -> Self {
        Self {
            kind: ChangeKind::Move,
            from,
            to,
            count,
            items: Vec::new(),
        }
    }

    fn with_items(kind: ChangeKind, at: usize, items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            kind,
            from: at,
            to: at.saturating_add(count.saturating_sub(1)),
            count,
            items,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    /// Number of contiguous items affected.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Inserted or updated records; empty for the other kinds.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the change, returning its records.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn is_null(&self) -> bool {
        self.kind == ChangeKind::Null
    }

    /// Returns `true` if `other`, applied right after `self`, can be folded
    /// into a single operation.
    ///
    /// - `Remove`: the two ranges are disjoint and touch. Symmetric.
    /// - `Insert`/`Update`: `self` is non-empty and `other` starts right
    ///   after it ends.
    /// - `Move`: both move backward (`to < from`), `other` picks up the items
    ///   that followed `self`'s block and drops them right after it. This is
    ///   directional: `a.can_merge(&b)` does not imply `b.can_merge(&a)`.
    ///
    /// An operation never merges with itself and `Null` never merges.
    pub fn can_merge(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        match self.kind {
            ChangeKind::Null => false,
            ChangeKind::Remove => {
                self.to.checked_add(1) == Some(other.from)
                    || other.to.checked_add(1) == Some(self.from)
            }
            ChangeKind::Insert | ChangeKind::Update => {
                self.count > 0 && self.from.checked_add(self.count) == Some(other.from)
            }
            ChangeKind::Move => {
                self.count > 0
                    && self.to < self.from
                    && other.to < other.from
                    && self.from.checked_add(self.count) == Some(other.from)
                    && self.to.checked_add(self.count) == Some(other.to)
            }
        }
    }

    /// Fold `other` into `self`.
    ///
    /// Total: returns a `Null` change when [`can_merge`](Self::can_merge) is
    /// false, so callers never need a failure path.
    pub fn merge(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        if !self.can_merge(other) {
            return Self::null();
        }
        match self.kind {
            ChangeKind::Remove => {
                Self::remove(self.from.min(other.from), self.to.max(other.to))
            }
            ChangeKind::Insert | ChangeKind::Update => {
                let mut items = self.items.clone();
                items.extend(other.items.iter().cloned());
                Self::with_items(self.kind, self.from, items)
            }
            ChangeKind::Move => {
                Self::move_range(self.from, self.to, self.count.saturating_add(other.count))
            }
            ChangeKind::Null => Self::null(),
        }
    }

    /// Consuming form of [`merge`](Self::merge) that moves items instead of
    /// cloning them. Hands `other` back when the two cannot merge.
    pub(crate) fn absorb(&mut self, other: Self) -> Option<Self> {
        if !self.can_merge(&other) {
            return Some(other);
        }
        match self.kind {
            ChangeKind::Remove => {
                *self = Self::remove(self.from.min(other.from), self.to.max(other.to));
            }
            ChangeKind::Insert | ChangeKind::Update => {
                self.items.extend(other.items);
                self.count = self.items.len();
                self.to = self.from.saturating_add(self.count.saturating_sub(1));
            }
            ChangeKind::Move => self.count = self.count.saturating_add(other.count),
            ChangeKind::Null => {}
        }
        None
    }
}

impl<T> fmt::Display for Change<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{{from: {}, to: {}, count: {}}}",
            self.kind, self.from, self.to, self.count
        )
    }
}

/// Append `change` to `changes`, folding it into the last element when the
/// two can merge. Null changes are dropped.
pub fn push_coalesced<T>(changes: &mut Vec<Change<T>>, change: Change<T>) {
    if change.is_null() {
        return;
    }
    let leftover = match changes.last_mut() {
        Some(last) => last.absorb(change),
        None => Some(change),
    };
    if let Some(change) = leftover {
        changes.push(change);
    }
}

/// Compact a script by merging each change into its predecessor where the
/// merge rules allow it.
pub fn coalesce<T>(changes: impl IntoIterator<Item = Change<T>>) -> Vec<Change<T>> {
    let mut out = Vec::new();
    for change in changes {
        push_coalesced(&mut out, change);
    }
    out
}
