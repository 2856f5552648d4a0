//! The [`DiffRunner`]: compare two keyed snapshots and produce an edit script.
//!
//! # Output contract
//!
//! The script is grouped Remove, Insert, Move, Update, and each group is in
//! ascending index order. Adjacent compatible changes are already merged.
//!
//! - Removes use pre-removal indices. Apply them last range first (as
//!   [`patch`](crate::patch::patch) does).
//! - Inserts use final indices and are applied front to back.
//! - Moves run on the list left by the inserts and are all backward
//!   (`to < from`).
//! - Updates use final indices and cover every retained record whose
//!   content changed, moved or not.
//!
//! Moves are planned over the list as it stands after the inserts, with
//! inserted records already at their final index. They count as items of
//! that list, so reordering retained records around an insert can carry the
//! inserted record along: `[a, b] -> [b, x, a]` takes two moves where the
//! retained records alone would need one. Moves are minimal for that list.
//!
//! # Duplicate keys
//!
//! Keys must be unique within each snapshot. A repeated key is a caller bug:
//! the script is then unspecified, although `compare` still returns without
//! panicking (only the first occurrence of a key is matched). Use
//! [`DiffRunner::validate`] to surface the problem as a
//! [`ConsistencyError`](crate::error::ConsistencyError).

use std::collections::HashMap;
use std::hash::Hash;

use tracing::{debug, warn};

use crate::change::{push_coalesced, Change};
use crate::config::DiffConfig;
use crate::error::{DiffResult, Side};
use crate::moves::plan_moves;
use crate::position::{PositionTracker, TreeTracker, VecTracker};
use crate::validation::{check_snapshot, validate_snapshot};

/// Computes edit scripts between ordered snapshots of keyed records.
///
/// Holds only configuration. Each call builds its own lookup maps and
/// position index and drops them before returning, so a runner can be
/// shared freely between threads.
#[derive(Clone, Debug, Default)]
pub struct DiffRunner {
    config: DiffConfig,
}

impl DiffRunner {
    /// Create a runner with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with the given configuration.
    pub fn with_config(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Compare two snapshots, detecting updates with `PartialEq`.
    pub fn compare<T, K, F>(&self, previous: &[T], current: &[T], key: F) -> Vec<Change<T>>
    where
        T: Clone + PartialEq,
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        self.compare_by(previous, current, key, |a, b| a == b)
    }

    /// Compare two snapshots, detecting updates with `same`.
    ///
    /// `key` identifies a record across snapshots; `same` decides whether a
    /// retained record's content is unchanged.
    pub fn compare_by<T, K, F, E>(
        &self,
        previous: &[T],
        current: &[T],
        key: F,
        same: E,
    ) -> Vec<Change<T>>
    where
        T: Clone,
        K: Eq + Hash,
        F: Fn(&T) -> K,
        E: Fn(&T, &T) -> bool,
    {
        if self.config.validate_keys {
            for side in [Side::Previous, Side::Current] {
                let records = match side {
                    Side::Previous => previous,
                    Side::Current => current,
                };
                for err in check_snapshot(side, records, &key) {
                    warn!(%err, "snapshot violates key uniqueness");
                }
            }
        }

        let previous_keys: Vec<K> = previous.iter().map(&key).collect();
        let current_keys: Vec<K> = current.iter().map(&key).collect();
        let previous_index = first_positions(&previous_keys);
        let current_index = first_positions(&current_keys);

        // source[j]: previous index of the record now at j, if retained.
        let source: Vec<Option<usize>> = current_keys
            .iter()
            .enumerate()
            .map(|(j, k)| {
                if current_index.get(k) == Some(&j) {
                    previous_index.get(k).copied()
                } else {
                    None
                }
            })
            .collect();

        // target[i]: final index of the record that was at i, if retained.
        let mut target: Vec<Option<usize>> = vec![None; previous.len()];
        for (j, i) in source.iter().enumerate() {
            if let Some(i) = *i {
                target[i] = Some(j);
            }
        }

        let mut removes = Vec::new();
        for (i, t) in target.iter().enumerate() {
            if t.is_none() {
                push_coalesced(&mut removes, Change::remove(i, i));
            }
        }

        let mut inserts = Vec::new();
        for (j, s) in source.iter().enumerate() {
            if s.is_none() {
                push_coalesced(&mut inserts, Change::insert(j, vec![current[j].clone()]));
            }
        }

        // After removes and inserts: inserted records sit at their final
        // index, retained ones fill the remaining slots in previous order.
        let mut retained = target.iter().flatten().copied();
        let order: Vec<usize> = source
            .iter()
            .enumerate()
            .filter_map(|(j, s)| if s.is_some() { retained.next() } else { Some(j) })
            .collect();

        let mut tracker: Box<dyn PositionTracker> =
            if order.len() >= self.config.index_tree_threshold {
                Box::new(TreeTracker::new(&order))
            } else {
                Box::new(VecTracker::new(&order))
            };
        let moves = plan_moves(&order, tracker.as_mut());

        let mut updates = Vec::new();
        if self.config.detect_updates {
            for (j, s) in source.iter().enumerate() {
                if let Some(i) = *s {
                    if !same(&previous[i], &current[j]) {
                        push_coalesced(&mut updates, Change::update(j, vec![current[j].clone()]));
                    }
                }
            }
        }

        debug!(
            previous = previous.len(),
            current = current.len(),
            removes = removes.len(),
            inserts = inserts.len(),
            moves = moves.len(),
            updates = updates.len(),
            backend = tracker.name(),
            "compared snapshots"
        );

        let mut changes = removes;
        changes.extend(inserts);
        changes.extend(moves);
        changes.extend(updates);
        changes
    }

    /// Check both snapshots for repeated keys.
    pub fn validate<T, K, F>(&self, previous: &[T], current: &[T], key: F) -> DiffResult<()>
    where
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        validate_snapshot(Side::Previous, previous, &key)?;
        validate_snapshot(Side::Current, current, &key)
    }
}

/// Compare two snapshots with the default [`DiffRunner`].
pub fn compare<T, K, F>(previous: &[T], current: &[T], key: F) -> Vec<Change<T>>
where
    T: Clone + PartialEq,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    DiffRunner::new().compare(previous, current, key)
}

fn first_positions<K: Eq + Hash>(keys: &[K]) -> HashMap<&K, usize> {
    let mut index = HashMap::with_capacity(keys.len());
    for (i, k) in keys.iter().enumerate() {
        index.entry(k).or_insert(i);
    }
    index
}
