//! Debug validation of snapshot preconditions.
//!
//! `compare` assumes every key is unique within a snapshot. It does not
//! check this on its hot path; these helpers do, and report each repeat as a
//! [`ConsistencyError`].

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{ConsistencyError, DiffResult, Side};

/// Every repeated key in `records`, in index order.
pub fn check_snapshot<T, K, F>(side: Side, records: &[T], key: F) -> Vec<ConsistencyError>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen: HashMap<K, usize> = HashMap::with_capacity(records.len());
    let mut errors = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let first = *seen.entry(key(record)).or_insert(index);
        if first != index {
            errors.push(ConsistencyError::DuplicateKey {
                side,
                first,
                duplicate: index,
            });
        }
    }
    errors
}

/// Fail with the first repeated key in `records`, if any.
pub fn validate_snapshot<T, K, F>(side: Side, records: &[T], key: F) -> DiffResult<()>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    match check_snapshot(side, records, key).into_iter().next() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
