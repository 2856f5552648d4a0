//! Error types for the diff crate.

use std::fmt;

/// Which of the two snapshots a finding refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Previous,
    Current,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Previous => f.write_str("previous"),
            Side::Current => f.write_str("current"),
        }
    }
}

/// A precondition violation in the input snapshots.
///
/// `compare` never returns these; they come out of the validation pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    /// The same key appears more than once in one snapshot.
    #[error("duplicate key in {side} snapshot: index {duplicate} repeats index {first}")]
    DuplicateKey {
        side: Side,
        first: usize,
        duplicate: usize,
    },
}

/// Errors that can occur while validating inputs or applying a script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// The input snapshots violate a precondition of `compare`.
    #[error("consistency error: {0}")]
    Consistency(#[from] ConsistencyError),

    /// A change addresses items past the end of the target list.
    #[error("{kind} out of range: needs index {index}, target has {len} items")]
    OutOfRange {
        kind: crate::change::ChangeKind,
        index: usize,
        len: usize,
    },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
