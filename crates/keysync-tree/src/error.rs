//! Error types for the tree crate.

/// Structural violations found by a validation pass over the tree.
///
/// None of the mutating operations return these; they exist so a debug
/// check can report *what* is wrong instead of a bare `false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A node sits on the wrong side of one of its ancestors.
    #[error("order violation: value {value} outside ({lower:?}, {upper:?})")]
    OrderViolation {
        value: i64,
        lower: Option<i64>,
        upper: Option<i64>,
    },

    /// A cached aggregate disagrees with a recomputation from the children.
    #[error("stale {field} aggregate at value {value}: cached {cached}, expected {expected}")]
    StaleAggregate {
        value: i64,
        field: &'static str,
        cached: i128,
        expected: i128,
    },

    /// Subtree heights differ by more than one.
    #[error("unbalanced node at value {value}: balance factor {balance}")]
    Unbalanced { value: i64, balance: i64 },

    /// A node is still linked although its multiplicity dropped to zero.
    #[error("node with zero count at value {0}")]
    ZeroCount(i64),
}

/// Convenience alias for tree results.
pub type TreeResult<T> = Result<T, TreeError>;
