//! Keyed list reconciliation for keysync.
//!
//! Given a previous and a current ordered snapshot of records, plus a rule
//! that extracts a stable key from each record, computes a compact edit
//! script (remove, insert, move, update) that turns the former into the
//! latter. Records are matched by key, never by position.
//!
//! ```
//! use keysync_diff::{compare, patch, Change};
//!
//! let previous = vec!["a", "b", "c"];
//! let current = vec!["c", "a", "b"];
//! let script = compare(&previous, &current, |s| *s);
//! assert_eq!(script, vec![Change::move_range(2, 0, 1)]);
//!
//! let mut list = previous.clone();
//! patch(&mut list, &script).unwrap();
//! assert_eq!(list, current);
//! ```
//!
//! # Key Types
//!
//! - [`DiffRunner`] / [`DiffConfig`] -- Configurable comparison entry point
//! - [`Change`] / [`ChangeKind`] -- One edit operation and its merge rules
//! - [`Patchable`] / [`patch`] -- Applying a script to a list
//! - [`ConsistencyError`] -- Precondition violations found by validation

pub mod change;
pub mod config;
pub mod error;
mod moves;
pub mod patch;
mod position;
pub mod runner;
pub mod validation;

pub use change::{coalesce, push_coalesced, Change, ChangeKind};
pub use config::DiffConfig;
pub use error::{ConsistencyError, DiffError, DiffResult, Side};
pub use patch::{patch, Patchable};
pub use runner::{compare, DiffRunner};
pub use validation::{check_snapshot, validate_snapshot};
