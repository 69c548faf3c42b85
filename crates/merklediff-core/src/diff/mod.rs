//! Tree diff engine.
//!
//! Compares two independently built trees and reports the key ranges that
//! differ, without visiting subtrees whose hashes already agree.
//!
//! ## Entry point
//!
//! ```
//! use merklediff_core::{build_from_chunks, compare, DiffKind};
//!
//! let a = build_from_chunks(["a", "b"]);
//! let b = build_from_chunks(["a", "x"]);
//! let ranges = compare(&a, &b).unwrap();
//! assert_eq!(ranges.len(), 1);
//! assert_eq!(ranges[0].kind, DiffKind::Changed);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: the same two trees always produce the same ranges in
//!   the same order.
//! - **Pruning**: equal hashes stop the descent; identical trees cost one
//!   comparison.
//! - **Positional matching**: children are paired by position, not by key.
//!   An insertion near the front can shift pairings and widen the reported
//!   ranges.
//! - **Key scheme check**: two non-empty trees with different root key
//!   lengths are rejected before any range is emitted.

pub mod engine;
pub mod model;

pub use engine::compare;
pub use model::{DiffKind, DiffStats, KeyRange};
