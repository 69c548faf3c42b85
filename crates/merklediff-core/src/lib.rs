//! merklediff core - hash-tree comparison of keyed record snapshots
//!
//! This crate provides the I/O-free kernel of merklediff:
//! - A canonical, type-tagged byte encoding of row values
//! - A bottom-up SHA-256 hash tree built from keyed rows or raw chunks
//! - A structural diff that walks two trees and reports differing key ranges
//! - The row-source contract that feeds the builder
//! - Error and logging facilities shared by the other crates
//!
//! Building and diffing are synchronous and single threaded; a finished
//! [`MerkleTree`] is immutable and can be shared freely between threads.

pub mod chunker;
pub mod diff;
pub mod errors;
pub mod hasher;
pub mod logging_facility;
pub mod serializer;
pub mod source;
pub mod tree;
pub mod value;

pub use merklediff_core_types as core_types;

// Re-export commonly used types
pub use chunker::Chunker;
pub use diff::{compare, DiffKind, DiffStats, KeyRange};
pub use errors::{ExError, ExErrorKind, MerkleDiffError, Result};
pub use hasher::Digest;
pub use serializer::{serialize, Serializer};
pub use source::{collect_rows, MemorySource, RowSource};
pub use tree::{build_from_chunks, build_from_reader, build_from_rows, MerkleTree, NodeRef};
pub use value::{Column, ColumnType, Row, Schema, Value};
