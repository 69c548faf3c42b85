//! merklediff sources - row sources over delimited files and SQLite
//!
//! Provides:
//! - `CsvSource`: delimited text with per-field type inference
//! - `SqliteSource`: a table or query read through one cursor
//! - Shared type inference and key construction helpers
//!
//! Both implement `merklediff_core::RowSource` and report iteration failures
//! as `MerkleDiffError::Source`.

pub mod csv_source;
pub mod errors;
pub mod infer;
pub mod key;
pub mod sqlite_source;

// Re-export key types
pub use csv_source::{CsvConfig, CsvSource};
pub use infer::infer_value;
pub use sqlite_source::{SqliteConfig, SqliteSource};
