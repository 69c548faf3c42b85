//! Error helpers for merklediff-sources
//!
//! Wraps driver errors into `MerkleDiffError` variants.

use merklediff_core::errors::MerkleDiffError;

/// Create a row-level failure from a CSV parse error
pub fn csv_error(row: u64, err: &csv::Error) -> MerkleDiffError {
    MerkleDiffError::Source {
        row,
        message: format!("failed to read CSV record: {}", err),
    }
}

/// Create a row-level failure from a query error raised mid-iteration
pub fn sqlite_row_error(row: u64, err: &rusqlite::Error) -> MerkleDiffError {
    MerkleDiffError::Source {
        row,
        message: format!("failed to read SQLite row: {}", err),
    }
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> MerkleDiffError {
    MerkleDiffError::Persistence {
        message: err.to_string(),
    }
}

/// Create an IO error
pub fn io_error(operation: &str, err: &std::io::Error) -> MerkleDiffError {
    MerkleDiffError::io(operation, err)
}

/// Create a configuration error
pub fn invalid_config(reason: impl Into<String>) -> MerkleDiffError {
    MerkleDiffError::InvalidInput {
        reason: reason.into(),
    }
}
