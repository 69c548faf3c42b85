use merklediff_core_types::ComparisonId;
use thiserror::Error;

/// Result type alias using MerkleDiffError
pub type Result<T> = std::result::Result<T, MerkleDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, log assertions and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,

    // Row acquisition
    /// The row source failed while iterating
    SourceFailure,

    // Comparison
    /// The two trees use different key-length conventions
    KeySchemeMismatch,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::SourceFailure => "ERR_SOURCE_FAILURE",
            ExErrorKind::KeySchemeMismatch => "ERR_KEY_SCHEME_MISMATCH",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus optional context
/// (operation, source label, record number, comparison id) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    source_name: Option<String>,
    row: Option<u64>,
    comparison_id: Option<ComparisonId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            source_name: None,
            row: None,
            comparison_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the label of the source that failed
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Add record number context
    pub fn with_row(mut self, row: u64) -> Self {
        self.row = Some(row);
        self
    }

    /// Add comparison id context
    pub fn with_comparison_id(mut self, comparison_id: ComparisonId) -> Self {
        self.comparison_id = Some(comparison_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the source label, if any
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Get the record number, if any
    pub fn row(&self) -> Option<u64> {
        self.row
    }

    /// Get the comparison id, if any
    pub fn comparison_id(&self) -> Option<&ComparisonId> {
        self.comparison_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {:?}", self.code(), self.kind)?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(source_name) = &self.source_name {
            write!(f, " (source: {})", source_name)?;
        }
        if let Some(row) = self.row {
            write!(f, " (row: {})", row)?;
        }
        if let Some(comparison_id) = &self.comparison_id {
            write!(f, " (comparison_id: {})", comparison_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for merklediff operations
///
/// Building and diffing are total apart from two cases: a row source that
/// fails mid-iteration, and two trees whose key schemes disagree. The other
/// variants are raised by the sources and the CLI.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MerkleDiffError {
    /// The row source reported an error while producing a record
    #[error("Row source failed at record {row}: {message}")]
    Source { row: u64, message: String },

    /// The two trees were built with different key-length conventions
    #[error("Key scheme mismatch: left tree uses {left}-byte keys, right tree uses {right}-byte keys")]
    KeySchemeMismatch { left: usize, right: usize },

    /// Caller supplied an invalid argument or configuration
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Filesystem or stream failure
    #[error("I/O error during {operation}: {message}")]
    Io { operation: String, message: String },

    /// Encoding of an output document failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// The embedded database rejected a statement
    #[error("Database error: {message}")]
    Persistence { message: String },
}

impl MerkleDiffError {
    /// Build an I/O error tagged with the operation that failed
    pub fn io(operation: impl Into<String>, err: &std::io::Error) -> Self {
        MerkleDiffError::Io {
            operation: operation.into(),
            message: err.to_string(),
        }
    }
}

/// Conversion from MerkleDiffError to ExError
impl From<MerkleDiffError> for ExError {
    fn from(err: MerkleDiffError) -> Self {
        match err {
            MerkleDiffError::Source { row, message } => ExError::new(ExErrorKind::SourceFailure)
                .with_row(row)
                .with_message(message),

            MerkleDiffError::KeySchemeMismatch { left, right } => {
                ExError::new(ExErrorKind::KeySchemeMismatch)
                    .with_op("compare")
                    .with_message(format!(
                        "left key length {} differs from right key length {}",
                        left, right
                    ))
            }

            MerkleDiffError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            MerkleDiffError::Io { operation, message } => ExError::new(ExErrorKind::Io)
                .with_op(operation)
                .with_message(message),

            MerkleDiffError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            MerkleDiffError::Persistence { message } => {
                ExError::new(ExErrorKind::Persistence).with_message(message)
            }
        }
    }
}

impl From<&MerkleDiffError> for ExError {
    fn from(err: &MerkleDiffError) -> Self {
        err.clone().into()
    }
}

/// Conversion from serde_json::Error to MerkleDiffError
impl From<serde_json::Error> for MerkleDiffError {
    fn from(err: serde_json::Error) -> Self {
        MerkleDiffError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
            (ExErrorKind::SourceFailure, "ERR_SOURCE_FAILURE"),
            (ExErrorKind::KeySchemeMismatch, "ERR_KEY_SCHEME_MISMATCH"),
            (ExErrorKind::Io, "ERR_IO"),
            (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
            (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
            (ExErrorKind::Internal, "ERR_INTERNAL"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_source_error_keeps_row() {
        let err = MerkleDiffError::Source {
            row: 7,
            message: "wrong number of fields".to_string(),
        };
        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::SourceFailure);
        assert_eq!(ex.row(), Some(7));
        assert_eq!(ex.message(), "wrong number of fields");
    }

    #[test]
    fn test_key_scheme_mismatch_maps_to_compare_op() {
        let ex: ExError = MerkleDiffError::KeySchemeMismatch { left: 3, right: 5 }.into();
        assert_eq!(ex.code(), "ERR_KEY_SCHEME_MISMATCH");
        assert_eq!(ex.op(), Some("compare"));
    }

    #[test]
    fn test_display_includes_context() {
        let ex = ExError::new(ExErrorKind::Io)
            .with_op("open_csv")
            .with_message("no such file")
            .with_source_name("a.csv");
        let rendered = ex.to_string();
        assert!(rendered.starts_with("[ERR_IO]"));
        assert!(rendered.contains("'open_csv'"));
        assert!(rendered.contains("(source: a.csv)"));
    }

    #[test]
    fn test_serde_json_error_converts() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let converted: MerkleDiffError = err.into();
        assert!(matches!(converted, MerkleDiffError::Serialization { .. }));
    }
}
