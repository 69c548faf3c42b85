//! Correlation types for tracking a single comparison run
//!
//! Every log line emitted while two sources are loaded, hashed and diffed
//! carries the same `comparison_id`, so a run can be isolated from
//! interleaved output.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one comparison run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComparisonId(String);

impl ComparisonId {
    /// Generate a new identifier using UUIDv7 (time ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for ComparisonId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ComparisonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through a comparison for correlation
#[derive(Debug, Clone)]
pub struct ComparisonContext {
    pub comparison_id: ComparisonId,
    pub left_label: String,
    pub right_label: String,
}

impl ComparisonContext {
    /// Create a new context with a fresh ComparisonId
    pub fn new(left_label: impl Into<String>, right_label: impl Into<String>) -> Self {
        Self {
            comparison_id: ComparisonId::new(),
            left_label: left_label.into(),
            right_label: right_label.into(),
        }
    }

    /// Replace the generated id with an existing one
    pub fn with_comparison_id(mut self, comparison_id: ComparisonId) -> Self {
        self.comparison_id = comparison_id;
        self
    }
}
