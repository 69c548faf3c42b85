//! Canonical schema constants for structured logging and events
//!
//! These constants keep log field names identical across the core, the row
//! sources and the CLI.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Tree and diff measurements
pub const FIELD_LEAF_COUNT: &str = "leaf_count";
pub const FIELD_KEY_LEN: &str = "key_len";
pub const FIELD_RANGE_COUNT: &str = "range_count";
pub const FIELD_NODES_VISITED: &str = "nodes_visited";

// Row sources
pub const FIELD_ROW_COUNT: &str = "row_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";
pub const FIELD_ERR_MESSAGE: &str = "err.message";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
