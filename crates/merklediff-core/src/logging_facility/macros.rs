//! Operation boundary macros.
//!
//! Each macro emits one event with `component`, `op` and `event` set, plus
//! any extra `key = value` fields the caller appends. Event names come from
//! `merklediff_core_types::schema` via the `core_types` re-export, so callers
//! only depend on this crate.

/// Emit the `start` event of an operation
///
/// ```
/// # use merklediff_core::log_op_start;
/// log_op_start!("build_from_rows");
/// log_op_start!("build_from_rows", row_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START
            $(, $($field)+)?
        )
    };
}

/// Emit the `end` event of an operation; `duration_ms` is required
///
/// ```
/// # use merklediff_core::log_op_end;
/// log_op_end!("compare", duration_ms = 42);
/// log_op_end!("compare", duration_ms = 42, range_count = 0);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)+)?
        )
    };
}

/// Emit the `end_error` event of an operation
///
/// `$err` is anything convertible into [`ExError`](crate::errors::ExError),
/// including `&MerkleDiffError`. The kind, stable code and message are
/// recorded as `err.kind`, `err.code` and `err.message`.
///
/// ```
/// # use merklediff_core::{log_op_error, errors::MerkleDiffError};
/// let err = MerkleDiffError::KeySchemeMismatch { left: 1, right: 2 };
/// log_op_error!("compare", &err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.message = ex_err.message()
            $(, $($field)+)?
        )
    }};
}
