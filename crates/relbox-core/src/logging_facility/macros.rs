//! Canonical logging macros
//!
//! A unit of work logs one `start` event and then exactly one of `end` or
//! `end_error`. Extra `key = value` fields (usually `table`, `entity_id`,
//! `row_count`) follow the canonical ones.

/// Start of a unit of work.
///
/// ```
/// # use relbox_core::log_op_start;
/// log_op_start!("save");
/// log_op_start!("save", table = "Student", entity_id = 0);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Successful end of a unit of work, with its duration.
///
/// ```
/// # use relbox_core::log_op_end;
/// log_op_end!("query", duration_ms = 3, row_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Failed end of a unit of work.
///
/// `$err` is anything convertible into `ExError`, so the event always
/// carries `err.kind` and the stable `err.code`.
///
/// ```
/// # use relbox_core::{log_op_error, errors::RelboxError};
/// let err = RelboxError::NotPersisted { table: "Student".to_string() };
/// log_op_error!("remove", err, duration_ms = 1, table = "Student");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($($field)*)?
        );
    }};
}
