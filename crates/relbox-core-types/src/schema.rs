//! Canonical schema constants for structured logging and events
//!
//! These constants keep log fields consistent across the core and store crates.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_TABLE: &str = "table";
pub const FIELD_ENTITY_ID: &str = "entity_id";
pub const FIELD_FIELD: &str = "field";

// Sizes
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_ARG_COUNT: &str = "arg_count";
pub const FIELD_GROUP_COUNT: &str = "group_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
