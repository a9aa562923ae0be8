//! Error handling for relbox-store
//!
//! Wraps relbox-core ExError with store-specific helpers

use relbox_core::errors::{ExError, ExErrorKind, RelboxError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Errors raised while loading a `StoreConfig`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl From<ConfigError> for ExError {
    fn from(err: ConfigError) -> Self {
        let kind = match err {
            ConfigError::Read { .. } => ExErrorKind::Io,
            ConfigError::Parse(_) => ExErrorKind::Config,
        };
        ExError::new(kind)
            .with_op("load_config")
            .with_message(err.to_string())
    }
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a hydration error for one row group
pub fn hydration_error(table: &str, reason: impl Into<String>) -> ExError {
    RelboxError::Hydration {
        table: table.to_string(),
        reason: reason.into(),
    }
    .into()
}

/// Create an affected-row-count mismatch error
pub fn row_count_mismatch(table: &str, op: &str, expected: usize, actual: usize) -> ExError {
    ExError::from(RelboxError::ConstraintViolation {
        table: table.to_string(),
        op: op.to_string(),
        expected,
        actual,
    })
    .with_op(op)
}
