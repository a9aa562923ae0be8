//! Store configuration
//!
//! Everything a `Database` needs is passed in explicitly through
//! [`StoreConfig`]; there is no ambient connection state. Configs can be
//! built in code or read from TOML:
//!
//! ```toml
//! journal_mode = "wal"
//! foreign_keys = true
//!
//! [location]
//! kind = "file"
//! path = "school.db"
//!
//! [hydration]
//! max_depth = 4
//! on_failure = "abort"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::errors::{ConfigError, Result};

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatabaseLocation {
    #[default]
    InMemory,
    File {
        path: PathBuf,
    },
}

/// SQLite `journal_mode` pragma values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    Delete,
    Truncate,
    Persist,
    Memory,
    Wal,
    Off,
}

impl JournalMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
            Self::Persist => "PERSIST",
            Self::Memory => "MEMORY",
            Self::Wal => "WAL",
            Self::Off => "OFF",
        }
    }
}

/// What a read does with a row group that cannot be reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Drop the element, log a warning and carry on.
    #[default]
    Skip,
    /// Return the error to the caller.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HydrationOptions {
    /// Relation nesting depth past which related objects are left unset.
    pub max_depth: usize,
    /// Share one fetch per distinct related row within an owner group.
    pub dedup_related: bool,
    pub on_failure: FailurePolicy,
}

impl Default for HydrationOptions {
    fn default() -> Self {
        Self {
            max_depth: 8,
            dedup_related: true,
            on_failure: FailurePolicy::Skip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub location: DatabaseLocation,
    /// Left untouched when `None`.
    pub journal_mode: Option<JournalMode>,
    pub foreign_keys: bool,
    pub hydration: HydrationOptions,
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: DatabaseLocation::File { path: path.into() },
            ..Self::default()
        }
    }

    pub fn with_journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = Some(mode);
        self
    }

    pub fn with_hydration(mut self, hydration: HydrationOptions) -> Self {
        self.hydration = hydration;
        self
    }

    /// Parse a TOML document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error for malformed TOML or unknown enum values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config = toml::from_str(source).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error when the file cannot be read, otherwise as
    /// [`StoreConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}
