//! Database connection management
//!
//! `Database` owns one SQLite connection opened from a [`StoreConfig`] and
//! hands out repositories that borrow it.

#![allow(clippy::result_large_err)]

use crate::config::{DatabaseLocation, StoreConfig};
use crate::entity::Entity;
use crate::errors::{from_rusqlite, Result};
use crate::repo::Repository;
use rusqlite::{Connection, OptionalExtension};

/// An open database and the configuration it was opened with.
pub struct Database {
    conn: Connection,
    config: StoreConfig,
}

impl Database {
    /// Open and configure the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a `Persistence` error when the file cannot be opened or a
    /// pragma is rejected.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let conn = match &config.location {
            DatabaseLocation::InMemory => Connection::open_in_memory(),
            DatabaseLocation::File { path } => Connection::open(path),
        }
        .map_err(from_rusqlite)?;
        configure(&conn, &config)?;
        tracing::debug!(location = ?config.location, "database opened");
        Ok(Self { conn, config })
    }

    /// Open a fresh in-memory database with default settings.
    ///
    /// # Errors
    ///
    /// Same as [`Database::open`].
    pub fn open_in_memory() -> Result<Self> {
        Self::open(StoreConfig::in_memory())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Repository for `T`, bound to this connection.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaInvalid` error when `T`'s declaration is not a valid
    /// mapped class.
    pub fn repository<T: Entity>(&self) -> Result<Repository<'_, T>> {
        Repository::new(&self.conn, self.config.hydration.clone())
    }
}

/// Apply the connection pragmas from `config`.
pub fn configure(conn: &Connection, config: &StoreConfig) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", config.foreign_keys)
        .map_err(from_rusqlite)?;

    if let Some(mode) = config.journal_mode {
        conn.pragma_update(None, "journal_mode", mode.as_str())
            .map_err(from_rusqlite)?;
    }

    Ok(())
}

/// Whether a table with this name exists.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;
    Ok(found.is_some())
}
