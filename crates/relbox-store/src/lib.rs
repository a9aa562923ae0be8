//! relbox store - SQLite runtime for the mapping engine
//!
//! Provides:
//! - `Database`: one configured SQLite connection, opened from `StoreConfig`
//! - `Repository`: save, remove, clear and drop as atomic units of work
//! - `Query` and `Results`: joined queries and object graph reconstruction
//!
//! ```
//! use relbox_store::{Database, StoreConfig};
//!
//! let db = Database::open(StoreConfig::in_memory()).unwrap();
//! assert!(db.config().hydration.dedup_related);
//! ```

pub mod bind;
pub mod config;
pub mod db;
pub mod entity;
pub mod errors;
pub mod query;
pub mod repo;
pub mod results;

// Re-export key types
pub use config::{DatabaseLocation, FailurePolicy, HydrationOptions, JournalMode, StoreConfig};
pub use db::Database;
pub use entity::{Entity, Related};
pub use errors::Result;
pub use query::Query;
pub use repo::Repository;
pub use results::{HydrationStats, Results};
