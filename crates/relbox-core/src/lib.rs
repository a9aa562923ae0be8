//! relbox core - pure mapping engine
//!
//! This crate holds everything about object-relational mapping that does not
//! need a database connection:
//! - Class declarations (`ClassDecl`) and the `Record` accessor trait
//! - Schema Catalog: validated `EntitySchema` derivation
//! - Condition Builder: composable, parameterized `WHERE` fragments
//! - SQL Builder: DDL, DML and the joined entity query
//! - Error and logging facilities shared with the store crate

pub use relbox_core_types as core_types;

pub mod catalog;
pub mod condition;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod sql;
pub mod value;

// Re-export commonly used types
pub use catalog::{describe, schema_of};
pub use condition::{Comparison, Condition};
pub use errors::{ExError, ExErrorKind, RelboxError, Result};
pub use model::{
    Cardinality, ClassDecl, ColumnAttrs, ColumnDescriptor, EntitySchema, FieldType, Record,
    RelationDescriptor, StorageKind,
};
pub use sql::{OrderClause, ValueMap};
pub use value::Value;
