//! Repository layer: atomic units of work for one entity type

pub mod repository;

pub use repository::Repository;
