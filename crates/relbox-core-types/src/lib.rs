//! Core types shared across relbox facilities
//!
//! This crate provides the canonical field keys and event names used by
//! the structured logging facility and the error facility.

pub mod schema;
