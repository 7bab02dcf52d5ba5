//! Repindex Common - Core types and utilities shared across all crates
//!
//! This crate provides the foundational types used throughout repindex:
//! - `IdAndVersion`: The identifier of every table-like object
//! - `TableType`, `ObjectType`, `ReplicationType`, `SubType`: Closed domain enums
//! - `SqlContext`: Whether SQL is generated for an index build or a user query
//! - `Error`: Unified error types

pub mod error;
pub mod id;
pub mod types;

pub use error::{Error, Result};
pub use id::IdAndVersion;
pub use types::{
    ChangeMessage, ChangeType, ObjectType, ReplicationType, SqlContext, SubType, TableType,
};
