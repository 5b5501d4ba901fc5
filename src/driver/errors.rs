//! Driver-facing error type (C0): anything the database connection can
//! go wrong with, kept separate from parse/resolve errors so the core
//! pipeline never has to know about connection strings or wire
//! protocols.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DriverError {
    #[error("failed to connect to database: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("introspection query failed: {0}")]
    Introspection(String),
}
