//! Errors produced while building the alias table (C3).
//!
//! Message text is load-bearing: spec.md §8's error-scenario table
//! asserts these strings verbatim, so wording changes here are wording
//! changes to the contract.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown table or column: {0}")]
    UnknownTableOrColumn(String),

    #[error("No known join: {schema}.{from} to {to}")]
    NoKnownJoin {
        schema: String,
        from: String,
        to: String,
    },

    #[error("No known join of {from} to {to}")]
    NoKnownJoinOf { from: String, to: String },

    #[error("Unable to resolve schema for {0}")]
    UnresolvedSchema(String),

    #[error("Existing alias {alias} for table {existing} reused on {attempted}")]
    AliasTableConflict {
        alias: String,
        existing: String,
        attempted: String,
    },

    #[error("Existing alias {alias} for table {table} on path '{existing_path}' reused on '{attempted_path}'")]
    AliasPathConflict {
        alias: String,
        table: String,
        existing_path: String,
        attempted_path: String,
    },

    #[error("Unfinished aliases: {0}")]
    UnfinishedAliases(String),
}
