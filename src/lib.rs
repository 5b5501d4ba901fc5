//! scry - an interactive, dotted-path query language over a relational
//! catalog.
//!
//! A query string such as `authors.books.title` or
//! `books@b.year b.authors.name = "Tolkien"` is parsed into a concrete
//! syntax tree, resolved against an introspected schema (tables, columns,
//! keys, foreign keys), compiled into a single `SELECT` with the
//! necessary `LEFT JOIN`s and `WHERE` clauses, and the flat result set is
//! folded back into a nested, de-duplicated tree for display.

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod it;
pub mod parser;
pub mod printer;
pub mod reshape;
pub mod resolve;
pub mod sql;

pub use error::ScryError;
