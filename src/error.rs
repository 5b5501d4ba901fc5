//! Crate-wide error type.
//!
//! Every failure mode the core can produce collapses into a single
//! tagged `ScryError` by the time it reaches the command dispatcher
//! (C8), which prints one line and returns to the prompt. Module-local
//! error types (`parser::errors::ParseError`, `resolve::errors::ResolveError`,
//! `driver::DriverError`) carry richer detail internally and convert up
//! via `#[from]`.

use thiserror::Error;

use crate::driver::DriverError;
use crate::parser::errors::ParseError;
use crate::resolve::errors::ResolveError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScryError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("{0}")]
    Driver(#[from] DriverError),

    #[error("{0}")]
    Dispatch(String),
}

pub type ScryResult<T> = Result<T, ScryError>;
