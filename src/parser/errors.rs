//! Parser error type.
//!
//! Modeled on the teacher's `OpenCypherParsingError`: a `nom::error::ParseError`
//! + `ContextError` implementation that accumulates `(remaining_input, context)`
//! pairs as the parser unwinds, then renders them as a single line.

use nom::error::{ContextError, ParseError as NomParseError};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Internal accumulator used while nom unwinds a failed parse; converted
/// into the crate's `ParseError` once parsing is abandoned.
#[derive(Debug, PartialEq)]
pub struct RawParseError<'a> {
    pub errors: Vec<(&'a str, &'static str)>,
}

impl<'a> NomParseError<&'a str> for RawParseError<'a> {
    fn from_error_kind(input: &'a str, _kind: nom::error::ErrorKind) -> Self {
        RawParseError {
            errors: vec![(input, "unable to parse")],
        }
    }

    fn append(input: &'a str, _kind: nom::error::ErrorKind, mut other: Self) -> Self {
        other.errors.push((input, "unable to parse"));
        other
    }
}

impl<'a> ContextError<&'a str> for RawParseError<'a> {
    fn add_context(input: &'a str, ctx: &'static str, mut other: Self) -> Self {
        other.errors.push((input, ctx));
        other
    }
}

impl<'a> From<nom::error::Error<&'a str>> for RawParseError<'a> {
    fn from(err: nom::error::Error<&'a str>) -> Self {
        RawParseError {
            errors: vec![(err.input, "unable to parse")],
        }
    }
}

impl<'a> From<RawParseError<'a>> for ParseError {
    fn from(raw: RawParseError<'a>) -> Self {
        match raw.errors.last() {
            Some((remaining, ctx)) => ParseError::new(format!("{}: {:?}", ctx, remaining)),
            None => ParseError::new("unable to parse"),
        }
    }
}

impl<'a> From<nom::Err<RawParseError<'a>>> for ParseError {
    fn from(err: nom::Err<RawParseError<'a>>) -> Self {
        match err {
            nom::Err::Incomplete(_) => ParseError::new("incomplete input"),
            nom::Err::Error(e) | nom::Err::Failure(e) => e.into(),
        }
    }
}
