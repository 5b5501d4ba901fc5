//! `\set` and `\alias`, the two out-of-band command forms (spec.md §4.2, §4.9).

use nom::{character::complete::char, combinator::opt, IResult, Parser};

use super::ast::Input;
use super::common::{name, quoted_string, signed_number, ws1};
use super::errors::RawParseError;

type PResult<'a, O> = IResult<&'a str, O, RawParseError<'a>>;

/// `set := "\set" NAME VALUE`
pub fn set_command(input: &str) -> PResult<'_, Input<'_>> {
    let (input, _) = nom::bytes::complete::tag("\\set").parse(input)?;
    let (input, _) = ws1(input)?;
    let (input, key) = name(input)?;
    let (input, _) = ws1(input)?;
    let (input, value) = nom::branch::alt((quoted_string, signed_number)).parse(input)?;
    Ok((input, Input::Set { key, value }))
}

/// `alias := "\alias" NAME "@"? NAME`
pub fn alias_command(input: &str) -> PResult<'_, Input<'_>> {
    let (input, _) = nom::bytes::complete::tag("\\alias").parse(input)?;
    let (input, _) = ws1(input)?;
    let (input, alias_name) = name(input)?;
    let (input, _) = ws1(input)?;
    let (input, _) = opt(char('@')).parse(input)?;
    let (input, table) = name(input)?;
    Ok((
        input,
        Input::Alias {
            name: alias_name,
            table,
        },
    ))
}
