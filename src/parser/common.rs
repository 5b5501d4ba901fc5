//! Shared lexical primitives: whitespace, `NAME`, `COLUMN`, `VALUE`.
//!
//! Follows the teacher's `open_cypher_parser::common` convention of one
//! small combinator per lexical rule, composed with `nom::Parser`.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, one_of},
    combinator::{opt, recognize},
    multi::many0,
    sequence::pair,
    IResult, Parser,
};

use super::errors::RawParseError;

type PResult<'a, O> = IResult<&'a str, O, RawParseError<'a>>;

/// Horizontal whitespace used as the component separator; significant
/// per spec.md's grammar note ("all whitespace between components is
/// significant as a separator").
pub fn ws0(input: &str) -> PResult<'_, &str> {
    multispace0(input)
}

pub fn ws1(input: &str) -> PResult<'_, &str> {
    nom::character::complete::multispace1(input)
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_cont(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `NAME := [A-Za-z_][A-Za-z_0-9]*`
pub fn name(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        take_while1(is_name_start),
        take_while(is_name_cont),
    ))
    .parse(input)
}

/// `COLUMN := NAME | "*"`
pub fn column(input: &str) -> PResult<'_, &str> {
    alt((recognize(char('*')), name)).parse(input)
}

/// `VALUE := quoted-string | signed-number | "NULL"`, without the `NULL`
/// literal which callers distinguish separately (see `parser::ast::Value`).
pub fn quoted_string(input: &str) -> PResult<'_, &str> {
    let (input, _) = char('"').parse(input)?;
    let (input, body) = recognize(many0(alt((
        recognize(pair(char('\\'), nom::character::complete::anychar)),
        recognize(nom::character::complete::none_of("\"\\")),
    ))))
    .parse(input)?;
    let (input, _) = char('"').parse(input)?;
    Ok((input, body))
}

pub fn signed_number(input: &str) -> PResult<'_, &str> {
    recognize((
        opt(one_of("+-")),
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while1(|c: char| c.is_ascii_digit()))),
    ))
    .parse(input)
}

pub fn keyword(kw: &'static str) -> impl FnMut(&str) -> PResult<'_, &str> {
    move |input| tag(kw).parse(input)
}
