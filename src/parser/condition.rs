//! `condition`, `cond_path` / `cond_full_path`, `cmp_op`, `VALUE`.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::char,
    combinator::cut,
    error::context,
    IResult, Parser,
};

use super::ast::{CmpOp, CondPath, Condition, Value};
use super::common::{quoted_string, signed_number};
use super::errors::RawParseError;
use super::path::{path_elem, path_elem_chain};

type PResult<'a, O> = IResult<&'a str, O, RawParseError<'a>>;

/// `cmp_op := "=" | "<" | "<=" | "<>" | ">=" | ">" | "LIKE"/i | "ILIKE"/i`
///
/// Longer operators are tried before their prefixes (`<=`/`<>` before
/// `<`, `>=` before `>`) and `ILIKE` before `LIKE` so the match is
/// unambiguous.
fn cmp_op(input: &str) -> PResult<'_, CmpOp> {
    alt((
        tag("<=").map(|_| CmpOp::Le),
        tag("<>").map(|_| CmpOp::Ne),
        tag(">=").map(|_| CmpOp::Ge),
        tag("<").map(|_| CmpOp::Lt),
        tag(">").map(|_| CmpOp::Gt),
        tag("=").map(|_| CmpOp::Eq),
        tag_no_case("ILIKE").map(|_| CmpOp::ILike),
        tag_no_case("LIKE").map(|_| CmpOp::Like),
    ))
    .parse(input)
}

fn value(input: &str) -> PResult<'_, Value<'_>> {
    alt((
        tag_no_case("NULL").map(|_| Value::Null),
        quoted_string.map(Value::QuotedString),
        signed_number.map(Value::Number),
    ))
    .parse(input)
}

/// Parses `cond_prefix`, stopping either at a `:` (cond_path) or at the
/// point where a trailing `.column cmp_op` can be recognized
/// (cond_full_path). Returns the resolved `CondPath` with the operator
/// still to be parsed by the caller.
fn cond_path(input: &str) -> PResult<'_, CondPath<'_>> {
    let (mut input, first) = path_elem(input)?;
    let mut prefix = vec![first];

    loop {
        if let Some(rest) = input.strip_prefix(':') {
            let (rest, suffix) = path_elem_chain(rest)?;
            return Ok((rest, CondPath::Deep { prefix, suffix }));
        }

        let Some(rest) = input.strip_prefix('.') else {
            // No `:` and no `.`: a condition always needs one of the two
            // before its comparison operator.
            return Err(nom::Err::Error(RawParseError {
                errors: vec![(input, "expected ':' or '.' in condition path")],
            }));
        };

        // Try the cond_full_path reading: "." column cmp_op.
        if let Ok((after_col, col)) = super::common::column(rest) {
            if cmp_op(after_col).is_ok() {
                return Ok((
                    after_col,
                    CondPath::Shallow {
                        prefix,
                        column: col,
                    },
                ));
            }
        }

        // Otherwise this dot introduces another prefix element.
        let (rest, elem) = path_elem(rest)?;
        prefix.push(elem);
        input = rest;
    }
}

pub fn condition(input: &str) -> PResult<'_, Condition<'_>> {
    let (input, path) = cond_path(input)?;
    let (input, op) = context("expected comparison operator", cut(cmp_op)).parse(input)?;
    let (input, value) = context("expected a value", cut(value)).parse(input)?;
    Ok((input, Condition { path, op, value }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shallow_condition() {
        let (rest, c) = condition(r#"b.title = "Fellowship of the Rings""#).unwrap();
        assert_eq!(rest, "");
        assert_eq!(c.op, CmpOp::Eq);
        match c.path {
            CondPath::Shallow { column, .. } => assert_eq!(column, "title"),
            _ => panic!("expected shallow path"),
        }
    }

    #[test]
    fn parses_deep_condition() {
        let (rest, c) =
            condition(r#"authors:books.series_books.series.name = "Lord of the Rings""#).unwrap();
        assert_eq!(rest, "");
        match c.path {
            CondPath::Deep { prefix, suffix } => {
                assert_eq!(prefix.len(), 1);
                assert_eq!(suffix.len(), 3);
            }
            _ => panic!("expected deep path"),
        }
    }

    #[test]
    fn parses_null_rewrite_value() {
        let (rest, c) = condition("a.b = NULL").unwrap();
        assert_eq!(rest, "");
        assert_eq!(c.value, Value::Null);
    }
}
