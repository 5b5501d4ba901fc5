//! Grammar & Parser (C2): tokenizes and parses a query string into the
//! concrete syntax tree of `ast`.

pub mod ast;
pub mod command;
pub mod common;
pub mod condition;
pub mod errors;
pub mod path;

use nom::{branch::alt, multi::many0, sequence::preceded, IResult, Parser};

use ast::{Component, Input, Query};
use errors::{ParseError, RawParseError};

type PResult<'a, O> = IResult<&'a str, O, RawParseError<'a>>;

fn component(input: &str) -> PResult<'_, Component<'_>> {
    alt((
        condition::condition.map(Component::Condition),
        path::query_path.map(Component::Path),
    ))
    .parse(input)
}

fn query(input: &str) -> PResult<'_, Query<'_>> {
    let (input, first) = component(input)?;
    let mut components = vec![first];
    let (input, rest) = many0(preceded(common::ws1, component)).parse(input)?;
    components.extend(rest);
    Ok((input, Query { components }))
}

fn start(input: &str) -> PResult<'_, Input<'_>> {
    alt((
        command::set_command,
        command::alias_command,
        query.map(Input::Query),
    ))
    .parse(input)
}

/// Parses `input` as a whole; a partial match is an error (spec.md §4.2:
/// "the whole input must consume; partial matches are errors").
pub fn parse(input: &str) -> Result<Input<'_>, ParseError> {
    let trimmed = input.trim();
    let (remaining, parsed) = start(trimmed).map_err(ParseError::from)?;
    let remaining = remaining.trim();
    if !remaining.is_empty() {
        return Err(ParseError::new(format!(
            "unexpected trailing input: {:?}",
            remaining
        )));
    }
    Ok(parsed)
}

/// Completion mode (spec.md §4.2): tries progressively shorter prefixes
/// of `input` until one parses as a whole `start`, returning the parsed
/// value and the number of bytes consumed. Used by the REPL's completer
/// to recover the alias table for an in-progress line; the completer
/// itself (ranking/matching candidates) is out of scope per spec.md §1.
pub fn parse_longest_valid_prefix(input: &str) -> Option<(Input<'_>, usize)> {
    for len in (1..=input.len()).rev() {
        if !input.is_char_boundary(len) {
            continue;
        }
        let prefix = &input[..len];
        if let Ok(parsed) = parse(prefix) {
            return Some((parsed, len));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::{CmpOp, CondPath, Tail};

    #[test]
    fn parses_simple_query() {
        let parsed = parse("scry.authors.name").unwrap();
        match parsed {
            Input::Query(q) => assert_eq!(q.components.len(), 1),
            _ => panic!("expected query"),
        }
    }

    #[test]
    fn parses_multi_component_query() {
        let parsed = parse(r#"scry.books@b.year b.title = "Fellowship of the Rings""#).unwrap();
        match parsed {
            Input::Query(q) => assert_eq!(q.components.len(), 2),
            _ => panic!("expected query"),
        }
    }

    #[test]
    fn parses_columns_list() {
        let parsed = parse("scry.books.title,year").unwrap();
        match parsed {
            Input::Query(q) => match &q.components[0] {
                Component::Path(p) => {
                    assert_eq!(p.tail, Some(Tail::Columns(vec!["title", "year"])))
                }
                _ => panic!("expected path component"),
            },
            _ => panic!("expected query"),
        }
    }

    #[test]
    fn parses_deep_condition_query() {
        let parsed = parse(
            r#"scry.authors.books.title authors:books.series_books.series.name = "Lord of the Rings""#,
        )
        .unwrap();
        match parsed {
            Input::Query(q) => {
                assert_eq!(q.components.len(), 2);
                match &q.components[1] {
                    Component::Condition(c) => {
                        assert!(matches!(c.path, CondPath::Deep { .. }));
                        assert_eq!(c.op, CmpOp::Eq);
                    }
                    _ => panic!("expected condition"),
                }
            }
            _ => panic!("expected query"),
        }
    }

    #[test]
    fn rejects_partial_match() {
        assert!(parse("authors.books garbage(((").is_err());
    }

    #[test]
    fn parses_set_command() {
        let parsed = parse(r#"\set complete_style "column""#).unwrap();
        assert_eq!(
            parsed,
            Input::Set {
                key: "complete_style",
                value: "column"
            }
        );
    }

    #[test]
    fn parses_alias_command() {
        let parsed = parse("\\alias a @books").unwrap();
        assert_eq!(
            parsed,
            Input::Alias {
                name: "a",
                table: "books"
            }
        );
    }

    #[test]
    fn longest_prefix_recovers_from_trailing_garbage() {
        let (parsed, len) = parse_longest_valid_prefix("scry.authors.name $$$").unwrap();
        assert_eq!(len, "scry.authors.name".len());
        match parsed {
            Input::Query(q) => assert_eq!(q.components.len(), 1),
            _ => panic!("expected query"),
        }
    }
}
