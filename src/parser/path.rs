//! `path_elem`, `query_path`, and the shared prefix/suffix chains used by
//! conditions.

use nom::{character::complete::char, combinator::opt, sequence::preceded, IResult, Parser};

use super::ast::{PathElem, QueryPath, Tail};
use super::common::{column, name};
use super::errors::RawParseError;

type PResult<'a, O> = IResult<&'a str, O, RawParseError<'a>>;

/// `path_elem := NAME ("@" NAME)?`
pub fn path_elem(input: &str) -> PResult<'_, PathElem<'_>> {
    let (input, elem_name) = name(input)?;
    let (input, alias) = opt(preceded(char('@'), name)).parse(input)?;
    Ok((
        input,
        PathElem {
            name: elem_name,
            alias,
        },
    ))
}

/// `column ("," column)*`
fn columns_list(input: &str) -> PResult<'_, Vec<&str>> {
    let (mut input, first) = column(input)?;
    let mut cols = vec![first];
    loop {
        match opt(preceded(char(','), column)).parse(input)? {
            (rest, Some(c)) => {
                cols.push(c);
                input = rest;
            }
            (rest, None) => {
                input = rest;
                break;
            }
        }
    }
    Ok((input, cols))
}

/// A plain chain of path elements with no tail: used for `cond_prefix`
/// and `cond_suffix`, which never carry a trailing columns list or
/// terminator.
pub fn path_elem_chain(input: &str) -> PResult<'_, Vec<PathElem<'_>>> {
    let (mut input, first) = path_elem(input)?;
    let mut elems = vec![first];
    loop {
        match opt(preceded(char('.'), path_elem)).parse(input)? {
            (rest, Some(elem)) => {
                elems.push(elem);
                input = rest;
            }
            (rest, None) => {
                input = rest;
                break;
            }
        }
    }
    Ok((input, elems))
}

/// `query_path := path_elem ("." path_elem)* ("." columns | terminator)?`
///
/// A bare, unaliased trailing name (no following comma, not `*`) is
/// structurally indistinguishable from a one-element `columns` tail and
/// is kept as an ordinary `path_elem` so the chain can keep going if
/// another `.name` follows; a comma list, a `*`, or the `.,` terminator
/// always ends the production, matching spec.md §4.2.
pub fn query_path(input: &str) -> PResult<'_, QueryPath<'_>> {
    let (mut input, first) = path_elem(input)?;
    let mut elems = vec![first];
    let mut tail = None;

    loop {
        let Some(rest) = input.strip_prefix('.') else {
            break;
        };

        // terminator: "." ","
        if let Some(after_comma) = rest.strip_prefix(',') {
            input = after_comma;
            tail = Some(Tail::Terminator);
            break;
        }

        // "*" can only appear via the columns tail.
        if rest.starts_with('*') {
            let (rest, cols) = columns_list(rest)?;
            input = rest;
            tail = Some(Tail::Columns(cols));
            break;
        }

        // Otherwise: a plain path_elem, unless it's immediately followed
        // by a comma, in which case it's the head of a columns list.
        let (after_elem, elem) = path_elem(rest)?;
        if elem.alias.is_none() && after_elem.starts_with(',') {
            let (after_list, cols) = columns_list(rest)?;
            input = after_list;
            tail = Some(Tail::Columns(cols));
            break;
        }

        elems.push(elem);
        input = after_elem;
    }

    Ok((input, QueryPath { elems, tail }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_chain() {
        let (rest, qp) = query_path("authors.books.title").unwrap();
        assert_eq!(rest, "");
        assert_eq!(qp.elems.len(), 3);
        assert_eq!(qp.tail, None);
    }

    #[test]
    fn parses_alias() {
        let (rest, qp) = query_path("books@b.year").unwrap();
        assert_eq!(rest, "");
        assert_eq!(qp.elems[0].alias, Some("b"));
    }

    #[test]
    fn parses_columns_tail() {
        let (rest, qp) = query_path("books.title,year").unwrap();
        assert_eq!(rest, "");
        assert_eq!(
            qp.tail,
            Some(Tail::Columns(vec!["title", "year"]))
        );
    }

    #[test]
    fn parses_terminator() {
        let (rest, qp) = query_path("authors@a.,").unwrap();
        assert_eq!(rest, "");
        assert_eq!(qp.tail, Some(Tail::Terminator));
    }
}
