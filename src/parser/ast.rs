//! Concrete syntax tree produced by the parser (C2).
//!
//! Borrows from the input string throughout, following the teacher's
//! `open_cypher_parser::ast` convention of lifetime-parameterized AST
//! nodes rather than owned `String`s.

#[derive(Debug, Clone, PartialEq)]
pub struct PathElem<'a> {
    pub name: &'a str,
    pub alias: Option<&'a str>,
}

/// The optional trailing extension of a `query_path`: an explicit
/// comma-separated column list (which is also how a trailing `*` or
/// terminator is expressed, since neither is a valid bare `path_elem`).
#[derive(Debug, Clone, PartialEq)]
pub enum Tail<'a> {
    Columns(Vec<&'a str>),
    Terminator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryPath<'a> {
    pub elems: Vec<PathElem<'a>>,
    pub tail: Option<Tail<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Lt,
    Le,
    Ne,
    Ge,
    Gt,
    Like,
    ILike,
}

impl CmpOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Ne => "<>",
            CmpOp::Ge => ">=",
            CmpOp::Gt => ">",
            CmpOp::Like => "LIKE",
            CmpOp::ILike => "ILIKE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    QuotedString(&'a str),
    Number(&'a str),
    Null,
}

/// `cond_path` (prefix `:` suffix) vs `cond_full_path` (prefix `.` column).
#[derive(Debug, Clone, PartialEq)]
pub enum CondPath<'a> {
    Deep {
        prefix: Vec<PathElem<'a>>,
        suffix: Vec<PathElem<'a>>,
    },
    Shallow {
        prefix: Vec<PathElem<'a>>,
        column: &'a str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition<'a> {
    pub path: CondPath<'a>,
    pub op: CmpOp,
    pub value: Value<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Component<'a> {
    Path(QueryPath<'a>),
    Condition(Condition<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query<'a> {
    pub components: Vec<Component<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input<'a> {
    Query(Query<'a>),
    Set { key: &'a str, value: &'a str },
    Alias { name: &'a str, table: &'a str },
}
