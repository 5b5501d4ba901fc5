//! Driver contract (C0): the trait boundary between the core pipeline
//! and an actual database. Kept minimal and blocking, mirroring the
//! original Python source's `psycopg2` usage (spec.md §5: scry is
//! single-threaded, one query in flight at a time).

pub mod errors;
pub mod postgres;

pub use errors::DriverError;
pub use postgres::PostgresDriver;

/// A database cell, typed just enough for the reshaper and printer to
/// do their job (spec.md §4.6-4.7 only care about NULL-ness and display
/// formatting, never about arithmetic).
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => write!(f, "NULL"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// The three introspection queries of spec.md §6, each a blocking call
/// returning the documented row shape directly - the catalog builder
/// doesn't care how the rows were produced.
pub trait SchemaIntrospector {
    fn all_columns(&mut self) -> Result<Vec<(String, String, String)>, DriverError>;

    fn unique_constraints(
        &mut self,
    ) -> Result<Vec<(String, String, String, String, String)>, DriverError>;

    fn foreign_keys(
        &mut self,
    ) -> Result<Vec<(String, String, String, String, String, String)>, DriverError>;
}

/// A blocking row cursor over the result of one generated `SELECT`.
pub trait RowSource {
    fn execute(
        &mut self,
        sql: &str,
    ) -> Result<Box<dyn Iterator<Item = Vec<CellValue>>>, DriverError>;
}
