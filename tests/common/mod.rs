//! Shared fixtures for the integration tests: a fixed book/author
//! catalog and a canned-row `FakeDriver` standing in for a live database
//! connection (spec.md §6 treats the driver as an external collaborator).

use scry::catalog::Catalog;
use scry::driver::{CellValue, DriverError, RowSource};

pub fn book_catalog() -> Catalog {
    Catalog::builder()
        .add_columns([
            ("scry".into(), "authors".into(), "id".into()),
            ("scry".into(), "authors".into(), "name".into()),
            ("scry".into(), "books".into(), "id".into()),
            ("scry".into(), "books".into(), "title".into()),
            ("scry".into(), "books".into(), "year".into()),
            ("scry".into(), "books".into(), "author_id".into()),
            ("scry".into(), "series".into(), "id".into()),
            ("scry".into(), "series".into(), "name".into()),
            ("scry".into(), "series_books".into(), "book_id".into()),
            ("scry".into(), "series_books".into(), "series_id".into()),
            ("scry".into(), "users".into(), "id".into()),
            ("scry".into(), "favorites".into(), "user_id".into()),
            ("scry".into(), "favorites".into(), "book_id".into()),
        ])
        .add_constraints([
            ("scry".into(), "authors".into(), "authors_pkey".into(), "PRIMARY KEY".into(), "id".into()),
            ("scry".into(), "books".into(), "books_pkey".into(), "PRIMARY KEY".into(), "id".into()),
            ("scry".into(), "series".into(), "series_pkey".into(), "PRIMARY KEY".into(), "id".into()),
            ("scry".into(), "users".into(), "users_pkey".into(), "PRIMARY KEY".into(), "id".into()),
        ])
        .add_foreign_keys([
            ("scry".into(), "books".into(), "author_id".into(), "scry".into(), "authors".into(), "id".into()),
            ("scry".into(), "series_books".into(), "book_id".into(), "scry".into(), "books".into(), "id".into()),
            ("scry".into(), "series_books".into(), "series_id".into(), "scry".into(), "series".into(), "id".into()),
            ("scry".into(), "favorites".into(), "book_id".into(), "scry".into(), "books".into(), "id".into()),
            ("scry".into(), "favorites".into(), "user_id".into(), "scry".into(), "users".into(), "id".into()),
        ])
        .build()
}

/// A `RowSource` that ignores the SQL it's handed and always returns
/// one fixed batch of rows - enough to drive the reshaper and printer
/// end to end without a real database.
pub struct FakeDriver {
    pub rows: Vec<Vec<CellValue>>,
}

impl FakeDriver {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        FakeDriver { rows }
    }
}

impl RowSource for FakeDriver {
    fn execute(&mut self, _sql: &str) -> Result<Box<dyn Iterator<Item = Vec<CellValue>>>, DriverError> {
        Ok(Box::new(self.rows.clone().into_iter()))
    }
}
