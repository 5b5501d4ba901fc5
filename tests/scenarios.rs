//! End-to-end scenario tests covering the literal worked examples and
//! error-scenario table of spec.md §8, exercised through the public
//! pipeline (parse → resolve → build IT → generate SQL → dispatch).

mod common;

use common::{book_catalog, FakeDriver};

use scry::dispatch::{self, Settings};
use scry::driver::CellValue;
use scry::it;
use scry::parser::ast::Input;
use scry::parser::parse;
use scry::resolve::{resolve, ResolveError};
use scry::sql::SqlGenerator;
use test_case::test_case;

fn query_sql(src: &str) -> String {
    let catalog = book_catalog();
    let settings = Settings::default();
    let query = match parse(src).unwrap() {
        Input::Query(q) => q,
        _ => panic!("expected a query"),
    };
    let resolved = resolve(&query, &catalog, &settings).unwrap();
    let tree = it::build(&resolved);
    SqlGenerator::default().generate(&tree, &catalog, 100).serialize()
}

fn query_err(src: &str) -> ResolveError {
    let catalog = book_catalog();
    let settings = Settings::default();
    let query = match parse(src).unwrap() {
        Input::Query(q) => q,
        _ => panic!("expected a query"),
    };
    resolve(&query, &catalog, &settings).unwrap_err()
}

#[test]
fn scenario_1_simple_column() {
    let sql = query_sql("scry.authors.name");
    assert!(sql.contains("FROM scry.authors"));
    assert!(sql.contains("authors.name"));
    assert!(!sql.contains("AS"));
    assert!(sql.ends_with("LIMIT 100"));
}

#[test]
fn scenario_2_comma_columns() {
    let sql = query_sql("scry.books.title,year");
    assert!(sql.contains("books.title"));
    assert!(sql.contains("books.year"));
    assert!(!sql.contains("AS"));
}

#[test]
fn scenario_3_join_to_parent() {
    let sql = query_sql("scry.books.authors.name");
    assert!(sql.contains("FROM scry.books"));
    assert!(sql.contains("LEFT JOIN scry.authors ON books.author_id = authors.id"));
    assert!(sql.contains("authors.name"));
}

#[test]
fn scenario_4_explicit_alias_with_condition() {
    let sql = query_sql(r#"scry.books@b.year b.title = "Fellowship of the Rings""#);
    assert!(sql.contains("FROM scry.books b"));
    assert!(sql.contains("b.year"));
    assert!(sql.contains("WHERE b.title = 'Fellowship of the Rings'"));
}

#[test]
fn scenario_5_deep_condition_correlated_subquery() {
    let sql = query_sql(
        r#"scry.authors.books.title authors:books.series_books.series.name = "Lord of the Rings""#,
    );
    assert!(sql.contains("FROM scry.authors"));
    assert!(sql.contains("LEFT JOIN scry.books ON authors.id = books.author_id"));
    assert!(sql.contains("books.title"));
    assert!(sql.contains("authors.id IN (SELECT scry.books.id FROM"));
    assert!(sql.contains("series.name = 'Lord of the Rings'"));
}

#[test]
fn scenario_6_terminator_suppresses_implicit_star() {
    let with_terminator = query_sql("scry.authors@a., a.name");
    let without = query_sql("scry.authors@a.name");
    assert_eq!(with_terminator, without);
}

#[test_case("books.authors.nam", "Unknown table or column: nam"; "unknown trailing name")]
#[test_case("asdf", "Unable to resolve schema for asdf"; "unresolved schema")]
#[test_case("books.asdf.foo", "Unknown table or column: asdf"; "unknown middle element")]
#[test_case("authors.series", "No known join of series to authors"; "no known join, reversed")]
#[test_case(
    "authors.books.authors.name authors.name",
    "Existing alias authors for table authors on path '' reused on 'authors.books'";
    "alias path conflict"
)]
#[test_case(
    "authors.books@b b.series_books@b",
    "Existing alias b for table books reused on series_books";
    "alias table conflict"
)]
fn error_scenarios(src: &str, expected: &str) {
    let err = query_err(src);
    assert_eq!(err.to_string(), expected);
}

#[test]
fn dispatch_round_trip_prints_reshaped_tree() {
    let catalog = book_catalog();
    let mut settings = Settings::default();
    let rows = vec![
        vec![
            CellValue::Text("Tolkien".into()),
            CellValue::Text("The Hobbit".into()),
            CellValue::Int(1),
            CellValue::Int(10),
        ],
        vec![
            CellValue::Text("Tolkien".into()),
            CellValue::Text("The Silmarillion".into()),
            CellValue::Int(1),
            CellValue::Int(11),
        ],
    ];
    let mut driver = FakeDriver::new(rows);

    let output = dispatch::dispatch("authors.books.title authors.name", &catalog, &mut settings, &mut driver)
        .unwrap();

    assert_eq!(
        output,
        "- authors.name: Tolkien\n  - books.title: The Hobbit\n  - books.title: The Silmarillion\n"
    );
}

#[test]
fn dispatch_set_and_alias_do_not_touch_the_driver() {
    let catalog = book_catalog();
    let mut settings = Settings::default();
    let mut driver = FakeDriver::new(Vec::new());

    let out = dispatch::dispatch(r"\set limit 5", &catalog, &mut settings, &mut driver).unwrap();
    assert_eq!(out, "limit = 5");
    assert_eq!(settings.limit(), 5);

    let out = dispatch::dispatch(r"\alias a authors", &catalog, &mut settings, &mut driver).unwrap();
    assert_eq!(out, "a -> authors");
    assert_eq!(settings.aliases.get("a"), Some(&"authors".to_string()));
}

#[test]
fn dispatch_unknown_setting_key_is_an_error() {
    let catalog = book_catalog();
    let mut settings = Settings::default();
    let mut driver = FakeDriver::new(Vec::new());

    let err = dispatch::dispatch(r"\set foo 1", &catalog, &mut settings, &mut driver).unwrap_err();
    assert_eq!(err.to_string(), "Unknown setting: foo");
    assert!(!settings.config.contains_key("foo"));
}

#[test]
fn dispatch_unknown_alias_target_is_an_error() {
    let catalog = book_catalog();
    let mut settings = Settings::default();
    let mut driver = FakeDriver::new(Vec::new());

    let err = dispatch::dispatch(r"\alias a nonexistent", &catalog, &mut settings, &mut driver).unwrap_err();
    assert_eq!(err.to_string(), "Unknown table: nonexistent");
}
