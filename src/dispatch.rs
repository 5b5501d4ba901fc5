//! Settings (C10) & Command Dispatcher (C8).
//!
//! `Settings` is the only mutable state threaded through a session: the
//! `\set` config map and the `\alias` table (spec.md §4.9's addition over
//! the original Python source, which only had `\set`). The dispatcher
//! turns one parsed `Input` into either a query pipeline run or a
//! settings mutation, never both.

use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::driver::RowSource;
use crate::error::{ScryError, ScryResult};
use crate::it;
use crate::parser::{self, ast::Input};
use crate::printer;
use crate::reshape;
use crate::resolve;
use crate::sql::SqlGenerator;

/// Default row limit (spec.md §6).
pub const DEFAULT_LIMIT: &str = "100";

/// The closed set of keys `\set` accepts (spec.md §4.9): anything else
/// is rejected with a one-line error rather than silently accepted.
const KNOWN_SETTINGS: [&str; 3] = ["complete_style", "search_path", "limit"];

#[derive(Debug, Clone)]
pub struct Settings {
    pub config: HashMap<String, String>,
    pub aliases: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut config = HashMap::new();
        config.insert("limit".to_string(), DEFAULT_LIMIT.to_string());
        config.insert("complete_style".to_string(), "column".to_string());
        Settings {
            config,
            aliases: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn limit(&self) -> usize {
        self.config
            .get("limit")
            .and_then(|v| v.parse().ok())
            .unwrap_or(100)
    }
}

/// Runs one line of input end to end: parse, and either mutate
/// `Settings` or run the full query pipeline and print the result.
/// Settings mutation and query resolution never interleave within a
/// single call (spec.md §5).
pub fn dispatch(
    line: &str,
    catalog: &Catalog,
    settings: &mut Settings,
    driver: &mut dyn RowSource,
) -> ScryResult<String> {
    let input = parser::parse(line)?;
    match input {
        Input::Set { key, value } => {
            if !KNOWN_SETTINGS.contains(&key) {
                return Err(ScryError::Dispatch(format!("Unknown setting: {key}")));
            }
            log::debug!("set {key} = {value}");
            settings.config.insert(key.to_string(), value.to_string());
            Ok(format!("{key} = {value}"))
        }
        Input::Alias { name, table } => {
            if !catalog.has_table(table) {
                return Err(ScryError::Dispatch(format!("Unknown table: {table}")));
            }
            log::debug!("alias {name} -> {table}");
            settings.aliases.insert(name.to_string(), table.to_string());
            Ok(format!("{name} -> {table}"))
        }
        Input::Query(query) => {
            let resolved = resolve::resolve(&query, catalog, settings)?;
            log::debug!("resolved aliases: {:?}", resolved.alias_table.root());

            let tree = it::build(&resolved);
            log::debug!("intermediate tree: {tree:?}");

            let generator = SqlGenerator::default();
            let clauses = generator.generate(&tree, catalog, settings.limit());
            let sql = clauses.serialize();
            log::debug!("generated sql: {sql}");

            let rows = driver
                .execute(&sql)
                .map_err(ScryError::from)?
                .collect::<Vec<_>>();
            log::debug!("fetched {} rows", rows.len());

            let shaped = reshape::reshape(&tree, catalog, rows);
            Ok(printer::print_tree(&shaped))
        }
    }
}
