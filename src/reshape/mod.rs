//! Result Reshaper (C6): folds the flat row cursor back into a nested,
//! de-duplicated tree shaped like the Intermediate Tree that produced
//! the `SELECT` list.
//!
//! Grouping key per node is its hidden unique-key columns; if a node
//! carries no unique key, its display columns stand in instead (spec.md
//! §4.6). A node whose display and unique values are all `NULL` is a
//! left-join miss and is skipped along with its entire subtree.

use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::driver::CellValue;
use crate::it::{self, NodePlan, SelectNode, Tree};

#[derive(Debug, Clone, PartialEq)]
pub struct ReshapedNode {
    pub alias: String,
    pub table: String,
    pub display: Vec<(String, CellValue)>,
    pub children: Vec<ReshapedNode>,
    pub(crate) dedup_key: Vec<CellValue>,
}

pub fn reshape(tree: &Tree<'_>, catalog: &Catalog, rows: Vec<Vec<CellValue>>) -> Vec<ReshapedNode> {
    let plans = it::plan_columns(tree, catalog);
    let layout = ColumnLayout::new(&plans);

    let mut forest: Vec<ReshapedNode> = Vec::new();
    for row in &rows {
        for root in &tree.roots {
            fold_node(root, row, &layout, &mut forest);
        }
    }
    forest
}

/// The `SELECT` list generated by `sql::generate` is every node's
/// display columns, in `it::plan_columns` order, followed by every
/// node's unique columns in that same order (`Clauses::serialize`
/// chains `selects` then `uniques`). This layout recomputes the same
/// offsets so a row slice can be found back by alias.
struct ColumnLayout {
    display: HashMap<String, (usize, usize)>,
    unique: HashMap<String, (usize, usize)>,
    names: HashMap<String, Vec<String>>,
}

impl ColumnLayout {
    fn new(plans: &[NodePlan]) -> Self {
        let mut display = HashMap::new();
        let mut names = HashMap::new();
        let mut offset = 0;
        for plan in plans {
            let len = plan.display_columns.len();
            display.insert(plan.alias.clone(), (offset, offset + len));
            names.insert(plan.alias.clone(), plan.display_columns.clone());
            offset += len;
        }
        let mut unique = HashMap::new();
        for plan in plans {
            let len = plan.unique_columns.len();
            unique.insert(plan.alias.clone(), (offset, offset + len));
            offset += len;
        }
        ColumnLayout { display, unique, names }
    }
}

fn fold_node(node: &SelectNode, row: &[CellValue], layout: &ColumnLayout, siblings: &mut Vec<ReshapedNode>) {
    let (ds, de) = layout.display[&node.alias];
    let (us, ue) = layout.unique[&node.alias];
    let display_vals = &row[ds..de];
    let unique_vals = &row[us..ue];

    let all_null = display_vals
        .iter()
        .chain(unique_vals.iter())
        .all(|v| *v == CellValue::Null);
    if all_null {
        return;
    }

    let dedup_key: Vec<CellValue> = if !unique_vals.is_empty() {
        unique_vals.to_vec()
    } else {
        display_vals.to_vec()
    };

    let existing = siblings
        .iter_mut()
        .find(|n| n.alias == node.alias && n.dedup_key == dedup_key);

    let target = match existing {
        Some(n) => n,
        None => {
            let names = &layout.names[&node.alias];
            let display = names
                .iter()
                .cloned()
                .zip(display_vals.iter().cloned())
                .collect();
            siblings.push(ReshapedNode {
                alias: node.alias.clone(),
                table: node.table.clone(),
                display,
                children: Vec::new(),
                dedup_key,
            });
            siblings.last_mut().expect("just pushed")
        }
    };

    for child in &node.children {
        fold_node(child, row, layout, &mut target.children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Settings;
    use crate::parser::ast::Input;
    use crate::parser::parse;
    use crate::resolve::resolve;

    fn book_catalog() -> Catalog {
        Catalog::builder()
            .add_columns([
                ("scry".into(), "authors".into(), "id".into()),
                ("scry".into(), "authors".into(), "name".into()),
                ("scry".into(), "books".into(), "id".into()),
                ("scry".into(), "books".into(), "title".into()),
                ("scry".into(), "books".into(), "author_id".into()),
            ])
            .add_constraints([
                ("scry".into(), "authors".into(), "authors_pkey".into(), "PRIMARY KEY".into(), "id".into()),
                ("scry".into(), "books".into(), "books_pkey".into(), "PRIMARY KEY".into(), "id".into()),
            ])
            .add_foreign_keys([(
                "scry".into(), "books".into(), "author_id".into(),
                "scry".into(), "authors".into(), "id".into(),
            )])
            .build()
    }

    fn parse_query(src: &str) -> crate::parser::ast::Query<'_> {
        match parse(src).unwrap() {
            Input::Query(q) => q,
            _ => panic!("expected a query"),
        }
    }

    #[test]
    fn folds_repeated_parent_rows_into_one_node_with_many_children() {
        let cat = book_catalog();
        let settings = Settings::default();
        let query = parse_query("authors.books.title authors.name");
        let resolved = resolve(&query, &cat, &settings).unwrap();
        let tree = it::build(&resolved);

        // selects: authors.name, books.title ++ uniques: authors.id, books.id
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

        let forest = reshape(&tree, &cat, rows);
        assert_eq!(forest.len(), 1);
        let author = &forest[0];
        assert_eq!(author.display, vec![("name".to_string(), CellValue::Text("Tolkien".into()))]);
        assert_eq!(author.children.len(), 2);
        assert_eq!(
            author.children[0].display,
            vec![("title".to_string(), CellValue::Text("The Hobbit".into()))]
        );
    }

    #[test]
    fn left_join_miss_is_skipped() {
        let cat = book_catalog();
        let settings = Settings::default();
        let query = parse_query("authors.books.title authors.name");
        let resolved = resolve(&query, &cat, &settings).unwrap();
        let tree = it::build(&resolved);

        let rows = vec![vec![
            CellValue::Text("Le Guin".into()),
            CellValue::Null,
            CellValue::Int(2),
            CellValue::Null,
        ]];

        let forest = reshape(&tree, &cat, rows);
        assert_eq!(forest.len(), 1);
        assert!(forest[0].children.is_empty());
    }
}
