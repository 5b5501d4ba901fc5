//! SQL Generator (C5): walks the Intermediate Tree into a `Clauses` of
//! four clause lists, then serializes them into one `SELECT` statement.
//! Mirrors the original Python source's `generate_sql`/`serialize_sql`
//! pair closely enough to keep the generated SQL byte-identical for a
//! given input (spec.md §8, invariant 1).

use crate::catalog::Catalog;
use crate::it::{self, DeepCondition, SelectNode, ShallowCondition, Tree};
use crate::parser::ast::Value;

#[derive(Debug, Clone, Default)]
pub struct Clauses {
    pub selects: Vec<String>,
    pub joins: Vec<String>,
    pub wheres: Vec<String>,
    pub uniques: Vec<String>,
    pub limit: usize,
}

impl Clauses {
    /// `serialize_sql`: joins the four clause lists into one statement.
    /// `joins[0]` is always the primary `FROM` target; any further
    /// top-level root is a `CROSS JOIN` (disconnected components);
    /// everything else is a `LEFT JOIN`.
    pub fn serialize(&self) -> String {
        let mut sql = String::from("SELECT ");
        let select_list: Vec<&str> = self
            .selects
            .iter()
            .chain(self.uniques.iter())
            .map(String::as_str)
            .collect();
        sql.push_str(&select_list.join(", "));

        sql.push_str(" FROM ");
        sql.push_str(&self.joins[0]);
        for join in &self.joins[1..] {
            sql.push(' ');
            sql.push_str(join);
        }

        if !self.wheres.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.wheres.join(" AND "));
        }

        sql.push_str(&format!(" LIMIT {}", self.limit));
        sql
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlGenerator;

impl SqlGenerator {
    pub fn generate(&self, tree: &Tree<'_>, catalog: &Catalog, limit: usize) -> Clauses {
        let mut joins = Vec::new();
        for (i, root) in tree.roots.iter().enumerate() {
            if i == 0 {
                joins.push(table_token(&root.schema, &root.table, &root.alias));
            } else {
                joins.push(format!("CROSS JOIN {}", table_token(&root.schema, &root.table, &root.alias)));
            }
            collect_joins(root, None, catalog, &mut joins);
        }

        let mut selects = Vec::new();
        let mut uniques = Vec::new();
        for plan in it::plan_columns(tree, catalog) {
            for column in &plan.display_columns {
                selects.push(format!("{}.{}", plan.alias, column));
            }
            for column in &plan.unique_columns {
                uniques.push(format!("{}.{}", plan.alias, column));
            }
        }

        let mut wheres: Vec<String> = tree
            .shallow_conditions
            .iter()
            .map(|c| render_shallow(c))
            .collect();
        wheres.extend(
            tree.deep_conditions
                .iter()
                .map(|c| render_deep(c, catalog)),
        );

        Clauses {
            selects,
            joins,
            wheres,
            uniques,
            limit,
        }
    }
}

/// A deep condition compiles to a correlated scalar subquery (spec.md
/// §4.5, §6): `{outer}.id IN (SELECT {schema}.{table}.id FROM {joins}
/// WHERE {wheres})`, scoped to the suffix's own join forest.
fn render_deep(condition: &DeepCondition<'_>, catalog: &Catalog) -> String {
    let mut sub_joins = Vec::new();
    sub_joins.push(table_token(
        &condition.suffix_root.schema,
        &condition.suffix_root.table,
        &condition.suffix_root.alias,
    ));
    collect_joins(&condition.suffix_root, None, catalog, &mut sub_joins);

    let where_clause = format!(
        "{}.{} {} {}",
        condition.leaf_alias,
        condition.leaf_column,
        condition.op.as_sql(),
        render_value(&condition.value)
    );

    format!(
        "{}.id IN (SELECT {}.{}.id FROM {} WHERE {})",
        condition.outer_alias,
        condition.suffix_root.schema,
        condition.suffix_root.table,
        sub_joins.join(" "),
        where_clause
    )
}

/// Renders a table reference, omitting the trailing alias token when the
/// table carries no explicit `@alias` (alias equals the bare table name).
fn table_token(schema: &str, table: &str, alias: &str) -> String {
    if alias == table {
        format!("{schema}.{table}")
    } else {
        format!("{schema}.{table} {alias}")
    }
}

/// Walks a node's children into `LEFT JOIN` clauses, looking up each
/// join's columns through the catalog. Column/unique-key layout is
/// `it::plan_columns`'s job, not this traversal's - keeping the two
/// concerns apart is what lets the SQL generator and the reshaper share
/// one column-ordering source of truth.
fn collect_joins(node: &SelectNode, parent: Option<&SelectNode>, catalog: &Catalog, joins: &mut Vec<String>) {
    if let Some(parent) = parent {
        let join_cond = match catalog.join(&node.schema, &parent.table, &node.table) {
            Some((parent_col, node_col)) => {
                format!("{}.{} = {}.{}", parent.alias, parent_col, node.alias, node_col)
            }
            None => format!("{}.id = {}.id", parent.alias, node.alias),
        };
        joins.push(format!(
            "LEFT JOIN {} ON {}",
            table_token(&node.schema, &node.table, &node.alias),
            join_cond
        ));
    }

    for child in &node.children {
        collect_joins(child, Some(node), catalog, joins);
    }
}

fn render_shallow(condition: &ShallowCondition<'_>) -> String {
    format!(
        "{}.{} {} {}",
        condition.alias,
        condition.column,
        condition.op.as_sql(),
        render_value(&condition.value)
    )
}

fn render_value(value: &Value<'_>) -> String {
    match value {
        Value::Null => "IS NULL".to_string(),
        Value::Number(n) => n.to_string(),
        Value::QuotedString(s) => format!("'{}'", s.replace('\'', "''")),
    }
}
