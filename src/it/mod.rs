//! Intermediate Tree builder (C4): folds every resolved component into
//! one join forest plus a flat list of conditions, ready for the SQL
//! Generator (C5) to walk.
//!
//! A forest, not a single tree, because two components can each start a
//! fresh, mutually unrelated table (e.g. `authors.name books.title`);
//! those become separate `FROM` entries joined with a comma, matching
//! the original Python source's dict-of-trees shape.

use crate::catalog::Catalog;
use crate::parser::ast::{CmpOp, Tail, Value};
use crate::resolve::{Resolved, ResolvedChain, ResolvedComponent};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectNode {
    pub schema: String,
    pub table: String,
    pub alias: String,
    pub columns: Vec<String>,
    pub children: Vec<SelectNode>,
}

impl SelectNode {
    fn new(schema: String, table: String, alias: String) -> Self {
        SelectNode {
            schema,
            table,
            alias,
            columns: Vec::new(),
            children: Vec::new(),
        }
    }

    fn add_column(&mut self, column: String) {
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShallowCondition<'a> {
    pub alias: String,
    pub column: String,
    pub op: CmpOp,
    pub value: Value<'a>,
}

/// A deep (`:`) condition: the suffix is its own little join forest,
/// compiled into a scalar `{outer_alias}.id IN (SELECT ... )` subquery
/// rather than being joined into the outer query directly.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepCondition<'a> {
    pub outer_alias: String,
    pub suffix_root: SelectNode,
    pub leaf_alias: String,
    pub leaf_column: String,
    pub op: CmpOp,
    pub value: Value<'a>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree<'a> {
    pub roots: Vec<SelectNode>,
    pub shallow_conditions: Vec<ShallowCondition<'a>>,
    pub deep_conditions: Vec<DeepCondition<'a>>,
}

pub fn build<'a>(resolved: &Resolved<'a>) -> Tree<'a> {
    let mut tree = Tree::default();

    for component in &resolved.components {
        match component {
            ResolvedComponent::Path { chain, tail } => {
                let node = insert_chain(&mut tree.roots, chain);
                match tail {
                    None => {
                        let column = chain.trailing_column.clone().unwrap_or_else(|| "*".to_string());
                        node.add_column(column);
                    }
                    Some(Tail::Columns(cols)) => {
                        for col in cols {
                            node.add_column(col.to_string());
                        }
                    }
                    Some(Tail::Terminator) => {
                        // Join only, no columns selected at this node.
                    }
                }
            }
            ResolvedComponent::ConditionShallow { prefix, column, op, value } => {
                insert_chain(&mut tree.roots, prefix);
                tree.shallow_conditions.push(ShallowCondition {
                    alias: prefix.last_alias().to_string(),
                    column: column.clone(),
                    op: *op,
                    value: value.clone(),
                });
            }
            ResolvedComponent::ConditionDeep { prefix, suffix, op, value, .. } => {
                insert_chain(&mut tree.roots, prefix);
                let mut suffix_roots = Vec::new();
                insert_chain(&mut suffix_roots, suffix);
                debug_assert_eq!(suffix_roots.len(), 1, "a deep condition's suffix is a single chain");
                let suffix_root = suffix_roots.into_iter().next().expect("suffix always resolves at least one table");
                let leaf_column = suffix.trailing_column.clone().unwrap_or_else(|| "id".to_string());
                tree.deep_conditions.push(DeepCondition {
                    outer_alias: prefix.last_alias().to_string(),
                    leaf_alias: suffix.last_alias().to_string(),
                    suffix_root,
                    leaf_column,
                    op: *op,
                    value: value.clone(),
                });
            }
        }
    }

    tree
}

/// One node's contribution to the `SELECT` list, in the same
/// depth-first order the SQL generator and result reshaper both walk
/// the tree in - the single source of truth for column layout, so the
/// two stages can never disagree about which row position holds what.
#[derive(Debug, Clone)]
pub struct NodePlan {
    pub alias: String,
    pub table: String,
    pub schema: String,
    pub parent_alias: Option<String>,
    pub display_columns: Vec<String>,
    pub unique_columns: Vec<String>,
}

pub fn plan_columns(tree: &Tree<'_>, catalog: &Catalog) -> Vec<NodePlan> {
    let mut plans = Vec::new();
    for root in &tree.roots {
        walk_plan(root, None, catalog, &mut plans);
    }
    plans
}

fn walk_plan(node: &SelectNode, parent_alias: Option<&str>, catalog: &Catalog, plans: &mut Vec<NodePlan>) {
    let mut display_columns = Vec::new();
    for column in &node.columns {
        if column == "*" {
            for real_column in catalog.columns_of(&node.table).unwrap_or(&[]) {
                display_columns.push(real_column.clone());
            }
        } else {
            display_columns.push(column.clone());
        }
    }
    let unique_columns = catalog
        .unique_key(&node.schema, &node.table)
        .map(|k| k.columns.clone())
        .unwrap_or_default();

    plans.push(NodePlan {
        alias: node.alias.clone(),
        table: node.table.clone(),
        schema: node.schema.clone(),
        parent_alias: parent_alias.map(String::from),
        display_columns,
        unique_columns,
    });

    for child in &node.children {
        walk_plan(child, Some(&node.alias), catalog, plans);
    }
}

fn insert_chain<'t>(roots: &'t mut Vec<SelectNode>, chain: &ResolvedChain) -> &'t mut SelectNode {
    let (first_table, first_alias) = &chain.tables[0];
    let root_idx = match roots.iter().position(|r| r.alias == *first_alias) {
        Some(i) => i,
        None => {
            roots.push(SelectNode::new(chain.schema.clone(), first_table.clone(), first_alias.clone()));
            roots.len() - 1
        }
    };

    let mut node = &mut roots[root_idx];
    for (table, alias) in chain.tables.iter().skip(1) {
        let idx = match node.children.iter().position(|c| c.alias == *alias) {
            Some(i) => i,
            None => {
                node.children.push(SelectNode::new(chain.schema.clone(), table.clone(), alias.clone()));
                node.children.len() - 1
            }
        };
        node = &mut node.children[idx];
    }
    node
}
