//! Alias Resolver (C3): turns the parsed CST into an alias table mapping
//! every `path_elem` occurrence to the `(schema, table)` it denotes.
//!
//! Implemented as an explicit worklist rather than the original Python
//! source's single top-down visitor pass, because conditions may
//! reference aliases declared by components that appear later in the
//! same query (spec.md §4.3, §9).

pub mod errors;

use std::collections::{HashMap, HashSet};

use crate::catalog::Catalog;
use crate::dispatch::Settings;
use crate::parser::ast::{CmpOp, CondPath, Component, PathElem, Query, Tail, Value};

pub use errors::ResolveError;

/// One binding in the alias table: `alias -> (schema, path, table)`.
/// `path` is the chain of already-resolved alias names that lead to this
/// entry within its own component; two bindings of the same alias name
/// with the same `(schema, table)` but different `path` are a conflict
/// (spec.md §3), since they denote structurally different joins that
/// happen to share a name.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasEntry {
    pub schema: String,
    pub path: Vec<String>,
    pub table: String,
}

/// Aliases live in one of two kinds of scope: the root (shared across
/// the whole query, `None`), or a nested scope private to one deep
/// condition's suffix, keyed by the prefix's tail alias. A suffix's
/// aliases are invisible outside their own condition.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    scopes: HashMap<Option<String>, HashMap<String, AliasEntry>>,
}

impl AliasTable {
    pub fn get(&self, scope: Option<&str>, alias: &str) -> Option<&AliasEntry> {
        self.scopes.get(&scope.map(str::to_string))?.get(alias)
    }

    pub fn root(&self) -> HashMap<String, AliasEntry> {
        self.scopes.get(&None).cloned().unwrap_or_default()
    }

    fn insert(&mut self, scope: Option<String>, alias: String, entry: AliasEntry) {
        self.scopes.entry(scope).or_default().insert(alias, entry);
    }
}

/// A chain of joined tables resolved from a `path_elem` sequence, plus
/// the schema they live in and (when the trailing element turned out to
/// be a column rather than another table) that column's name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChain {
    pub schema: String,
    pub tables: Vec<(String, String)>,
    pub trailing_column: Option<String>,
}

impl ResolvedChain {
    pub fn last_table(&self) -> &str {
        &self.tables.last().expect("a resolved chain always has a table").0
    }

    pub fn last_alias(&self) -> &str {
        &self.tables.last().expect("a resolved chain always has a table").1
    }
}

#[derive(Debug, Clone)]
pub enum ResolvedComponent<'a> {
    Path {
        chain: ResolvedChain,
        tail: Option<Tail<'a>>,
    },
    ConditionShallow {
        prefix: ResolvedChain,
        column: String,
        op: CmpOp,
        value: Value<'a>,
    },
    ConditionDeep {
        prefix: ResolvedChain,
        suffix_scope: String,
        suffix: ResolvedChain,
        op: CmpOp,
        value: Value<'a>,
    },
}

#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    pub alias_table: AliasTable,
    pub components: Vec<ResolvedComponent<'a>>,
}

pub fn resolve<'a>(
    query: &Query<'a>,
    catalog: &Catalog,
    settings: &Settings,
) -> Result<Resolved<'a>, ResolveError> {
    let declared_aliases = collect_declared_aliases(query);
    let mut alias_table = AliasTable::default();
    let mut resolved: Vec<Option<ResolvedComponent<'a>>> = vec![None; query.components.len()];
    let mut pending: Vec<usize> = (0..query.components.len()).collect();

    loop {
        let mut progress = false;
        let mut still_pending = Vec::new();
        for idx in pending {
            let component = &query.components[idx];
            let entry_name = leading_name(component);
            let ready = !declared_aliases.contains(entry_name)
                || alias_table.get(None, entry_name).is_some();
            if ready {
                resolved[idx] = Some(resolve_component(component, catalog, settings, &mut alias_table)?);
                progress = true;
            } else {
                still_pending.push(idx);
            }
        }
        pending = still_pending;
        if pending.is_empty() {
            break;
        }
        if !progress {
            let names: Vec<&str> = pending
                .iter()
                .map(|&idx| leading_name(&query.components[idx]))
                .collect();
            return Err(ResolveError::UnfinishedAliases(names.join(", ")));
        }
    }

    Ok(Resolved {
        alias_table,
        components: resolved.into_iter().map(|c| c.expect("every component resolves or errors")).collect(),
    })
}

fn leading_name<'a>(component: &Component<'a>) -> &'a str {
    match component {
        Component::Path(qp) => qp.elems[0].name,
        Component::Condition(cond) => match &cond.path {
            CondPath::Deep { prefix, .. } => prefix[0].name,
            CondPath::Shallow { prefix, .. } => prefix[0].name,
        },
    }
}

fn collect_declared_aliases<'a>(query: &Query<'a>) -> HashSet<&'a str> {
    let mut names = HashSet::new();
    let mut visit_elems = |elems: &[PathElem<'a>]| {
        for elem in elems {
            if let Some(alias) = elem.alias {
                names.insert(alias);
            }
        }
    };
    for component in &query.components {
        match component {
            Component::Path(qp) => visit_elems(&qp.elems),
            Component::Condition(cond) => match &cond.path {
                CondPath::Deep { prefix, suffix } => {
                    visit_elems(prefix);
                    visit_elems(suffix);
                }
                CondPath::Shallow { prefix, .. } => visit_elems(prefix),
            },
        }
    }
    names
}

fn resolve_component<'a>(
    component: &Component<'a>,
    catalog: &Catalog,
    settings: &Settings,
    alias_table: &mut AliasTable,
) -> Result<ResolvedComponent<'a>, ResolveError> {
    match component {
        Component::Path(qp) => {
            let force_all_tables = qp.tail.is_some();
            let chain = resolve_elem_chain(&qp.elems, force_all_tables, catalog, settings, alias_table, None)?;
            Ok(ResolvedComponent::Path {
                chain,
                tail: qp.tail.clone(),
            })
        }
        Component::Condition(cond) => match &cond.path {
            CondPath::Shallow { prefix, column } => {
                let chain = resolve_elem_chain(prefix, true, catalog, settings, alias_table, None)?;
                Ok(ResolvedComponent::ConditionShallow {
                    prefix: chain,
                    column: column.to_string(),
                    op: cond.op,
                    value: cond.value.clone(),
                })
            }
            CondPath::Deep { prefix, suffix } => {
                let prefix_chain = resolve_elem_chain(prefix, true, catalog, settings, alias_table, None)?;
                let suffix_scope = prefix_chain.last_alias().to_string();
                let suffix_chain = resolve_elem_chain(
                    suffix,
                    false,
                    catalog,
                    settings,
                    alias_table,
                    Some(suffix_scope.clone()),
                )?;
                Ok(ResolvedComponent::ConditionDeep {
                    prefix: prefix_chain,
                    suffix_scope,
                    suffix: suffix_chain,
                    op: cond.op,
                    value: cond.value.clone(),
                })
            }
        },
    }
}

/// Resolves one dotted chain of `path_elem`s into tables joined in
/// order. `force_all_tables` disables the trailing column/table
/// ambiguity check (used whenever the grammar already separated the
/// column out, or for condition prefixes, which a `:`/`.column` always
/// terminates unambiguously).
fn resolve_elem_chain<'a>(
    elems: &[PathElem<'a>],
    force_all_tables: bool,
    catalog: &Catalog,
    settings: &Settings,
    alias_table: &mut AliasTable,
    scope: Option<String>,
) -> Result<ResolvedChain, ResolveError> {
    let n = elems.len();
    let mut schema: Option<String> = None;
    let mut tables: Vec<(String, String)> = Vec::new();
    let mut path_so_far: Vec<String> = Vec::new();
    let mut trailing_column: Option<String> = None;

    for (i, elem) in elems.iter().enumerate() {
        let is_last = i == n - 1;

        if tables.is_empty() {
            // Explicit schema consumption: "scry.authors.name" - "scry"
            // names a schema, not a table, and is dropped from the chain.
            // Only the very first element can be a schema name, and only
            // when another element remains to be the actual first table.
            if i == 0 && elem.alias.is_none() && !is_last && catalog.schemas.contains(elem.name) {
                schema = Some(elem.name.to_string());
                continue;
            }

            // A bare leading reference to an alias already known in this
            // scope just resumes from it; it doesn't re-declare the
            // alias, so it can't conflict with where that alias was
            // first bound (spec.md §8: "b.series_books@b" only
            // conflicts on its second element, not its first).
            if elem.alias.is_none() && !settings.aliases.contains_key(elem.name) {
                if let Some(existing) = alias_table.get(scope.as_deref(), elem.name).cloned() {
                    schema = Some(existing.schema.clone());
                    tables.push((existing.table.clone(), elem.name.to_string()));
                    path_so_far.push(elem.name.to_string());
                    continue;
                }
            }

            let (lookup_table, bind_alias) = match elem.alias {
                Some(a) => (elem.name.to_string(), a.to_string()),
                None => match settings.aliases.get(elem.name) {
                    Some(target) => (target.clone(), elem.name.to_string()),
                    None => (elem.name.to_string(), elem.name.to_string()),
                },
            };

            let resolved_schema = match &schema {
                Some(s) => s.clone(),
                None => match catalog.table_schemas(&lookup_table) {
                    None => return Err(ResolveError::UnresolvedSchema(elem.name.to_string())),
                    Some(schemas) => pick_schema(schemas, settings),
                },
            };

            if !catalog.has_table(&lookup_table) {
                return Err(ResolveError::UnknownTable(lookup_table));
            }

            register_alias(
                alias_table,
                scope.clone(),
                bind_alias.clone(),
                resolved_schema.clone(),
                path_so_far.clone(),
                lookup_table.clone(),
            )?;
            schema = Some(resolved_schema);
            tables.push((lookup_table, bind_alias.clone()));
            path_so_far.push(bind_alias);
            continue;
        }

        let schema_ref = schema.clone().expect("schema set by the leading element");
        let prev_table = tables.last().expect("at least one table resolved").0.clone();

        if !force_all_tables && is_last && elem.alias.is_none() {
            let is_column = elem.name == "*"
                || catalog
                    .columns_of(&prev_table)
                    .map(|cols| cols.iter().any(|c| c == elem.name))
                    .unwrap_or(false);
            if is_column {
                trailing_column = Some(elem.name.to_string());
                break;
            }
            if !catalog.has_table(elem.name) {
                return Err(ResolveError::UnknownTableOrColumn(elem.name.to_string()));
            }
            if catalog.join(&schema_ref, &prev_table, elem.name).is_none() {
                return Err(ResolveError::NoKnownJoinOf {
                    from: elem.name.to_string(),
                    to: prev_table,
                });
            }
            register_alias(
                alias_table,
                scope.clone(),
                elem.name.to_string(),
                schema_ref.clone(),
                path_so_far.clone(),
                elem.name.to_string(),
            )?;
            tables.push((elem.name.to_string(), elem.name.to_string()));
            path_so_far.push(elem.name.to_string());
            continue;
        }

        let (table, alias) = match elem.alias {
            Some(a) => (elem.name.to_string(), a.to_string()),
            None => match alias_table.get(scope.as_deref(), elem.name) {
                Some(existing) => (existing.table.clone(), elem.name.to_string()),
                None => (elem.name.to_string(), elem.name.to_string()),
            },
        };

        if !catalog.has_table(&table) {
            return Err(ResolveError::UnknownTableOrColumn(table));
        }
        if catalog.join(&schema_ref, &prev_table, &table).is_none() {
            return Err(ResolveError::NoKnownJoin {
                schema: schema_ref.clone(),
                from: prev_table,
                to: table,
            });
        }
        register_alias(
            alias_table,
            scope.clone(),
            alias.clone(),
            schema_ref.clone(),
            path_so_far.clone(),
            table.clone(),
        )?;
        tables.push((table, alias.clone()));
        path_so_far.push(alias);
    }

    Ok(ResolvedChain {
        schema: schema.expect("the leading element always resolves a schema"),
        tables,
        trailing_column,
    })
}

/// Picks the schema for an unqualified, ambiguous table name: the first
/// entry of `\set search_path` that actually carries the table wins; if
/// `search_path` is unset or doesn't mention the table at all, the
/// first-seen schema is used instead (spec.md §6, §9 - `scry` never
/// errors on ambiguity, unlike the original Python source).
fn pick_schema(schemas: &[String], settings: &Settings) -> String {
    if let Some(search_path) = settings.config.get("search_path") {
        for candidate in search_path.split(',').map(str::trim) {
            if let Some(found) = schemas.iter().find(|s| s.as_str() == candidate) {
                return found.clone();
            }
        }
    }
    schemas[0].clone()
}

fn register_alias(
    alias_table: &mut AliasTable,
    scope: Option<String>,
    alias: String,
    schema: String,
    path: Vec<String>,
    table: String,
) -> Result<(), ResolveError> {
    if let Some(existing) = alias_table.get(scope.as_deref(), &alias) {
        if existing.table != table {
            return Err(ResolveError::AliasTableConflict {
                alias,
                existing: existing.table.clone(),
                attempted: table,
            });
        }
        if existing.path != path {
            return Err(ResolveError::AliasPathConflict {
                alias,
                table,
                existing_path: existing.path.join("."),
                attempted_path: path.join("."),
            });
        }
        return Ok(());
    }
    alias_table.insert(scope, alias, AliasEntry { schema, path, table });
    Ok(())
}
