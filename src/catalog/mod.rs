//! Catalog (C1): the immutable, read-only snapshot of the database's
//! structure that every later pipeline stage consults.
//!
//! Built once per process start from the three introspection row
//! sequences described in spec.md §6 (see `crate::driver::SchemaIntrospector`).
//! Mirrors the shape the original Python source built in
//! `get_table_info` / `get_unique_keys` / `get_foreign_keys`.

use std::collections::{HashMap, HashSet};

/// `foreign_keys[t1][s1][t2][s2] == (c1, c2)` iff an FK links `t1@s1`'s
/// column `c1` to `t2@s2`'s column `c2`. Stored in both directions.
pub type ForeignKeyMap = HashMap<String, HashMap<String, HashMap<String, HashMap<String, (String, String)>>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKind {
    Primary,
    Unique,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    pub kind: UniqueKind,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub schemas: HashSet<String>,
    /// table name -> schemas it appears in, first-seen order (spec.md §9:
    /// ambiguous tables resolve to the first-seen schema).
    pub tables: HashMap<String, Vec<String>>,
    /// table name -> ordered, de-duplicated union of observed columns.
    pub table_columns: HashMap<String, Vec<String>>,
    pub foreign_keys: ForeignKeyMap,
    pub unique_keys: HashMap<(String, String), UniqueKey>,
}

/// Accumulator state while folding PRIMARY KEY / UNIQUE constraint rows,
/// kept per `(schema, table)` before the winner is picked.
#[derive(Default)]
struct ConstraintAccumulator {
    kind: Option<UniqueKind>,
    /// Columns of the primary key, if `kind == Primary`; ignores
    /// constraint name grouping (a composite PK is one key).
    primary_columns: Vec<String>,
    /// Candidate UNIQUE constraints, keyed by constraint name so that
    /// distinct unique constraints on the same table don't get merged.
    unique_candidates: HashMap<String, Vec<String>>,
    /// Insertion order of unique constraint names, for first-seen tie-break.
    unique_order: Vec<String>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn table_schemas(&self, table: &str) -> Option<&[String]> {
        self.tables.get(table).map(|v| v.as_slice())
    }

    pub fn columns_of(&self, table: &str) -> Option<&[String]> {
        self.table_columns.get(table).map(|v| v.as_slice())
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.table_columns.contains_key(table)
    }

    pub fn join(&self, schema: &str, t1: &str, t2: &str) -> Option<&(String, String)> {
        self.foreign_keys.get(t1)?.get(schema)?.get(t2)?.get(schema)
    }

    pub fn unique_key(&self, schema: &str, table: &str) -> Option<&UniqueKey> {
        self.unique_keys
            .get(&(schema.to_string(), table.to_string()))
    }
}

#[derive(Default)]
pub struct CatalogBuilder {
    schemas: HashSet<String>,
    tables: HashMap<String, Vec<String>>,
    table_columns: HashMap<String, Vec<String>>,
    foreign_keys: ForeignKeyMap,
    constraints: HashMap<(String, String), ConstraintAccumulator>,
}

impl CatalogBuilder {
    /// Feeds rows from introspection query 1 (spec.md §6): `(table_schema,
    /// table_name, column_name)`.
    pub fn add_columns<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String, String)>,
    {
        for (schema, table, column) in rows {
            self.schemas.insert(schema.clone());
            let schemas_for_table = self.tables.entry(table.clone()).or_default();
            if !schemas_for_table.contains(&schema) {
                schemas_for_table.push(schema);
            }
            let columns = self.table_columns.entry(table).or_default();
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        self
    }

    /// Feeds rows from introspection query 2 (spec.md §6): `(table_schema,
    /// table_name, constraint_name, constraint_type, column_name)`.
    pub fn add_constraints<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String, String, String, String)>,
    {
        for (schema, table, constraint_name, constraint_type, column) in rows {
            let acc = self
                .constraints
                .entry((schema, table))
                .or_insert_with(ConstraintAccumulator::default);

            if constraint_type.eq_ignore_ascii_case("PRIMARY KEY") {
                if acc.kind != Some(UniqueKind::Primary) {
                    acc.kind = Some(UniqueKind::Primary);
                    acc.primary_columns.clear();
                }
                acc.primary_columns.push(column);
            } else {
                // UNIQUE; once a primary key has been seen for this
                // table, further UNIQUE rows don't displace it.
                if acc.kind == Some(UniqueKind::Primary) {
                    continue;
                }
                acc.kind = Some(UniqueKind::Unique);
                if !acc.unique_candidates.contains_key(&constraint_name) {
                    acc.unique_order.push(constraint_name.clone());
                }
                acc.unique_candidates
                    .entry(constraint_name)
                    .or_default()
                    .push(column);
            }
        }
        self
    }

    /// Feeds rows from introspection query 3 (spec.md §6): `(table_schema,
    /// table_name, column_name, foreign_table_schema, foreign_table_name,
    /// foreign_column_name)`.
    pub fn add_foreign_keys<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String, String, String, String, String)>,
    {
        for (s1, t1, c1, s2, t2, c2) in rows {
            self.foreign_keys
                .entry(t1.clone())
                .or_default()
                .entry(s1.clone())
                .or_default()
                .entry(t2.clone())
                .or_default()
                .insert(s2.clone(), (c1.clone(), c2.clone()));
            self.foreign_keys
                .entry(t2)
                .or_default()
                .entry(s2)
                .or_default()
                .entry(t1)
                .or_default()
                .insert(s1, (c2, c1));
        }
        self
    }

    pub fn build(self) -> Catalog {
        let mut unique_keys = HashMap::new();
        for ((schema, table), acc) in self.constraints {
            let key = match acc.kind {
                Some(UniqueKind::Primary) => UniqueKey {
                    kind: UniqueKind::Primary,
                    columns: acc.primary_columns,
                },
                Some(UniqueKind::Unique) => {
                    // Shortest unique constraint wins; ties broken by
                    // first-seen insertion order (spec.md §9).
                    let mut shortest: Option<Vec<String>> = None;
                    for name in &acc.unique_order {
                        let columns = &acc.unique_candidates[name];
                        let better = match &shortest {
                            None => true,
                            Some(best) => columns.len() < best.len(),
                        };
                        if better {
                            shortest = Some(columns.clone());
                        }
                    }
                    UniqueKey {
                        kind: UniqueKind::Unique,
                        columns: shortest.unwrap_or_default(),
                    }
                }
                None => continue,
            };
            unique_keys.insert((schema, table), key);
        }

        Catalog {
            schemas: self.schemas,
            tables: self.tables,
            table_columns: self.table_columns,
            foreign_keys: self.foreign_keys,
            unique_keys,
        }
    }
}
