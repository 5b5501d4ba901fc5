//! Concrete `SchemaIntrospector` / `RowSource` implementation over the
//! synchronous `postgres` crate, mirroring the blocking-cursor model the
//! original Python source got from `psycopg2`.

use postgres::types::Type;
use postgres::{Client, NoTls, Row};

use super::{CellValue, DriverError, RowSource, SchemaIntrospector};

pub struct PostgresDriver {
    client: Client,
}

impl PostgresDriver {
    pub fn connect(conn_str: &str) -> Result<Self, DriverError> {
        let client = Client::connect(conn_str, NoTls)
            .map_err(|e| DriverError::Connection(e.to_string()))?;
        Ok(PostgresDriver { client })
    }
}

impl SchemaIntrospector for PostgresDriver {
    fn all_columns(&mut self) -> Result<Vec<(String, String, String)>, DriverError> {
        let rows = self
            .client
            .query(ALL_COLUMNS_SQL, &[])
            .map_err(|e| DriverError::Introspection(e.to_string()))?;
        Ok(rows
            .iter()
            .map(|r| (r.get(0), r.get(1), r.get(2)))
            .collect())
    }

    fn unique_constraints(
        &mut self,
    ) -> Result<Vec<(String, String, String, String, String)>, DriverError> {
        let rows = self
            .client
            .query(UNIQUE_CONSTRAINTS_SQL, &[])
            .map_err(|e| DriverError::Introspection(e.to_string()))?;
        Ok(rows
            .iter()
            .map(|r| (r.get(0), r.get(1), r.get(2), r.get(3), r.get(4)))
            .collect())
    }

    fn foreign_keys(
        &mut self,
    ) -> Result<Vec<(String, String, String, String, String, String)>, DriverError> {
        let rows = self
            .client
            .query(FOREIGN_KEYS_SQL, &[])
            .map_err(|e| DriverError::Introspection(e.to_string()))?;
        Ok(rows
            .iter()
            .map(|r| (r.get(0), r.get(1), r.get(2), r.get(3), r.get(4), r.get(5)))
            .collect())
    }
}

impl RowSource for PostgresDriver {
    fn execute(
        &mut self,
        sql: &str,
    ) -> Result<Box<dyn Iterator<Item = Vec<CellValue>>>, DriverError> {
        let rows = self
            .client
            .query(sql, &[])
            .map_err(|e| DriverError::Query(e.to_string()))?;
        let values: Vec<Vec<CellValue>> = rows.iter().map(row_to_cells).collect();
        Ok(Box::new(values.into_iter()))
    }
}

fn row_to_cells(row: &Row) -> Vec<CellValue> {
    (0..row.len()).map(|i| cell_at(row, i)).collect()
}

/// Postgres row access is statically typed per-column; `scry` only
/// needs a handful of SQL types to render results, so unrecognized
/// types fall back to their text representation.
fn cell_at(row: &Row, i: usize) -> CellValue {
    let column = &row.columns()[i];
    match *column.type_() {
        Type::BOOL => row
            .get::<_, Option<bool>>(i)
            .map(CellValue::Bool)
            .unwrap_or(CellValue::Null),
        Type::INT2 | Type::INT4 | Type::INT8 => row
            .get::<_, Option<i64>>(i)
            .map(CellValue::Int)
            .unwrap_or(CellValue::Null),
        Type::FLOAT4 | Type::FLOAT8 | Type::NUMERIC => row
            .get::<_, Option<f64>>(i)
            .map(CellValue::Float)
            .unwrap_or(CellValue::Null),
        _ => row
            .get::<_, Option<String>>(i)
            .map(CellValue::Text)
            .unwrap_or(CellValue::Null),
    }
}

const ALL_COLUMNS_SQL: &str = "
    SELECT table_schema, table_name, column_name
    FROM information_schema.columns
    WHERE table_schema NOT IN ('pg_catalog', 'information_schema')
    ORDER BY table_schema, table_name, ordinal_position
";

const UNIQUE_CONSTRAINTS_SQL: &str = "
    SELECT tc.table_schema, tc.table_name, tc.constraint_name,
           tc.constraint_type, kcu.column_name
    FROM information_schema.table_constraints tc
    JOIN information_schema.key_column_usage kcu
      ON tc.constraint_name = kcu.constraint_name
     AND tc.table_schema = kcu.table_schema
    WHERE tc.constraint_type IN ('PRIMARY KEY', 'UNIQUE')
    ORDER BY tc.table_schema, tc.table_name, kcu.ordinal_position
";

const FOREIGN_KEYS_SQL: &str = "
    SELECT tc.table_schema, tc.table_name, kcu.column_name,
           ccu.table_schema AS foreign_table_schema,
           ccu.table_name AS foreign_table_name,
           ccu.column_name AS foreign_column_name
    FROM information_schema.table_constraints tc
    JOIN information_schema.key_column_usage kcu
      ON tc.constraint_name = kcu.constraint_name
     AND tc.table_schema = kcu.table_schema
    JOIN information_schema.constraint_column_usage ccu
      ON tc.constraint_name = ccu.constraint_name
     AND tc.table_schema = ccu.table_schema
    WHERE tc.constraint_type = 'FOREIGN KEY'
";
