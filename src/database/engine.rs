//! DuckDB destination
//!
//! Opens the configured DSN once per session. Tables are registered through
//! a prepared INSERT inside a single transaction.

use super::{quote_ident, Destination, Session};
use crate::error::{Result, ResultExt};
use crate::normalize::{ColumnType, NormalizedTable};
use crate::sheet::CellValue;
use duckdb::types::Value;
use duckdb::{params_from_iter, Connection};
use regex::Regex;
use std::sync::LazyLock;

static TOKEN_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)((?:motherduck_)?token=)[^&;\s]+").unwrap());

/// Hide token parameters in a DSN, for logging
pub fn redact_dsn(dsn: &str) -> String {
    TOKEN_PARAM.replace_all(dsn, "${1}***").into_owned()
}

/// DuckDB / MotherDuck destination
#[derive(Debug, Clone)]
pub struct DuckDbDestination {
    dsn: String,
}

impl DuckDbDestination {
    /// Create a destination for a DSN (`md:<db>`, a file path or `:memory:`)
    pub fn new(dsn: impl Into<String>) -> Self {
        Self { dsn: dsn.into() }
    }

    /// Open a session on the concrete type
    pub fn connect(&self) -> Result<DuckDbSession> {
        let conn = if self.dsn == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(&self.dsn)
        }
        .with_context(|| format!("cannot connect to {}", redact_dsn(&self.dsn)))?;

        tracing::debug!("Opened DuckDB session on {}", redact_dsn(&self.dsn));
        Ok(DuckDbSession { conn })
    }
}

impl Destination for DuckDbDestination {
    fn open(&self) -> Result<Box<dyn Session>> {
        Ok(Box::new(self.connect()?))
    }

    fn describe(&self) -> String {
        redact_dsn(&self.dsn)
    }
}

/// An open DuckDB connection
pub struct DuckDbSession {
    conn: Connection,
}

impl DuckDbSession {
    /// Borrow the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl std::fmt::Debug for DuckDbSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbSession").finish_non_exhaustive()
    }
}

impl Session for DuckDbSession {
    fn register(&mut self, name: &str, table: &NormalizedTable) -> Result<()> {
        let columns = table
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_ident(&c.name), c.column_type.sql_name()))
            .collect::<Vec<_>>()
            .join(", ");

        self.conn.execute_batch(&format!(
            "CREATE OR REPLACE TEMP TABLE {} ({columns})",
            quote_ident(name)
        ))?;

        if table.rows.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["?"; table.columns.len()].join(", ");
        let insert = format!(
            "INSERT INTO temp.main.{} VALUES ({placeholders})",
            quote_ident(name)
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&insert)?;
            for row in &table.rows {
                let values = row
                    .iter()
                    .zip(&table.columns)
                    .map(|(cell, column)| to_sql_value(cell, column.column_type));
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    fn execute(&mut self, sql: &str) -> Result<()> {
        tracing::debug!("Executing: {}", sql);
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn query_count(&mut self, sql: &str) -> Result<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

/// Convert a cell to the value bound for a column of the given type
fn to_sql_value(cell: &CellValue, column_type: ColumnType) -> Value {
    match (cell, column_type) {
        (CellValue::Empty, _) => Value::Null,
        (CellValue::Int(i), ColumnType::BigInt) => Value::BigInt(*i),
        (CellValue::Int(i), ColumnType::Double) => Value::Double(*i as f64),
        (CellValue::Float(f), ColumnType::Double) => Value::Double(*f),
        (CellValue::Bool(b), ColumnType::Boolean) => Value::Boolean(*b),
        (CellValue::DateTime(dt), ColumnType::Timestamp) => {
            Value::Text(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string())
        }
        (value, _) => Value::Text(value.to_string()),
    }
}
