//! Destination store support via DuckDB
//!
//! A `Destination` hands out short-lived `Session`s. A session can register
//! a `NormalizedTable` as a session-local temporary table and run SQL
//! against it. The DuckDB implementation opens a local file, `:memory:` or
//! a MotherDuck `md:` database.

mod engine;

pub use engine::{redact_dsn, DuckDbDestination, DuckDbSession};

use crate::error::Result;
use crate::normalize::NormalizedTable;

/// One open connection to the destination
///
/// Dropping the session releases the connection.
pub trait Session {
    /// Register `table` as a temporary table called `name`
    fn register(&mut self, name: &str, table: &NormalizedTable) -> Result<()>;

    /// Execute one or more statements
    fn execute(&mut self, sql: &str) -> Result<()>;

    /// Run a query returning a single integer
    fn query_count(&mut self, sql: &str) -> Result<u64>;
}

/// Something that can open destination sessions
pub trait Destination: Send + Sync {
    /// Open a new session
    fn open(&self) -> Result<Box<dyn Session>>;

    /// Loggable description, without credentials
    fn describe(&self) -> String;
}

/// Quote an identifier for use in SQL
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal for use in SQL
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
