//! Tabular normalizer module
//!
//! Rewrites spreadsheet headers into identifiers that are safe to use as
//! DuckDB column names, infers a column type per column, and derives the
//! `stg_` table name for a file.
//!
//! # Rules
//!
//! Identifiers are built by trimming, dropping apostrophes, collapsing each
//! run of characters outside `[A-Za-z0-9_]` into one `_`, then lowercasing.
//! The result only ever contains `[a-z0-9_]`, and normalizing it again is a
//! no-op.

mod identifier;
mod table;

pub use identifier::{normalize_identifier, target_table_name, TargetTableName};
pub use table::{normalize_table, Column, ColumnType, NormalizedTable};
