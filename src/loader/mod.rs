//! Replace-loader module
//!
//! Replaces a destination table with the contents of a `NormalizedTable`:
//!
//! 1. `DROP TABLE IF EXISTS <name>`
//! 2. `CREATE TABLE <name> AS SELECT * FROM <source> LIMIT 0`
//! 3. `INSERT INTO <name> SELECT * FROM <source>`
//!
//! all on one fresh session, which is dropped afterwards. With
//! `LoadStrategy::Transactional` the three statements commit together; with
//! `LoadStrategy::Replace` each one commits on its own, so a failed insert
//! leaves the table created but empty.

mod replace;
mod types;

pub use replace::{ReplaceLoader, ORIGIN_COLUMN};
pub use types::LoadReport;
