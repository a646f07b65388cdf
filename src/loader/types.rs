//! Loader result types

use serde::Serialize;

/// Outcome of a successful replace-load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Destination table
    pub table: String,
    /// Rows in the table after the load
    pub rows: u64,
    /// Number of columns
    pub columns: usize,
}
