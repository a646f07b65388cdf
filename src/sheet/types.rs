//! Raw table types

use chrono::NaiveDateTime;
use std::fmt;

/// A single decoded cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Blank or error cell
    Empty,
    /// Whole number
    Int(i64),
    /// Fractional number
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Text
    Text(String),
    /// Date or date-time
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// First worksheet of a workbook: headers plus rectangular rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Header row, rendered as text
    pub headers: Vec<String>,
    /// Data rows, each exactly `headers.len()` cells
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Create a table, padding or truncating rows to the header width
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
