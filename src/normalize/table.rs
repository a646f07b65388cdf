//! Table normalization and column type inference

use super::identifier::normalize_identifier;
use crate::error::{Error, Result};
use crate::sheet::{CellValue, RawTable};
use crate::types::CollisionPolicy;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Column type used when the table is registered in DuckDB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Double,
    Boolean,
    Timestamp,
    Varchar,
}

impl ColumnType {
    /// DuckDB type name
    pub fn sql_name(self) -> &'static str {
        match self {
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Varchar => "VARCHAR",
        }
    }

    /// Infer the type of a column from its non-empty cells
    ///
    /// Whole numbers mixed with fractional ones widen to DOUBLE. Any other
    /// mix, and a column with no values at all, is VARCHAR.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut inferred: Option<ColumnType> = None;

        for cell in cells {
            let cell_type = match cell {
                CellValue::Empty => continue,
                CellValue::Int(_) => ColumnType::BigInt,
                CellValue::Float(_) => ColumnType::Double,
                CellValue::Bool(_) => ColumnType::Boolean,
                CellValue::DateTime(_) => ColumnType::Timestamp,
                CellValue::Text(_) => return ColumnType::Varchar,
            };

            inferred = Some(match (inferred, cell_type) {
                (None, t) => t,
                (Some(a), b) if a == b => a,
                (
                    Some(ColumnType::BigInt | ColumnType::Double),
                    ColumnType::BigInt | ColumnType::Double,
                ) => ColumnType::Double,
                _ => return ColumnType::Varchar,
            });
        }

        inferred.unwrap_or(ColumnType::Varchar)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// A normalized column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Normalized identifier
    pub name: String,
    /// Header as it appeared in the sheet
    pub source: String,
    /// Inferred type
    pub column_type: ColumnType,
}

/// A table whose column identifiers have been normalized
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub columns: Vec<Column>,
    /// Cell values, unchanged from the sheet
    pub rows: Vec<Vec<CellValue>>,
}

impl NormalizedTable {
    /// Column identifiers in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Normalize every header of `raw` and infer column types
///
/// Cells pass through untouched. A header that normalizes to nothing (only
/// whitespace or apostrophes) becomes `unnamed_<i>`, like a blank header
/// cell. What happens when two headers normalize to the same identifier is
/// decided by `policy`.
pub fn normalize_table(raw: RawTable, policy: CollisionPolicy) -> Result<NormalizedTable> {
    let names: Vec<String> = raw
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let name = normalize_identifier(h);
            if name.is_empty() {
                format!("unnamed_{i}")
            } else {
                name
            }
        })
        .collect();

    let names = match policy {
        CollisionPolicy::Preserve => names,
        CollisionPolicy::Suffix => suffix_duplicates(names),
        CollisionPolicy::Fail => {
            reject_duplicates(&names, &raw.headers)?;
            names
        }
    };

    let columns = names
        .into_iter()
        .zip(&raw.headers)
        .enumerate()
        .map(|(i, (name, source))| Column {
            name,
            source: source.clone(),
            column_type: ColumnType::infer(raw.rows.iter().filter_map(|row| row.get(i))),
        })
        .collect();

    Ok(NormalizedTable {
        columns,
        rows: raw.rows,
    })
}

/// Rename second and later occurrences to `name_1`, `name_2`, ...
fn suffix_duplicates(names: Vec<String>) -> Vec<String> {
    let original: HashSet<String> = names.iter().cloned().collect();
    let mut used: HashSet<String> = HashSet::with_capacity(names.len());

    names
        .into_iter()
        .map(|name| {
            if used.insert(name.clone()) {
                return name;
            }

            let mut n = 1;
            loop {
                let candidate = format!("{name}_{n}");
                if !original.contains(&candidate) && !used.contains(&candidate) {
                    used.insert(candidate.clone());
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

fn reject_duplicates(names: &[String], headers: &[String]) -> Result<()> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name.as_str()).or_default() += 1;
    }

    // Report the first identifier, in column order, that occurs twice
    if let Some(identifier) = names.iter().find(|n| counts[n.as_str()] > 1) {
        let sources = names
            .iter()
            .zip(headers)
            .filter(|(n, _)| *n == identifier)
            .map(|(_, h)| h.clone())
            .collect();
        return Err(Error::ColumnCollision {
            identifier: identifier.clone(),
            sources,
        });
    }

    Ok(())
}
