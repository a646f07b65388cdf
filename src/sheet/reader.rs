//! Workbook decoding via calamine

use super::types::{CellValue, RawTable};
use crate::error::{Error, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDateTime;
use std::io::Cursor;

/// Read the first worksheet of an in-memory workbook
///
/// The first row is the header row. Blank header cells become `Unnamed: i`
/// for zero-based column `i`. Rows with no values are dropped.
pub fn read_first_sheet(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| Error::parse(format!("cannot open workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::parse("workbook has no worksheets"))?
        .map_err(|e| Error::parse(format!("cannot read first worksheet: {e}")))?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| Error::parse("first worksheet is empty"))?;

    let headers = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| header_text(i, cell))
        .collect();

    let data = rows
        .map(|row| row.iter().map(convert_cell).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    Ok(RawTable::new(headers, data))
}

fn header_text(index: usize, cell: &Data) -> String {
    match convert_cell(cell) {
        CellValue::Empty => format!("Unnamed: {index}"),
        value => value.to_string(),
    }
}

/// Convert a calamine cell to a `CellValue`
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => float_value(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if dt.is_datetime() => CellValue::DateTime(value),
            _ => float_value(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso_datetime(s).map_or_else(
            || CellValue::Text(s.clone()),
            CellValue::DateTime,
        ),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// xlsx stores every number as a double; whole values are read back as Int
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_value(value: f64) -> CellValue {
    if value.is_finite()
        && value.fract() == 0.0
        && value >= i64::MIN as f64
        && value <= i64::MAX as f64
    {
        CellValue::Int(value as i64)
    } else {
        CellValue::Float(value)
    }
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
