//! Spreadsheet reader module
//!
//! Decodes the first worksheet of a workbook into a `RawTable`: one header
//! row and data rows of typed cells. Format detection and cell decoding are
//! done by calamine.

mod reader;
mod types;

pub use reader::read_first_sheet;
pub use types::{CellValue, RawTable};

#[cfg(test)]
pub(crate) mod fixtures;
