//! Workbook fixtures for tests, written with umya-spreadsheet

use std::path::Path;

/// A cell to place in a fixture workbook
#[derive(Debug, Clone)]
pub(crate) enum Cell {
    Blank,
    Text(&'static str),
    Number(f64),
    Bool(bool),
}

/// Write `rows` to the first sheet of a new workbook at `path`
pub(crate) fn write_workbook(path: &Path, rows: &[Vec<Cell>]) {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();

    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let coord = ((c + 1) as u32, (r + 1) as u32);
            match cell {
                Cell::Blank => {}
                Cell::Text(s) => {
                    sheet.get_cell_mut(coord).set_value_string(*s);
                }
                Cell::Number(n) => {
                    sheet.get_cell_mut(coord).set_value_number(*n);
                }
                Cell::Bool(b) => {
                    sheet.get_cell_mut(coord).set_value_bool(*b);
                }
            }
        }
    }

    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}

/// Build workbook bytes in a temporary directory
pub(crate) fn workbook_bytes(rows: &[Vec<Cell>]) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.xlsx");
    write_workbook(&path, rows);
    std::fs::read(path).unwrap()
}

/// The two-column movie sheet used across tests
pub(crate) fn movie_rows(titles: &[(&'static str, f64)]) -> Vec<Vec<Cell>> {
    let mut rows = vec![vec![Cell::Text("Movie Title"), Cell::Text("IMDb Rating")]];
    rows.extend(
        titles
            .iter()
            .map(|&(title, rating)| vec![Cell::Text(title), Cell::Number(rating)]),
    );
    rows
}
