//! Workbook reading
//!
//! Turns workbook bytes into plain string grids. Rows keep their absolute
//! sheet position (row 0 is the sheet's first row even when it is empty) and
//! trailing empty cells are dropped, so ragged rows are the norm.

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use serde::Serialize;
use std::io::Cursor;
use tracing::{debug, warn};

use crate::error::IngestError;

/// One sheet as rows of string cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Read every sheet of an xlsx/xls/xlsb/ods workbook
///
/// A sheet whose rows cannot be read is logged and left out; a stream that
/// is not a workbook, or a workbook without sheets, fails the call.
pub fn read_sheets(bytes: &[u8]) -> Result<Vec<Sheet>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let names = workbook.sheet_names();
    if names.is_empty() {
        return Err(IngestError::EmptyWorkbook);
    }
    debug!(sheets = ?names, "Workbook opened");

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let rows = grid_rows(&range);
                sheets.push(Sheet::new(name, rows));
            }
            Err(e) => warn!(sheet = %name, error = %e, "Failed to read sheet rows, skipping"),
        }
    }
    Ok(sheets)
}

fn grid_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<String>> = (0..start_row).map(|_| Vec::new()).collect();
    for cells in range.rows() {
        let mut row = vec![String::new(); start_col as usize];
        row.extend(cells.iter().map(cell_text));
        while row.last().is_some_and(|cell| cell.is_empty()) {
            row.pop();
        }
        rows.push(row);
    }
    rows
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
        other => other.to_string(),
    }
}
