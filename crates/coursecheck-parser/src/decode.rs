//! Spreadsheet decoding
//!
//! Produces a `RawGrid` from the first sheet of a workbook or from a CSV
//! file. Rows are aligned to column A and lose their trailing empty cells, so
//! a row's length reflects its last filled cell.

use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use thiserror::Error;
use tracing::{debug, info};

use coursecheck_core::{CellValue, CheckError, RawGrid, Row};

/// Decoding error
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Workbook(String),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("workbook has no sheets")]
    NoSheet,
}

impl From<DecodeError> for CheckError {
    fn from(err: DecodeError) -> Self {
        CheckError::DecodeFailure(err.to_string())
    }
}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Excel or OpenDocument workbook (.xlsx, .xlsm, .xls, .ods, ...)
    Workbook,
    /// Comma-separated values (.csv)
    Csv,
}

/// Detect file format from extension
pub fn detect_format(path: &Path) -> FileFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => FileFormat::Csv,
        _ => FileFormat::Workbook,
    }
}

/// Decode a schedule file (auto-detects format)
pub fn decode_file(path: &Path) -> Result<RawGrid, DecodeError> {
    let grid = match detect_format(path) {
        FileFormat::Csv => decode_csv(std::fs::File::open(path)?)?,
        FileFormat::Workbook => decode_workbook(path)?,
    };
    info!(path = %path.display(), rows = grid.len(), "decoded schedule grid");
    Ok(grid)
}

/// Decode the first sheet of a workbook
pub fn decode_workbook(path: &Path) -> Result<RawGrid, DecodeError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| DecodeError::Workbook(e.to_string()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(DecodeError::NoSheet)?;
    debug!(%sheet, "reading first sheet");

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| DecodeError::Workbook(e.to_string()))?;
    Ok(range_to_grid(&range))
}

/// Decode CSV text; every record becomes one row, no header handling
pub fn decode_csv<R: Read>(reader: R) -> Result<RawGrid, DecodeError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut grid = RawGrid::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut row: Row = record
            .iter()
            .map(|field| CellValue::from(field.trim_start_matches('\u{feff}')))
            .collect();
        trim_trailing_empty(&mut row);
        grid.push(row);
    }
    Ok(grid)
}

fn range_to_grid(range: &Range<Data>) -> RawGrid {
    let Some((first_row, first_col)) = range.start() else {
        return RawGrid::new();
    };

    let mut grid: RawGrid = vec![Row::new(); first_row as usize];
    for cells in range.rows() {
        let mut row: Row = std::iter::repeat(CellValue::Empty)
            .take(first_col as usize)
            .chain(cells.iter().map(cell_value))
            .collect();
        trim_trailing_empty(&mut row);
        grid.push(row);
    }
    grid
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.clone()),
        _ => CellValue::Empty,
    }
}

fn trim_trailing_empty(row: &mut Row) {
    while row.last().is_some_and(CellValue::is_empty) {
        row.pop();
    }
}
