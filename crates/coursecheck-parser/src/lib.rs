//! # coursecheck-parser
//!
//! Turns decoded spreadsheet cells into structured schedule data.
//!
//! This crate provides:
//! - Cell parser: one cell's text into a `CourseEntry`
//! - Day segmenter: the flat row list into per-weekday blocks
//! - Spreadsheet decoding (.xlsx/.xls/.ods via calamine, .csv)
//!
//! ## Example
//!
//! ```rust
//! use coursecheck_core::{text_row, CellValue, Weekday};
//! use coursecheck_parser::{parse_cell, segment_days};
//!
//! let entry = parse_cell(&CellValue::text("数学 王老师 201")).unwrap();
//! assert_eq!(entry.subject, '数');
//! assert_eq!(entry.teacher, "王老师");
//!
//! let grid = vec![
//!     text_row(&["", "星期一"]),
//!     text_row(&["班级", "第1节"]),
//!     text_row(&["701", "数学 王老师 201"]),
//! ];
//! let days = segment_days(&grid);
//! assert_eq!(days[&Weekday::Monday].rows.len(), 1);
//! ```

pub mod cell;
pub mod decode;
pub mod segment;

pub use cell::{parse_cell, parse_cell_with, ParseOptions};
pub use decode::{decode_csv, decode_file, decode_workbook, detect_format, DecodeError, FileFormat};
pub use segment::{is_class_row, segment_days};

use coursecheck_core::{CheckError, RawGrid};

/// Decode a schedule file, mapping any failure to `CheckError::DecodeFailure`
pub fn load_grid(path: &std::path::Path) -> Result<RawGrid, CheckError> {
    decode_file(path).map_err(CheckError::from)
}
