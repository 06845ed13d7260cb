//! # coursecheck-core
//!
//! Core domain model and traits for the coursecheck schedule checker.
//!
//! This crate provides:
//! - Input types: `CellValue`, `RawGrid`
//! - Domain types: `Weekday`, `CourseEntry`, `DaySchedule`, `ConflictRecord`
//! - Result types: `CheckReport`, `DayTable`, `HighlightMap`
//! - Core traits: `Renderer`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use coursecheck_core::{CellValue, ConflictRecord, Weekday};
//!
//! let cell = CellValue::text("语 张老师 101");
//! assert_eq!(cell.as_text(), Some("语 张老师 101"));
//!
//! let record = ConflictRecord::teacher_conflict(Weekday::Monday, 2, "王老师", 2);
//! assert!(record.message.contains("第2节课"));
//! ```

pub mod highlight;
pub mod vocab;

pub use highlight::{CellHighlight, HighlightMap, LegendEntry, SlotColors, SlotKey, LEGEND};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Raw Input
// ============================================================================

/// One decoded spreadsheet cell
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// The cell's text, if it holds text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Whether the cell counts as filled in: non-empty text or a non-zero number
    pub fn is_present(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Text(s) => !s.is_empty(),
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
        }
    }

    /// Text shown for this cell in reports and tables
    pub fn display_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            Self::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One grid row; index 0 is the class-name column
pub type Row = Vec<CellValue>;

/// Row-major grid of decoded cells, header rows included
pub type RawGrid = Vec<Row>;

/// Build a row of text cells (empty strings become `CellValue::Empty`)
pub fn text_row(cells: &[&str]) -> Row {
    cells.iter().map(|c| CellValue::from(*c)).collect()
}

// ============================================================================
// Weekdays
// ============================================================================

/// The five school days recognized in day-marker rows
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "星期一")]
    Monday,
    #[serde(rename = "星期二")]
    Tuesday,
    #[serde(rename = "星期三")]
    Wednesday,
    #[serde(rename = "星期四")]
    Thursday,
    #[serde(rename = "星期五")]
    Friday,
}

impl Weekday {
    /// All weekdays, Monday first
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "星期一",
            Weekday::Tuesday => "星期二",
            Weekday::Wednesday => "星期三",
            Weekday::Thursday => "星期四",
            Weekday::Friday => "星期五",
        }
    }

    /// First weekday whose label occurs in `text`, checked Monday to Friday
    pub fn find_in(text: &str) -> Option<Weekday> {
        Self::ALL.into_iter().find(|day| text.contains(day.label()))
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Courses
// ============================================================================

/// A course parsed from one non-empty cell
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEntry {
    /// Single-character subject code
    pub subject: char,
    pub teacher: String,
    /// Location, empty when the cell names none
    pub classroom: String,
    /// Trimmed cell text
    pub full_name: String,
    /// Art and sports lessons are exempt from every conflict scan
    pub is_art_sports: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub art_group_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub art_class_count: Option<u64>,
}

impl CourseEntry {
    /// A regular lesson: subject, teacher and optional classroom
    pub fn regular(
        subject: char,
        teacher: impl Into<String>,
        classroom: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            subject,
            teacher: teacher.into(),
            classroom: classroom.into(),
            full_name: full_name.into(),
            is_art_sports: false,
            art_group_number: None,
            art_class_count: None,
        }
    }

    pub fn sports(full_name: impl Into<String>) -> Self {
        Self {
            subject: vocab::SPORTS_SUBJECT,
            teacher: vocab::SPORTS_TEACHER.into(),
            classroom: String::new(),
            full_name: full_name.into(),
            is_art_sports: true,
            art_group_number: None,
            art_class_count: None,
        }
    }

    pub fn art(full_name: impl Into<String>, group: Option<String>, class_count: u64) -> Self {
        Self {
            subject: vocab::ART_SUBJECT,
            teacher: vocab::ART_TEACHER.into(),
            classroom: String::new(),
            full_name: full_name.into(),
            is_art_sports: true,
            art_group_number: group,
            art_class_count: Some(class_count),
        }
    }

    pub fn has_classroom(&self) -> bool {
        !self.classroom.is_empty()
    }
}

// ============================================================================
// Day Blocks
// ============================================================================

/// Rows of the grid belonging to one weekday
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Index of the day-marker row
    pub start_row: usize,
    /// Last row of the block (inclusive)
    pub end_row: usize,
    /// Class rows, header rows excluded
    pub rows: Vec<Row>,
}

impl DaySchedule {
    pub fn new(start_row: usize, end_row: usize) -> Self {
        Self {
            start_row,
            end_row,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Longest row length in the block (0 for an empty block)
    pub fn max_cols(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Number of time-slot columns (every column after the class name)
    pub fn slot_count(&self) -> usize {
        self.max_cols().saturating_sub(1)
    }

    /// Class name of row `index`
    pub fn class_name(&self, index: usize) -> String {
        self.rows
            .get(index)
            .and_then(|row| row.first())
            .map(CellValue::display_text)
            .unwrap_or_default()
    }

    /// Cell at `(row, column)`, `None` past the end of a short row
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

/// Day blocks keyed by weekday, iterated Monday to Friday
pub type WeeklySchedule = BTreeMap<Weekday, DaySchedule>;

// ============================================================================
// Conflicts
// ============================================================================

/// Which scan produced a record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    SubjectDuplicate,
    TeacherConflict,
    ClassroomConflict,
    /// Records of a kind this crate does not produce
    #[serde(other)]
    Other,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKind::SubjectDuplicate => "subject-duplicate",
            ConflictKind::TeacherConflict => "teacher-conflict",
            ConflictKind::ClassroomConflict => "classroom-conflict",
            ConflictKind::Other => "other",
        }
    }
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in a day a conflict was found
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictScope {
    /// A class row (subject scan)
    Class(String),
    /// A 1-based time slot (teacher and classroom scans)
    Slot(usize),
}

/// A single detected conflict
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub kind: ConflictKind,
    pub day: Weekday,
    pub scope: ConflictScope,
    /// Subject code, teacher name or classroom, depending on `kind`
    pub key: String,
    pub count: usize,
    pub message: String,
}

impl ConflictRecord {
    pub fn subject_duplicate(
        day: Weekday,
        class_name: impl Into<String>,
        subject: char,
        count: usize,
    ) -> Self {
        let class_name = class_name.into();
        let message = format!(
            "{day} - 班级{class_name}：科目\"{subject}\"出现了{count}次，应该只出现一次"
        );
        Self {
            kind: ConflictKind::SubjectDuplicate,
            day,
            scope: ConflictScope::Class(class_name),
            key: subject.to_string(),
            count,
            message,
        }
    }

    pub fn teacher_conflict(
        day: Weekday,
        slot: usize,
        teacher: impl Into<String>,
        count: usize,
    ) -> Self {
        let teacher = teacher.into();
        let message = format!(
            "{day} - 第{slot}节课：老师\"{teacher}\"在同一时间段有{count}节课，应该只有一节课"
        );
        Self {
            kind: ConflictKind::TeacherConflict,
            day,
            scope: ConflictScope::Slot(slot),
            key: teacher,
            count,
            message,
        }
    }

    pub fn classroom_conflict(
        day: Weekday,
        slot: usize,
        classroom: impl Into<String>,
        count: usize,
    ) -> Self {
        let classroom = classroom.into();
        let message = format!(
            "{day} - 第{slot}节课：教室\"{classroom}\"在同一时间段被使用{count}次，存在冲突"
        );
        Self {
            kind: ConflictKind::ClassroomConflict,
            day,
            scope: ConflictScope::Slot(slot),
            key: classroom,
            count,
            message,
        }
    }
}

/// Report category a conflict is listed under
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    SubjectDuplicate,
    TeacherConflict,
    ClassroomConflict,
    Other,
}

impl Category {
    pub fn of(kind: ConflictKind) -> Self {
        match kind {
            ConflictKind::SubjectDuplicate => Category::SubjectDuplicate,
            ConflictKind::TeacherConflict => Category::TeacherConflict,
            ConflictKind::ClassroomConflict => Category::ClassroomConflict,
            ConflictKind::Other => Category::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::SubjectDuplicate => "科目重复",
            Category::TeacherConflict => "老师冲突",
            Category::ClassroomConflict => "教室冲突",
            Category::Other => "其他问题",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Records sharing one category, in emission order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictGroup {
    pub category: Category,
    pub records: Vec<ConflictRecord>,
}

// ============================================================================
// Check Results
// ============================================================================

/// Size of one day block as seen by the scanners
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    pub rows: usize,
    pub slots: usize,
}

/// One cell of a display table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayCell {
    pub text: String,
    pub highlight: CellHighlight,
}

/// One class row of a display table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub class_name: String,
    /// One cell per slot, padded to the day's slot count
    pub cells: Vec<DisplayCell>,
}

/// Rendering-ready table for one weekday
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTable {
    pub day: Weekday,
    pub slot_count: usize,
    pub rows: Vec<DisplayRow>,
}

impl DayTable {
    /// Column headers: class column then `第N节` per slot
    pub fn headers(&self) -> Vec<String> {
        std::iter::once(vocab::CLASS_HEADER.to_string())
            .chain((1..=self.slot_count).map(|slot| format!("第{slot}节")))
            .collect()
    }
}

/// Everything one check run produces
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CheckReport {
    #[serde(skip)]
    pub days: WeeklySchedule,
    /// Records in scan order: subject, teacher, classroom
    pub conflicts: Vec<ConflictRecord>,
    pub groups: Vec<ConflictGroup>,
    pub highlights: HighlightMap,
    pub tables: Vec<DayTable>,
    pub stats: BTreeMap<Weekday, DayStats>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn problem_count(&self) -> usize {
        self.conflicts.len()
    }

    /// Number of records of the given kind
    pub fn count_of(&self, kind: ConflictKind) -> usize {
        self.conflicts.iter().filter(|c| c.kind == kind).count()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a check report to the output format
    fn render(&self, report: &CheckReport) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Failure that aborts a check run before any scan
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("文件读取失败：{0}")]
    DecodeFailure(String),

    #[error("没有找到有效的排课数据")]
    EmptyInput,
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
