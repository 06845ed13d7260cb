//! # coursecheck-checker
//!
//! Conflict detection for weekly class schedules.
//!
//! This crate provides:
//! - Subject-duplicate, teacher and classroom conflict scans
//! - Conflict colorization for highlighted tables
//! - Category grouping of conflict records
//! - The full check pipeline producing a `CheckReport`
//!
//! ## Example
//!
//! ```rust
//! use coursecheck_core::text_row;
//! use coursecheck_checker::ScheduleChecker;
//!
//! let grid = vec![
//!     text_row(&["", "星期一"]),
//!     text_row(&["班级", "第1节"]),
//!     text_row(&["701", "数 王老师 201"]),
//!     text_row(&["702", "数 王老师 201"]),
//! ];
//! let report = ScheduleChecker::new().check(&grid).unwrap();
//! assert_eq!(report.problem_count(), 2);
//! ```

pub mod aggregate;
pub mod colorize;
pub mod scan;
pub mod table;

pub use aggregate::group_by_category;
pub use colorize::colorize;
pub use scan::{scan_classrooms, scan_subjects, scan_teachers, tally_slot, SlotTally, Tally, TallyKey};
pub use table::{build_tables, cell_highlight};

use std::path::Path;

use coursecheck_core::{
    CheckError, CheckReport, ConflictRecord, DayStats, RawGrid, WeeklySchedule,
};
use coursecheck_parser::{load_grid, segment_days, ParseOptions};
use tracing::info;

/// Options for one check run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckOptions {
    /// Run the three scans on the rayon pool
    pub parallel: bool,
    pub parse: ParseOptions,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            parse: ParseOptions::default(),
        }
    }
}

/// Schedule conflict checker
#[derive(Clone, Debug, Default)]
pub struct ScheduleChecker {
    pub options: CheckOptions,
}

impl ScheduleChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the scans one after another on the calling thread
    pub fn sequential(mut self) -> Self {
        self.options.parallel = false;
        self
    }

    pub fn parse_options(mut self, parse: ParseOptions) -> Self {
        self.options.parse = parse;
        self
    }

    /// Check a decoded grid
    pub fn check(&self, grid: &RawGrid) -> Result<CheckReport, CheckError> {
        check_grid(grid, &self.options)
    }

    /// Decode and check a schedule file
    pub fn check_file(&self, path: &Path) -> Result<CheckReport, CheckError> {
        let grid = load_grid(path)?;
        self.check(&grid)
    }
}

/// Segment a grid and run every pass over it
///
/// An empty grid is rejected before any scan runs.
pub fn check_grid(grid: &RawGrid, options: &CheckOptions) -> Result<CheckReport, CheckError> {
    if grid.is_empty() {
        return Err(CheckError::EmptyInput);
    }
    Ok(check_days(segment_days(grid), options))
}

/// Run scans, colorizer and aggregator over already segmented days
pub fn check_days(days: WeeklySchedule, options: &CheckOptions) -> CheckReport {
    let conflicts = scan_all(&days, options);
    let highlights = colorize(&days, &options.parse);
    let groups = group_by_category(&conflicts);
    let tables = build_tables(&days, &highlights, &options.parse);
    let stats = days
        .iter()
        .map(|(&day, schedule)| {
            let stats = DayStats {
                rows: schedule.rows.len(),
                slots: schedule.slot_count(),
            };
            (day, stats)
        })
        .collect();

    info!(
        days = days.len(),
        conflicts = conflicts.len(),
        highlighted = highlights.color_count(),
        "schedule check complete"
    );

    CheckReport {
        days,
        conflicts,
        groups,
        highlights,
        tables,
        stats,
    }
}

/// All conflict records: subject scan, then teacher scan, then classroom scan
pub fn scan_all(days: &WeeklySchedule, options: &CheckOptions) -> Vec<ConflictRecord> {
    let parse = &options.parse;
    let (subjects, (teachers, classrooms)) = if options.parallel {
        rayon::join(
            || scan_subjects(days, parse),
            || {
                rayon::join(
                    || scan_teachers(days, parse),
                    || scan_classrooms(days, parse),
                )
            },
        )
    } else {
        (
            scan_subjects(days, parse),
            (scan_teachers(days, parse), scan_classrooms(days, parse)),
        )
    };

    let mut records = subjects;
    records.extend(teachers);
    records.extend(classrooms);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursecheck_core::{text_row, ConflictKind};

    #[test]
    fn checker_creation() {
        let checker = ScheduleChecker::new();
        assert!(checker.options.parallel);
        assert!(!checker.sequential().options.parallel);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let result = ScheduleChecker::new().check(&Vec::new());
        assert_eq!(result.unwrap_err(), CheckError::EmptyInput);
    }

    #[test]
    fn grid_without_markers_is_clean() {
        let grid = vec![text_row(&["701", "数 王老师 201"])];
        let report = ScheduleChecker::new().check(&grid).unwrap();
        assert!(report.is_clean());
        assert!(report.days.is_empty());
        assert!(report.tables.is_empty());
    }

    #[test]
    fn scans_are_ordered_by_kind() {
        let grid = vec![
            text_row(&["", "星期一"]),
            text_row(&["班级", "第1节", "第2节"]),
            text_row(&["701", "数 王老师 201", "数 刘老师 202"]),
            text_row(&["702", "数 王老师 201", "语 张老师 101"]),
        ];
        let report = ScheduleChecker::new().check(&grid).unwrap();
        let kinds: Vec<_> = report.conflicts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ConflictKind::SubjectDuplicate,
                ConflictKind::TeacherConflict,
                ConflictKind::ClassroomConflict,
            ]
        );
        assert_eq!(report.groups.len(), 3);
    }
}
