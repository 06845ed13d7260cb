//! Display tables: per-day rows with highlight annotations for renderers.

use coursecheck_core::{
    CellHighlight, CellValue, CourseEntry, DaySchedule, DayTable, DisplayCell, DisplayRow,
    HighlightMap, SlotKey, Weekday, WeeklySchedule,
};
use coursecheck_parser::{parse_cell_with, ParseOptions};

/// Highlight for one parsed cell
///
/// Art/sports cells always get the special highlight. Otherwise a teacher
/// conflict takes precedence over a classroom conflict.
pub fn cell_highlight(
    entry: Option<&CourseEntry>,
    highlights: &HighlightMap,
    key: SlotKey,
) -> CellHighlight {
    let Some(entry) = entry else {
        return CellHighlight::None;
    };
    if entry.is_art_sports {
        return CellHighlight::ArtSports;
    }
    if let Some(color) = highlights.teacher_color(key, &entry.teacher) {
        return CellHighlight::TeacherConflict {
            color: color.to_string(),
        };
    }
    if let Some(color) = highlights.classroom_color(key, &entry.classroom) {
        return CellHighlight::ClassroomConflict {
            color: color.to_string(),
        };
    }
    CellHighlight::None
}

/// Tables for every day that has class rows, Monday first
pub fn build_tables(
    days: &WeeklySchedule,
    highlights: &HighlightMap,
    options: &ParseOptions,
) -> Vec<DayTable> {
    days.iter()
        .filter(|(_, schedule)| !schedule.is_empty())
        .map(|(&day, schedule)| build_table(day, schedule, highlights, options))
        .collect()
}

fn build_table(
    day: Weekday,
    schedule: &DaySchedule,
    highlights: &HighlightMap,
    options: &ParseOptions,
) -> DayTable {
    let max_cols = schedule.max_cols();
    let rows = schedule
        .rows
        .iter()
        .map(|row| DisplayRow {
            class_name: row.first().map(CellValue::display_text).unwrap_or_default(),
            cells: (1..max_cols)
                .map(|column| {
                    let cell = row.get(column).unwrap_or(&CellValue::Empty);
                    let entry = parse_cell_with(cell, options);
                    let text = if cell.is_present() {
                        cell.display_text()
                    } else {
                        String::new()
                    };
                    DisplayCell {
                        text,
                        highlight: cell_highlight(
                            entry.as_ref(),
                            highlights,
                            SlotKey::new(day, column),
                        ),
                    }
                })
                .collect(),
        })
        .collect();

    DayTable {
        day,
        slot_count: schedule.slot_count(),
        rows,
    }
}
