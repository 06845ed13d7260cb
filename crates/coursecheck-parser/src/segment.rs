//! Day segmenter
//!
//! A schedule sheet stacks one block per weekday. Each block starts with a
//! marker row whose second cell names the day (`星期一` .. `星期五`), followed by
//! a slot header row, followed by one row per class:
//!
//! ```text
//! |       | 星期一   |          |
//! | 班级  | 第1节    | 第2节    |
//! | 701   | 语 张 101 | 数 王 201 |
//! | 702   | ...      | ...      |
//! |       | 星期二   |          |
//! ```
//!
//! A block runs until the row before the next marker, or to the end of the
//! grid. Grade and class-label rows inside a block are dropped.

use tracing::debug;

use coursecheck_core::vocab::{CLASS_LABEL, GRADE_LABEL, WEEKDAY_TOKEN};
use coursecheck_core::{CellValue, DaySchedule, RawGrid, Row, Weekday, WeeklySchedule};

/// Rows between a marker and the first class row (marker + slot header)
const HEADER_ROWS: usize = 2;

/// Second-cell text of a day-marker row
fn marker_text(row: &Row) -> Option<&str> {
    row.get(1)
        .and_then(CellValue::as_text)
        .filter(|text| text.contains(WEEKDAY_TOKEN))
}

/// Whether a row inside a day block describes a class
pub fn is_class_row(row: &Row) -> bool {
    let Some(first) = row.first() else {
        return false;
    };
    if !first.is_present() {
        return false;
    }
    let name = first.display_text();
    !name.contains(GRADE_LABEL) && !name.contains(CLASS_LABEL) && name != CLASS_LABEL
}

/// Partition the grid into weekday blocks
///
/// A marker row whose text names none of the five weekdays (`星期六`) re-opens
/// the most recent weekday at that row; before any weekday it opens nothing.
/// When a weekday is marked twice, the later block replaces the earlier one.
pub fn segment_days(grid: &RawGrid) -> WeeklySchedule {
    let mut days = WeeklySchedule::new();
    if grid.is_empty() {
        return days;
    }
    let last_row = grid.len() - 1;

    let markers: Vec<(usize, &str)> = grid
        .iter()
        .enumerate()
        .filter_map(|(index, row)| marker_text(row).map(|text| (index, text)))
        .collect();

    let mut current: Option<Weekday> = None;
    for (position, &(start_row, text)) in markers.iter().enumerate() {
        let Some(day) = Weekday::find_in(text).or(current) else {
            debug!(row = start_row, text, "marker row names no weekday");
            continue;
        };
        current = Some(day);

        let end_row = markers
            .get(position + 1)
            .map_or(last_row, |&(next, _)| next - 1);

        let mut schedule = DaySchedule::new(start_row, end_row);
        schedule.rows = grid
            .iter()
            .take(end_row + 1)
            .skip(start_row + HEADER_ROWS)
            .filter(|row| is_class_row(row))
            .cloned()
            .collect();

        debug!(
            %day,
            start_row,
            end_row,
            classes = schedule.rows.len(),
            "segmented day block"
        );

        if days.insert(day, schedule).is_some() {
            debug!(%day, row = start_row, "weekday marked again, later block wins");
        }
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursecheck_core::text_row;
    use pretty_assertions::assert_eq;

    fn sample_week() -> RawGrid {
        vec![
            text_row(&["七年级课表"]),
            text_row(&["", "星期一"]),
            text_row(&["班级", "第1节", "第2节"]),
            text_row(&["701", "语文 张老师 101", "数学 王老师 201"]),
            text_row(&["702", "数学 王老师 201", "英语 李老师 102"]),
            text_row(&["", "星期二"]),
            text_row(&["班级", "第1节", "第2节"]),
            text_row(&["701", "英语 李老师 102"]),
        ]
    }

    #[test]
    fn empty_grid_has_no_days() {
        assert!(segment_days(&Vec::new()).is_empty());
    }

    #[test]
    fn blocks_split_at_markers() {
        let days = segment_days(&sample_week());
        assert_eq!(days.len(), 2);

        let monday = &days[&Weekday::Monday];
        assert_eq!((monday.start_row, monday.end_row), (1, 4));
        assert_eq!(monday.rows.len(), 2);
        assert_eq!(monday.class_name(0), "701");

        let tuesday = &days[&Weekday::Tuesday];
        assert_eq!((tuesday.start_row, tuesday.end_row), (5, 7));
        assert_eq!(tuesday.rows.len(), 1);
    }

    #[test]
    fn rows_before_first_marker_are_ignored() {
        let days = segment_days(&sample_week());
        assert!(days
            .values()
            .all(|d| d.rows.iter().all(|r| r[0].display_text() != "七年级课表")));
    }

    #[test]
    fn header_rows_are_excluded() {
        let grid = vec![
            text_row(&["", "星期三"]),
            text_row(&["班级", "第1节"]),
            text_row(&["五年级", "语文 张老师"]),
            text_row(&["班", "语文 张老师"]),
            text_row(&["三班", "语文 张老师"]),
            text_row(&["", "语文 张老师"]),
            text_row(&["501", "语文 张老师"]),
        ];
        let days = segment_days(&grid);
        let wednesday = &days[&Weekday::Wednesday];
        assert_eq!(wednesday.rows.len(), 1);
        assert_eq!(wednesday.class_name(0), "501");
    }

    #[test]
    fn numeric_class_names_are_kept() {
        let grid = vec![
            text_row(&["", "星期四"]),
            text_row(&["班级", "第1节"]),
            vec![CellValue::Number(801.0), CellValue::text("语文 张老师")],
            vec![CellValue::Number(0.0), CellValue::text("语文 张老师")],
        ];
        let days = segment_days(&grid);
        assert_eq!(days[&Weekday::Thursday].rows.len(), 1);
        assert_eq!(days[&Weekday::Thursday].class_name(0), "801");
    }

    #[test]
    fn marker_with_only_header_gives_empty_day() {
        let grid = vec![
            text_row(&["", "星期五"]),
            text_row(&["班级", "第1节"]),
        ];
        let days = segment_days(&grid);
        let friday = &days[&Weekday::Friday];
        assert!(friday.is_empty());
        assert_eq!((friday.start_row, friday.end_row), (0, 1));
    }

    #[test]
    fn marker_on_last_row() {
        let grid = vec![text_row(&["701", "语文 张老师"]), text_row(&["", "星期一"])];
        let days = segment_days(&grid);
        let monday = &days[&Weekday::Monday];
        assert_eq!((monday.start_row, monday.end_row), (1, 1));
        assert!(monday.is_empty());
    }

    #[test]
    fn unrecognized_marker_reopens_current_day() {
        let grid = vec![
            text_row(&["", "星期一"]),
            text_row(&["班级", "第1节"]),
            text_row(&["701", "语文 张老师"]),
            text_row(&["", "星期六"]),
            text_row(&["班级", "第1节"]),
            text_row(&["701", "数学 王老师"]),
            text_row(&["702", "数学 王老师"]),
        ];
        let days = segment_days(&grid);
        assert_eq!(days.len(), 1);
        let monday = &days[&Weekday::Monday];
        assert_eq!((monday.start_row, monday.end_row), (3, 6));
        assert_eq!(monday.rows.len(), 2);
        assert_eq!(monday.rows[0][1], CellValue::text("数学 王老师"));
    }

    #[test]
    fn unrecognized_marker_before_any_weekday_opens_nothing() {
        let grid = vec![
            text_row(&["", "星期六"]),
            text_row(&["班级", "第1节"]),
            text_row(&["701", "数学 王老师"]),
            text_row(&["", "星期二"]),
            text_row(&["班级", "第1节"]),
            text_row(&["701", "语文 张老师"]),
        ];
        let days = segment_days(&grid);
        assert_eq!(days.len(), 1);
        assert_eq!(days[&Weekday::Tuesday].start_row, 3);
    }

    #[test]
    fn repeated_weekday_keeps_later_block() {
        let grid = vec![
            text_row(&["", "星期一"]),
            text_row(&["班级", "第1节"]),
            text_row(&["701", "语文 张老师"]),
            text_row(&["", "星期一（下午）"]),
            text_row(&["班级", "第5节"]),
            text_row(&["701", "数学 王老师"]),
            text_row(&["702", "英语 李老师"]),
        ];
        let days = segment_days(&grid);
        let monday = &days[&Weekday::Monday];
        assert_eq!(monday.start_row, 3);
        assert_eq!(monday.rows.len(), 2);
    }

    #[test]
    fn marker_must_be_text_in_second_column() {
        let grid = vec![
            text_row(&["星期一", "第1节"]),
            text_row(&["班级", "第1节"]),
            text_row(&["701", "语文 张老师"]),
        ];
        assert!(segment_days(&grid).is_empty());
    }
}
