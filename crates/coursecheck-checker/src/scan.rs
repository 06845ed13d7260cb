//! Conflict scanners
//!
//! Three read-only passes over the day blocks:
//! - subjects, per class row (a subject may appear once per class per day)
//! - teachers, per time-slot column
//! - classrooms, per time-slot column
//!
//! Art and sports entries are exempt from all three. Days never interact.

use indexmap::IndexMap;
use std::hash::Hash;
use tracing::debug;

use coursecheck_core::{CellValue, ConflictRecord, CourseEntry, DaySchedule, WeeklySchedule};
use coursecheck_parser::{parse_cell_with, ParseOptions};

/// A tally key that may read as an array index
///
/// Index-like keys (canonical decimal below `u32::MAX`, such as room `101`)
/// sort ahead of every other key, ascending. The rest keep first-seen order.
pub trait TallyKey: Hash + Eq {
    fn array_index(&self) -> Option<u32>;
}

impl TallyKey for String {
    fn array_index(&self) -> Option<u32> {
        array_index(self)
    }
}

impl TallyKey for &str {
    fn array_index(&self) -> Option<u32> {
        array_index(self)
    }
}

impl TallyKey for char {
    fn array_index(&self) -> Option<u32> {
        self.to_digit(10)
    }
}

fn array_index(key: &str) -> Option<u32> {
    let canonical = key == "0" || (!key.starts_with('0') && !key.is_empty());
    if !canonical || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&index| index != u32::MAX)
}

/// Occurrence counts, index-like keys first then first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K: Hash + Eq> {
    counts: IndexMap<K, usize>,
}

impl<K: Hash + Eq> Default for Tally<K> {
    fn default() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }
}

impl<K: TallyKey> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn get(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Keys seen more than once, with their counts
    pub fn conflicts(&self) -> impl Iterator<Item = (&K, usize)> {
        let mut conflicts: Vec<_> = self
            .counts
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(key, &count)| (key, count))
            .collect();
        // Stable, so non-index keys stay in first-seen order
        conflicts.sort_by_key(|(key, _)| match key.array_index() {
            Some(index) => (0, index),
            None => (1, 0),
        });
        conflicts.into_iter()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Teacher and classroom occupancy of one time slot
#[derive(Debug, Clone, Default)]
pub struct SlotTally {
    pub teachers: Tally<String>,
    /// Only non-empty classrooms are counted
    pub classrooms: Tally<String>,
}

/// A cell's course, unless it is missing or exempt from scanning
pub fn scheduled_course(cell: &CellValue, options: &ParseOptions) -> Option<CourseEntry> {
    parse_cell_with(cell, options).filter(|entry| !entry.is_art_sports)
}

/// Count teachers and classrooms in one column of a day block
pub fn tally_slot(schedule: &DaySchedule, column: usize, options: &ParseOptions) -> SlotTally {
    let mut tally = SlotTally::default();
    for row in &schedule.rows {
        let Some(entry) = row.get(column).and_then(|cell| scheduled_course(cell, options)) else {
            continue;
        };
        let has_classroom = entry.has_classroom();
        tally.teachers.add(entry.teacher);
        if has_classroom {
            tally.classrooms.add(entry.classroom);
        }
    }
    tally
}

/// Subjects appearing more than once in a class's day
pub fn scan_subjects(days: &WeeklySchedule, options: &ParseOptions) -> Vec<ConflictRecord> {
    let mut records = Vec::new();
    for (&day, schedule) in days {
        for (index, row) in schedule.rows.iter().enumerate() {
            let mut subjects = Tally::new();
            for cell in row.iter().skip(1) {
                if let Some(entry) = scheduled_course(cell, options) {
                    subjects.add(entry.subject);
                }
            }

            let class_name = schedule.class_name(index);
            for (&subject, count) in subjects.conflicts() {
                records.push(ConflictRecord::subject_duplicate(
                    day,
                    class_name.clone(),
                    subject,
                    count,
                ));
            }
        }
        debug!(%day, rows = schedule.rows.len(), "subject scan");
    }
    records
}

/// Teachers booked more than once in the same slot
pub fn scan_teachers(days: &WeeklySchedule, options: &ParseOptions) -> Vec<ConflictRecord> {
    let mut records = Vec::new();
    for (&day, schedule) in days {
        for column in 1..schedule.max_cols() {
            let tally = tally_slot(schedule, column, options);
            for (teacher, count) in tally.teachers.conflicts() {
                records.push(ConflictRecord::teacher_conflict(
                    day,
                    column,
                    teacher.clone(),
                    count,
                ));
            }
        }
        debug!(%day, slots = schedule.slot_count(), "teacher scan");
    }
    records
}

/// Classrooms used more than once in the same slot
pub fn scan_classrooms(days: &WeeklySchedule, options: &ParseOptions) -> Vec<ConflictRecord> {
    let mut records = Vec::new();
    for (&day, schedule) in days {
        for column in 1..schedule.max_cols() {
            let tally = tally_slot(schedule, column, options);
            for (classroom, count) in tally.classrooms.conflicts() {
                records.push(ConflictRecord::classroom_conflict(
                    day,
                    column,
                    classroom.clone(),
                    count,
                ));
            }
        }
        debug!(%day, slots = schedule.slot_count(), "classroom scan");
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursecheck_core::{text_row, ConflictKind, ConflictScope, Weekday};
    use pretty_assertions::assert_eq;

    fn week(day: Weekday, rows: &[&[&str]]) -> WeeklySchedule {
        let mut schedule = DaySchedule::new(0, rows.len() + 1);
        schedule.rows = rows.iter().map(|r| text_row(r)).collect();
        let mut days = WeeklySchedule::new();
        days.insert(day, schedule);
        days
    }

    #[test]
    fn tally_keeps_first_seen_order() {
        let mut tally = Tally::new();
        for key in ["b", "a", "b", "c", "a"] {
            tally.add(key);
        }
        let conflicts: Vec<_> = tally.conflicts().collect();
        assert_eq!(conflicts, vec![(&"b", 2), (&"a", 2)]);
        assert_eq!(tally.get(&"c"), 1);
        assert_eq!(tally.get(&"z"), 0);
        assert_eq!(tally.len(), 3);
    }

    #[test]
    fn index_like_keys_come_first_in_ascending_order() {
        let mut tally = Tally::new();
        for key in ["实验室", "201", "1", "101", "实验室", "201", "1", "101", "0101", "0101"] {
            tally.add(key);
        }
        let keys: Vec<_> = tally.conflicts().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec!["1", "101", "201", "实验室", "0101"]);
    }

    #[test]
    fn array_index_rules() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("4294967294"), Some(4_294_967_294));
        assert_eq!(array_index("4294967295"), None);
        assert_eq!(array_index("007"), None);
        assert_eq!(array_index("+1"), None);
        assert_eq!(array_index(""), None);
        assert_eq!('7'.array_index(), Some(7));
        assert_eq!('语'.array_index(), None);
    }

    #[test]
    fn numeric_classrooms_report_in_ascending_order() {
        let days = week(
            Weekday::Monday,
            &[
                &["701", "数 王老师 201"],
                &["702", "语 张老师 201"],
                &["703", "英 李老师 101"],
                &["704", "物 赵老师 101"],
            ],
        );
        let rooms: Vec<_> = scan_classrooms(&days, &ParseOptions::default())
            .into_iter()
            .map(|record| record.key)
            .collect();
        assert_eq!(rooms, vec!["101", "201"]);
    }

    #[test]
    fn subject_duplicate_within_row() {
        let days = week(Weekday::Monday, &[&["701", "语 张老师 101", "语 李老师 102"]]);
        let records = scan_subjects(&days, &ParseOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ConflictKind::SubjectDuplicate);
        assert_eq!(records[0].key, "语");
        assert_eq!(records[0].count, 2);
        assert_eq!(records[0].scope, ConflictScope::Class("701".into()));
    }

    #[test]
    fn subject_check_ignores_other_rows() {
        let days = week(
            Weekday::Monday,
            &[&["701", "语 张老师 101"], &["702", "语 张老师 101"]],
        );
        assert!(scan_subjects(&days, &ParseOptions::default()).is_empty());
    }

    #[test]
    fn subject_uses_first_character() {
        let days = week(Weekday::Monday, &[&["701", "数学 王老师", "数学辅导 王老师"]]);
        let records = scan_subjects(&days, &ParseOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "数");
    }

    #[test]
    fn teacher_and_classroom_in_same_slot() {
        let days = week(
            Weekday::Tuesday,
            &[&["701", "数 王老师 201"], &["702", "数 王老师 201"]],
        );
        let teachers = scan_teachers(&days, &ParseOptions::default());
        assert_eq!(teachers.len(), 1);
        assert_eq!(teachers[0].key, "王老师");
        assert_eq!(teachers[0].scope, ConflictScope::Slot(1));
        assert_eq!(teachers[0].count, 2);

        let rooms = scan_classrooms(&days, &ParseOptions::default());
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].key, "201");
    }

    #[test]
    fn empty_classrooms_never_conflict() {
        let days = week(
            Weekday::Monday,
            &[&["701", "数 王老师"], &["702", "语 张老师"]],
        );
        assert!(scan_classrooms(&days, &ParseOptions::default()).is_empty());
    }

    #[test]
    fn short_rows_are_skipped_past_their_end() {
        let days = week(
            Weekday::Monday,
            &[
                &["701", "语 张老师 101"],
                &["702", "数 王老师 201", "英 李老师 102"],
                &["703", "物 赵老师 301", "英 李老师 102"],
            ],
        );
        let records = scan_teachers(&days, &ParseOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].scope, ConflictScope::Slot(2));
    }

    #[test]
    fn sports_is_exempt_everywhere() {
        let days = week(
            Weekday::Friday,
            &[&["701", "体育", "体育"], &["702", "体育", "体育"]],
        );
        let options = ParseOptions::default();
        assert!(scan_subjects(&days, &options).is_empty());
        assert!(scan_teachers(&days, &options).is_empty());
        assert!(scan_classrooms(&days, &options).is_empty());
    }

    #[test]
    fn empty_day_is_a_no_op() {
        let days = week(Weekday::Wednesday, &[]);
        let options = ParseOptions::default();
        assert!(scan_subjects(&days, &options).is_empty());
        assert!(scan_teachers(&days, &options).is_empty());
        assert!(scan_classrooms(&days, &options).is_empty());
    }

    #[test]
    fn tally_slot_counts_only_courses() {
        let mut schedule = DaySchedule::new(0, 4);
        schedule.rows = vec![
            text_row(&["701", "数 王老师 201"]),
            text_row(&["702", "艺术1组"]),
            text_row(&["703", "自习"]),
            vec![CellValue::text("704"), CellValue::Number(5.0)],
        ];
        let tally = tally_slot(&schedule, 1, &ParseOptions::default());
        assert_eq!(tally.teachers.len(), 1);
        assert_eq!(tally.classrooms.get(&"201".to_string()), 1);
    }
}
