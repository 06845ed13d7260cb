//! Conflict highlight colors
//!
//! The colorizer assigns each conflicting teacher or classroom a color per
//! `(day, column)` slot. Renderers combine those colors with the fixed
//! art/sports color when styling table cells.

use indexmap::IndexMap;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Weekday;

/// Background palette for teacher conflicts
pub const TEACHER_PALETTE: [&str; 5] = ["#ffcdd2", "#f8bbd9", "#e1bee7", "#d1c4e9", "#c5cae9"];

/// Background palette for classroom conflicts
pub const CLASSROOM_PALETTE: [&str; 5] = ["#ffe0b2", "#ffccbc", "#d7ccc8", "#f0f4c3", "#dcedc8"];

/// Background for art/sports cells, independent of conflicts
pub const ART_SPORTS_COLOR: &str = "#e3f2fd";

pub const TEACHER_BORDER: &str = "#d32f2f";
pub const CLASSROOM_BORDER: &str = "#f57c00";

/// Legend row shown under rendered tables
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: &'static str,
    pub background: &'static str,
    pub border: Option<&'static str>,
}

pub const LEGEND: [LegendEntry; 3] = [
    LegendEntry {
        label: "艺术/体育课程",
        background: ART_SPORTS_COLOR,
        border: None,
    },
    LegendEntry {
        label: "老师时间冲突",
        background: TEACHER_PALETTE[0],
        border: Some(TEACHER_BORDER),
    },
    LegendEntry {
        label: "教室使用冲突",
        background: CLASSROOM_PALETTE[0],
        border: Some(CLASSROOM_BORDER),
    },
];

/// A time slot within one day
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub day: Weekday,
    /// Grid column, 1 is the first slot
    pub column: usize,
}

impl SlotKey {
    pub fn new(day: Weekday, column: usize) -> Self {
        Self { day, column }
    }
}

/// Colors assigned within one slot, in assignment order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotColors {
    pub teachers: IndexMap<String, String>,
    pub classrooms: IndexMap<String, String>,
}

/// Highlight colors for every conflicting slot of one check run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightMap {
    slots: BTreeMap<SlotKey, SlotColors>,
}

impl HighlightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_teacher(&mut self, key: SlotKey, teacher: impl Into<String>, color: impl Into<String>) {
        self.slots
            .entry(key)
            .or_default()
            .teachers
            .insert(teacher.into(), color.into());
    }

    pub fn insert_classroom(
        &mut self,
        key: SlotKey,
        classroom: impl Into<String>,
        color: impl Into<String>,
    ) {
        self.slots
            .entry(key)
            .or_default()
            .classrooms
            .insert(classroom.into(), color.into());
    }

    pub fn slot(&self, key: SlotKey) -> Option<&SlotColors> {
        self.slots.get(&key)
    }

    pub fn teacher_color(&self, key: SlotKey, teacher: &str) -> Option<&str> {
        self.slot(key)
            .and_then(|s| s.teachers.get(teacher))
            .map(String::as_str)
    }

    pub fn classroom_color(&self, key: SlotKey, classroom: &str) -> Option<&str> {
        self.slot(key)
            .and_then(|s| s.classrooms.get(classroom))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &SlotColors)> {
        self.slots.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total number of colored names across all slots
    pub fn color_count(&self) -> usize {
        self.slots
            .values()
            .map(|s| s.teachers.len() + s.classrooms.len())
            .sum()
    }
}

#[derive(Serialize)]
struct HighlightEntry<'a> {
    day: Weekday,
    column: usize,
    teachers: &'a IndexMap<String, String>,
    classrooms: &'a IndexMap<String, String>,
}

// JSON object keys must be strings, so slots serialize as a list.
impl Serialize for HighlightMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.slots.iter().map(|(key, colors)| HighlightEntry {
            day: key.day,
            column: key.column,
            teachers: &colors.teachers,
            classrooms: &colors.classrooms,
        }))
    }
}

/// Styling of one display cell
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellHighlight {
    #[default]
    None,
    ArtSports,
    TeacherConflict { color: String },
    ClassroomConflict { color: String },
}

impl CellHighlight {
    pub fn background(&self) -> Option<&str> {
        match self {
            CellHighlight::None => None,
            CellHighlight::ArtSports => Some(ART_SPORTS_COLOR),
            CellHighlight::TeacherConflict { color } | CellHighlight::ClassroomConflict { color } => {
                Some(color.as_str())
            }
        }
    }

    pub fn border(&self) -> Option<&'static str> {
        match self {
            CellHighlight::TeacherConflict { .. } => Some(TEACHER_BORDER),
            CellHighlight::ClassroomConflict { .. } => Some(CLASSROOM_BORDER),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            CellHighlight::TeacherConflict { .. } | CellHighlight::ClassroomConflict { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_slot_and_name() {
        let mut map = HighlightMap::new();
        let key = SlotKey::new(Weekday::Monday, 1);
        map.insert_teacher(key, "王老师", TEACHER_PALETTE[0]);
        map.insert_classroom(key, "201", CLASSROOM_PALETTE[0]);

        assert_eq!(map.teacher_color(key, "王老师"), Some("#ffcdd2"));
        assert_eq!(map.classroom_color(key, "201"), Some("#ffe0b2"));
        assert_eq!(map.teacher_color(SlotKey::new(Weekday::Monday, 2), "王老师"), None);
        assert_eq!(map.color_count(), 2);
    }

    #[test]
    fn serializes_as_list() {
        let mut map = HighlightMap::new();
        map.insert_teacher(SlotKey::new(Weekday::Tuesday, 3), "李老师", "#ffcdd2");
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json[0]["day"], "星期二");
        assert_eq!(json[0]["column"], 3);
        assert_eq!(json[0]["teachers"]["李老师"], "#ffcdd2");
    }

    #[test]
    fn highlight_styles() {
        assert_eq!(CellHighlight::ArtSports.background(), Some(ART_SPORTS_COLOR));
        assert_eq!(CellHighlight::ArtSports.border(), None);
        let teacher = CellHighlight::TeacherConflict {
            color: "#f8bbd9".into(),
        };
        assert_eq!(teacher.background(), Some("#f8bbd9"));
        assert_eq!(teacher.border(), Some(TEACHER_BORDER));
        assert!(teacher.is_conflict());
        assert!(!CellHighlight::None.is_conflict());
    }
}
