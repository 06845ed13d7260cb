//! Conflict colorizer
//!
//! Assigns every conflicting teacher and classroom a highlight color per
//! `(day, column)` slot. Colors cycle through two fixed palettes; the two
//! cursors advance across the whole pass and are never reset per slot, so
//! neighboring conflicts tend to get distinct colors.
//!
//! The tallies come from [`tally_slot`], the same function the scanners use,
//! so every teacher or classroom reported as a conflict gets a color here.

use coursecheck_core::highlight::{CLASSROOM_PALETTE, TEACHER_PALETTE};
use coursecheck_core::{HighlightMap, SlotKey, WeeklySchedule};
use coursecheck_parser::ParseOptions;
use tracing::debug;

use crate::scan::tally_slot;

/// Round-robin position in a palette
#[derive(Debug, Clone)]
struct PaletteCursor {
    palette: &'static [&'static str],
    next: usize,
}

impl PaletteCursor {
    fn new(palette: &'static [&'static str]) -> Self {
        Self { palette, next: 0 }
    }

    fn next_color(&mut self) -> &'static str {
        let color = self.palette[self.next % self.palette.len()];
        self.next += 1;
        color
    }
}

/// Build the highlight map for one check run
pub fn colorize(days: &WeeklySchedule, options: &ParseOptions) -> HighlightMap {
    let mut highlights = HighlightMap::new();
    let mut teacher_colors = PaletteCursor::new(&TEACHER_PALETTE);
    let mut classroom_colors = PaletteCursor::new(&CLASSROOM_PALETTE);

    for (&day, schedule) in days {
        for column in 1..schedule.max_cols() {
            let tally = tally_slot(schedule, column, options);
            let key = SlotKey::new(day, column);

            for (teacher, _) in tally.teachers.conflicts() {
                highlights.insert_teacher(key, teacher.clone(), teacher_colors.next_color());
            }
            for (classroom, _) in tally.classrooms.conflicts() {
                highlights.insert_classroom(key, classroom.clone(), classroom_colors.next_color());
            }
        }
    }

    debug!(
        teachers = teacher_colors.next,
        classrooms = classroom_colors.next,
        "assigned conflict colors"
    );
    highlights
}
