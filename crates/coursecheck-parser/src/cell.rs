//! Cell parser
//!
//! Classifies one cell's text as a course. Recognized shapes, in priority
//! order:
//!
//! | Cell text | Result |
//! |-----------|--------|
//! | contains `体育` | sports entry, exempt from conflict scans |
//! | contains `艺术` | art entry with optional group number and class count |
//! | `科目 老师 [教室]` | regular entry |
//! | anything else | `None` |
//!
//! A `None` result means "not a course" and is never an error.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use coursecheck_core::vocab::{
    ART_KEYWORD, BASIC_NUMERALS, EXTENDED_NUMERALS, SPORTS_KEYWORD,
};
use coursecheck_core::{CellValue, CourseEntry};

lazy_static! {
    static ref ART_GROUP: Regex = Regex::new(r"艺术([0-9]+)组").unwrap();
    static ref CLASS_COUNT: Regex =
        Regex::new(r"(两|三|四|五|六|七|八|九|十|[0-9]+)个?班级").unwrap();
}

/// Parser behavior switches
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Resolve `六`..`十` in art class counts. Off by default, in which case
    /// those numerals leave the count at 1.
    pub full_numeral_table: bool,
}

/// Parse one cell with default options
pub fn parse_cell(cell: &CellValue) -> Option<CourseEntry> {
    parse_cell_with(cell, &ParseOptions::default())
}

/// Parse one cell
pub fn parse_cell_with(cell: &CellValue, options: &ParseOptions) -> Option<CourseEntry> {
    let text = cell.as_text()?.trim();
    if text.is_empty() {
        return None;
    }

    if text.contains(SPORTS_KEYWORD) {
        return Some(CourseEntry::sports(text));
    }

    if text.contains(ART_KEYWORD) {
        return Some(parse_art(text, options));
    }

    let parts: Vec<&str> = text.split(' ').collect();
    if parts.len() < 2 {
        return None;
    }

    let subject = parts[0].chars().next()?;
    let classroom = parts.get(2).copied().unwrap_or_default();
    Some(CourseEntry::regular(subject, parts[1], classroom, text))
}

fn parse_art(text: &str, options: &ParseOptions) -> CourseEntry {
    let group = ART_GROUP
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let class_count = CLASS_COUNT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(1, |m| resolve_class_count(m.as_str(), options));

    CourseEntry::art(text, group, class_count)
}

/// Resolve a class-count numeral, falling back to 1 when it is not understood
///
/// Digit runs too long for `u64` saturate.
fn resolve_class_count(numeral: &str, options: &ParseOptions) -> u64 {
    let table = BASIC_NUMERALS.iter().chain(
        EXTENDED_NUMERALS
            .iter()
            .filter(|_| options.full_numeral_table),
    );
    if let Some((_, value)) = table.into_iter().find(|(label, _)| *label == numeral) {
        return *value;
    }

    if !numeral.is_empty() && numeral.bytes().all(|b| b.is_ascii_digit()) {
        return numeral.parse::<u64>().unwrap_or(u64::MAX);
    }

    debug!(numeral, "unresolved class-count numeral, using 1");
    1
}
