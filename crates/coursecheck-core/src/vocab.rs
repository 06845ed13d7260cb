//! Fixed vocabulary of the schedule sheets.
//!
//! Matching is by substring against these labels; the sheets carry no
//! stricter structure.

/// Present in the second cell of every day-marker row
pub const WEEKDAY_TOKEN: &str = "星期";

pub const SPORTS_KEYWORD: &str = "体育";
pub const ART_KEYWORD: &str = "艺术";

pub const SPORTS_SUBJECT: char = '体';
pub const ART_SUBJECT: char = '艺';

pub const SPORTS_TEACHER: &str = "体育老师";
pub const ART_TEACHER: &str = "艺术老师";

/// Header rows whose first cell contains either label are not classes
pub const GRADE_LABEL: &str = "年级";
pub const CLASS_LABEL: &str = "班";

/// First column header of display tables
pub const CLASS_HEADER: &str = "班级";

/// Chinese class-count numerals resolved by default
pub const BASIC_NUMERALS: [(&str, u64); 4] = [("两", 2), ("三", 3), ("四", 4), ("五", 5)];

/// Numerals accepted by the class-count pattern but only resolved when the
/// full numeral table is enabled
pub const EXTENDED_NUMERALS: [(&str, u64); 5] =
    [("六", 6), ("七", 7), ("八", 8), ("九", 9), ("十", 10)];
