//! # coursecheck-render
//!
//! Rendering backends for schedule check reports.
//!
//! This crate provides:
//! - Plain text report output (console)
//! - Standalone HTML pages with highlighted detail tables
//! - Annotated Excel workbooks (one sheet per weekday)
//!
//! ## Example
//!
//! ```rust,ignore
//! use coursecheck_core::Renderer;
//! use coursecheck_render::{ExcelRenderer, HtmlRenderer, TextRenderer};
//!
//! let text = TextRenderer::new().with_details().render(&report)?;
//! let html = HtmlRenderer::new().title("七年级课表").render(&report)?;
//! let xlsx = ExcelRenderer::new().render(&report)?;
//! std::fs::write("课表检查.xlsx", xlsx)?;
//! ```

pub mod excel;
pub mod html;

pub use excel::ExcelRenderer;
pub use html::HtmlRenderer;

use std::fmt::Write;

use coursecheck_core::{CheckReport, DayTable, RenderError, Renderer};

/// Banner for a report without problems
pub const SUCCESS_TITLE: &str = "排课检查完成";
pub const SUCCESS_MESSAGE: &str = "恭喜！没有发现任何冲突或错误。排课结果符合要求。";
pub const DETAILS_TITLE: &str = "排课详情（按星期分组）";

/// Headline shown above the grouped problems
pub fn problem_banner(count: usize) -> String {
    format!("{SUCCESS_TITLE} - 发现 {count} 个问题")
}

/// Plain text renderer for console output
#[derive(Clone, Debug, Default)]
pub struct TextRenderer {
    /// Append the per-day detail tables
    pub details: bool,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include the per-day tables after the grouped problems
    pub fn with_details(mut self) -> Self {
        self.details = true;
        self
    }

    fn write_summary(out: &mut String, report: &CheckReport) {
        if report.is_clean() {
            let _ = writeln!(out, "{SUCCESS_TITLE}");
            let _ = writeln!(out, "{SUCCESS_MESSAGE}");
            return;
        }

        let _ = writeln!(out, "{}", problem_banner(report.problem_count()));
        for group in &report.groups {
            let _ = writeln!(out);
            let _ = writeln!(out, "【{}】({}个问题):", group.category, group.records.len());
            for (index, record) in group.records.iter().enumerate() {
                let _ = writeln!(out, "  问题 {}: {}", index + 1, record.message);
            }
        }
    }

    fn write_table(out: &mut String, table: &DayTable) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", table.day);
        let _ = writeln!(out, "{}", table.headers().join(" | "));
        for row in &table.rows {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|cell| {
                    // Conflicting cells are bracketed so they stand out without color
                    if cell.highlight.is_conflict() {
                        format!("[{}]", cell.text)
                    } else {
                        cell.text.clone()
                    }
                })
                .collect();
            let _ = writeln!(out, "{} | {}", row.class_name, cells.join(" | "));
        }
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, report: &CheckReport) -> Result<String, RenderError> {
        let mut out = String::new();
        Self::write_summary(&mut out, report);

        if self.details && !report.tables.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{DETAILS_TITLE}");
            for table in &report.tables {
                Self::write_table(&mut out, table);
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursecheck_core::{
        Category, CellHighlight, ConflictGroup, ConflictRecord, DisplayCell, DisplayRow, Weekday,
    };
    use pretty_assertions::assert_eq;

    fn report_with_teacher_conflict() -> CheckReport {
        let record = ConflictRecord::teacher_conflict(Weekday::Monday, 1, "王老师", 2);
        CheckReport {
            conflicts: vec![record.clone()],
            groups: vec![ConflictGroup {
                category: Category::TeacherConflict,
                records: vec![record],
            }],
            tables: vec![DayTable {
                day: Weekday::Monday,
                slot_count: 1,
                rows: vec![DisplayRow {
                    class_name: "701".into(),
                    cells: vec![DisplayCell {
                        text: "数 王老师 201".into(),
                        highlight: CellHighlight::TeacherConflict {
                            color: "#ffcdd2".into(),
                        },
                    }],
                }],
            }],
            ..CheckReport::default()
        }
    }

    #[test]
    fn clean_report_shows_success_banner() {
        let text = TextRenderer::new().render(&CheckReport::default()).unwrap();
        assert_eq!(
            text,
            "排课检查完成\n恭喜！没有发现任何冲突或错误。排课结果符合要求。\n"
        );
    }

    #[test]
    fn problems_are_numbered_per_category() {
        let text = TextRenderer::new()
            .render(&report_with_teacher_conflict())
            .unwrap();
        assert!(text.starts_with("排课检查完成 - 发现 1 个问题\n"));
        assert!(text.contains("【老师冲突】(1个问题):"));
        assert!(text.contains("  问题 1: 星期一 - 第1节课：老师\"王老师\"在同一时间段有2节课，应该只有一节课"));
        assert!(!text.contains(DETAILS_TITLE));
    }

    #[test]
    fn details_mark_conflicting_cells() {
        let text = TextRenderer::new()
            .with_details()
            .render(&report_with_teacher_conflict())
            .unwrap();
        assert!(text.contains(DETAILS_TITLE));
        assert!(text.contains("班级 | 第1节"));
        assert!(text.contains("701 | [数 王老师 201]"));
    }

    #[test]
    fn banner_counts_problems() {
        assert_eq!(problem_banner(3), "排课检查完成 - 发现 3 个问题");
    }
}
