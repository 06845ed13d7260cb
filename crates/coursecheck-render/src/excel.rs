//! Excel report renderer
//!
//! Generates an annotated XLSX workbook from a check report:
//! - One sheet per weekday: the class rows with conflict fills and borders
//! - 冲突: every conflict record with its category, day and location
//! - 图例: the highlight legend
//!
//! ## Example Output Structure
//!
//! ```text
//! Sheet: 星期一
//! | 班级 | 第1节          | 第2节          | 第3节 |
//! |------|----------------|----------------|-------|
//! | 701  | 数 王老师 201  | 语 张老师 101  | 体育  |
//! | 702  | 数 王老师 201  | 英 李老师 102  | 体育  |
//!
//! Sheet: 冲突
//! | 类别     | 星期   | 位置  | 对象   | 次数 | 问题描述 |
//! |----------|--------|-------|--------|------|----------|
//! | 老师冲突 | 星期一 | 第1节 | 王老师 | 2    | ...      |
//! ```
//!
//! Cell fills use the same colors the colorizer assigned, so a workbook and
//! an HTML page rendered from one report always agree.

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use coursecheck_core::{
    CellHighlight, CheckReport, ConflictScope, DayTable, RenderError, Renderer, LEGEND,
};

use crate::SUCCESS_MESSAGE;

const CONFLICT_SHEET: &str = "冲突";
const LEGEND_SHEET: &str = "图例";
const CONFLICT_HEADERS: [&str; 6] = ["类别", "星期", "位置", "对象", "次数", "问题描述"];

/// Excel report renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Width of the slot columns in day sheets
    pub slot_width: f64,
    /// Whether to include the conflict list sheet
    pub include_conflicts: bool,
    /// Whether to include the legend sheet
    pub include_legend: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            slot_width: 18.0,
            include_conflicts: true,
            include_legend: true,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set slot column width
    pub fn slot_width(mut self, width: f64) -> Self {
        self.slot_width = width;
        self
    }

    /// Disable the conflict list sheet
    pub fn no_conflicts(mut self) -> Self {
        self.include_conflicts = false;
        self
    }

    /// Disable the legend sheet
    pub fn no_legend(mut self) -> Self {
        self.include_legend = false;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, report: &CheckReport) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = self.create_formats();

        for table in &report.tables {
            self.add_day_sheet(&mut workbook, table, &formats)?;
        }

        if self.include_conflicts {
            self.add_conflict_sheet(&mut workbook, report, &formats)?;
        }

        if self.include_legend {
            self.add_legend_sheet(&mut workbook, &formats)?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;

        Ok(buffer)
    }

    /// Create reusable formats
    fn create_formats(&self) -> ExcelFormats {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let class_name = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        let text = Format::new()
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        let message = Format::new().set_text_wrap().set_border(FormatBorder::Thin);

        let integer = Format::new()
            .set_num_format("#,##0")
            .set_border(FormatBorder::Thin);

        ExcelFormats {
            header,
            class_name,
            text,
            message,
            integer,
        }
    }

    /// Add one weekday sheet
    fn add_day_sheet(
        &self,
        workbook: &mut Workbook,
        table: &DayTable,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(table.day.label())
            .map_err(|e| RenderError::Format(e.to_string()))?;

        for (col, header) in table.headers().iter().enumerate() {
            sheet
                .write_with_format(0, col as u16, header, &formats.header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        sheet.set_column_width(0, 10).ok();
        for col in 1..=table.slot_count {
            sheet.set_column_width(col as u16, self.slot_width).ok();
        }

        for (index, row) in table.rows.iter().enumerate() {
            let excel_row = index as u32 + 1;
            sheet
                .write_with_format(excel_row, 0, &row.class_name, &formats.class_name)
                .map_err(|e| RenderError::Format(e.to_string()))?;

            for (slot, cell) in row.cells.iter().enumerate() {
                let format = highlight_format(&formats.text, &cell.highlight)?;
                sheet
                    .write_with_format(excel_row, slot as u16 + 1, &cell.text, &format)
                    .map_err(|e| RenderError::Format(e.to_string()))?;
            }
        }

        sheet.set_freeze_panes(1, 1).ok();

        Ok(())
    }

    /// Add conflict list sheet
    fn add_conflict_sheet(
        &self,
        workbook: &mut Workbook,
        report: &CheckReport,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(CONFLICT_SHEET)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        write_headers(sheet, &CONFLICT_HEADERS, formats)?;

        sheet.set_column_width(0, 12).ok(); // Category
        sheet.set_column_width(1, 10).ok(); // Day
        sheet.set_column_width(2, 12).ok(); // Location
        sheet.set_column_width(3, 14).ok(); // Subject/teacher/classroom
        sheet.set_column_width(4, 6).ok(); // Count
        sheet.set_column_width(5, 60).ok(); // Message

        if report.conflicts.is_empty() {
            sheet
                .write_with_format(1, 0, SUCCESS_MESSAGE, &formats.message)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            return Ok(());
        }

        let mut row = 1u32;
        for group in &report.groups {
            for record in &group.records {
                let location = match &record.scope {
                    ConflictScope::Class(name) => format!("班级{name}"),
                    ConflictScope::Slot(column) => format!("第{column}节"),
                };

                sheet
                    .write_with_format(row, 0, group.category.label(), &formats.text)
                    .map_err(|e| RenderError::Format(e.to_string()))?;
                sheet
                    .write_with_format(row, 1, record.day.label(), &formats.text)
                    .map_err(|e| RenderError::Format(e.to_string()))?;
                sheet
                    .write_with_format(row, 2, &location, &formats.text)
                    .map_err(|e| RenderError::Format(e.to_string()))?;
                sheet
                    .write_with_format(row, 3, &record.key, &formats.text)
                    .map_err(|e| RenderError::Format(e.to_string()))?;
                sheet
                    .write_with_format(row, 4, record.count as f64, &formats.integer)
                    .map_err(|e| RenderError::Format(e.to_string()))?;
                sheet
                    .write_with_format(row, 5, &record.message, &formats.message)
                    .map_err(|e| RenderError::Format(e.to_string()))?;

                row += 1;
            }
        }

        sheet.set_freeze_panes(1, 0).ok();

        Ok(())
    }

    /// Add legend sheet
    fn add_legend_sheet(
        &self,
        workbook: &mut Workbook,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(LEGEND_SHEET)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        write_headers(sheet, &["颜色", "说明"], formats)?;
        sheet.set_column_width(0, 8).ok();
        sheet.set_column_width(1, 20).ok();

        for (index, entry) in LEGEND.iter().enumerate() {
            let row = index as u32 + 1;
            let mut swatch = formats
                .text
                .clone()
                .set_background_color(hex_color(entry.background)?);
            if let Some(border) = entry.border {
                swatch = swatch
                    .set_border(FormatBorder::Medium)
                    .set_border_color(hex_color(border)?);
            }

            sheet
                .write_with_format(row, 0, "", &swatch)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            sheet
                .write_with_format(row, 1, entry.label, &formats.message)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        Ok(())
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, report: &CheckReport) -> Result<Vec<u8>, RenderError> {
        if report.tables.is_empty() {
            return Err(RenderError::InvalidData("No schedule days to render".into()));
        }
        self.render_to_bytes(report)
    }
}

/// Collection of reusable Excel formats
struct ExcelFormats {
    header: Format,
    class_name: Format,
    text: Format,
    message: Format,
    integer: Format,
}

fn write_headers(
    sheet: &mut Worksheet,
    headers: &[&str],
    formats: &ExcelFormats,
) -> Result<(), RenderError> {
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_with_format(0, col as u16, *header, &formats.header)
            .map_err(|e| RenderError::Format(e.to_string()))?;
    }
    Ok(())
}

/// Slot cell format: the base format plus the highlight fill and border
fn highlight_format(base: &Format, highlight: &CellHighlight) -> Result<Format, RenderError> {
    let Some(background) = highlight.background() else {
        return Ok(base.clone());
    };

    let mut format = base.clone().set_background_color(hex_color(background)?);
    if let Some(border) = highlight.border() {
        format = format
            .set_border(FormatBorder::Medium)
            .set_border_color(hex_color(border)?);
    }
    Ok(format)
}

/// Parse a `#rrggbb` color into the RGB integer rust_xlsxwriter expects
fn hex_color(color: &str) -> Result<u32, RenderError> {
    let digits = color.strip_prefix('#').unwrap_or(color);
    if digits.len() != 6 {
        return Err(RenderError::InvalidData(format!("Invalid color: {color}")));
    }
    u32::from_str_radix(digits, 16)
        .map_err(|_| RenderError::InvalidData(format!("Invalid color: {color}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursecheck_core::{
        Category, ConflictGroup, ConflictRecord, DisplayCell, DisplayRow, Weekday,
    };

    fn create_test_report() -> CheckReport {
        let teacher = ConflictRecord::teacher_conflict(Weekday::Monday, 1, "王老师", 2);
        let subject = ConflictRecord::subject_duplicate(Weekday::Monday, "701", '语', 2);
        let conflict_cell = DisplayCell {
            text: "数 王老师 201".into(),
            highlight: CellHighlight::TeacherConflict {
                color: "#ffcdd2".into(),
            },
        };

        CheckReport {
            conflicts: vec![subject.clone(), teacher.clone()],
            groups: vec![
                ConflictGroup {
                    category: Category::SubjectDuplicate,
                    records: vec![subject],
                },
                ConflictGroup {
                    category: Category::TeacherConflict,
                    records: vec![teacher],
                },
            ],
            tables: vec![DayTable {
                day: Weekday::Monday,
                slot_count: 2,
                rows: vec![
                    DisplayRow {
                        class_name: "701".into(),
                        cells: vec![
                            conflict_cell.clone(),
                            DisplayCell {
                                text: "体育".into(),
                                highlight: CellHighlight::ArtSports,
                            },
                        ],
                    },
                    DisplayRow {
                        class_name: "702".into(),
                        cells: vec![
                            conflict_cell,
                            DisplayCell {
                                text: String::new(),
                                highlight: CellHighlight::None,
                            },
                        ],
                    },
                ],
            }],
            ..CheckReport::default()
        }
    }

    #[test]
    fn excel_renderer_creation() {
        let renderer = ExcelRenderer::new();
        assert!(renderer.include_conflicts);
        assert!(renderer.include_legend);
        assert_eq!(renderer.slot_width, 18.0);
    }

    #[test]
    fn excel_renderer_builder() {
        let renderer = ExcelRenderer::new().slot_width(24.0).no_conflicts().no_legend();
        assert_eq!(renderer.slot_width, 24.0);
        assert!(!renderer.include_conflicts);
        assert!(!renderer.include_legend);
    }

    #[test]
    fn excel_render_produces_xlsx() {
        let xlsx = ExcelRenderer::new().render(&create_test_report()).unwrap();
        assert!(xlsx.len() > 100);
        assert_eq!(&xlsx[0..2], b"PK");
    }

    #[test]
    fn excel_render_day_sheets_only() {
        let xlsx = ExcelRenderer::new()
            .no_conflicts()
            .no_legend()
            .render(&create_test_report())
            .unwrap();
        assert_eq!(&xlsx[0..2], b"PK");
    }

    #[test]
    fn excel_render_without_days_fails() {
        let result = ExcelRenderer::new().render(&CheckReport::default());
        assert!(matches!(result, Err(RenderError::InvalidData(_))));
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(hex_color("#ffcdd2").unwrap(), 0xFFCDD2);
        assert_eq!(hex_color("d32f2f").unwrap(), 0xD32F2F);
        assert!(hex_color("#fff").is_err());
        assert!(hex_color("#zzzzzz").is_err());
    }

    #[test]
    fn plain_cells_keep_base_format() {
        let base = Format::new().set_border(FormatBorder::Thin);
        let format = highlight_format(&base, &CellHighlight::None).unwrap();
        assert_eq!(format, base);
    }

    #[test]
    fn conflict_cells_get_fill_and_border() {
        let base = Format::new().set_border(FormatBorder::Thin);
        let format = highlight_format(
            &base,
            &CellHighlight::ClassroomConflict {
                color: "#ffe0b2".into(),
            },
        )
        .unwrap();
        let expected = base
            .clone()
            .set_background_color(0xFFE0B2)
            .set_border(FormatBorder::Medium)
            .set_border_color(0xF57C00);
        assert_eq!(format, expected);
    }
}
