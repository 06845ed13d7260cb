//! Integration tests for Excel rendering

use coursecheck_checker::ScheduleChecker;
use coursecheck_core::{text_row, CheckReport, RawGrid, Renderer};
use coursecheck_render::ExcelRenderer;

/// Two days of a grade-seven timetable with one teacher and one classroom clash
fn create_week() -> RawGrid {
    vec![
        text_row(&["七年级课程表"]),
        text_row(&["", "星期一"]),
        text_row(&["班级", "第1节", "第2节", "第3节", "第4节"]),
        text_row(&["701", "数 王老师 201", "语 张老师 101", "体育", "英 李老师 102"]),
        text_row(&["702", "数 王老师 202", "英 刘老师 101", "体育", "艺术1组 两个班级"]),
        text_row(&["703", "物 赵老师 实验室", "化 孙老师 实验室", "生 周老师"]),
        text_row(&["", "星期二"]),
        text_row(&["班级", "第1节", "第2节"]),
        text_row(&["701", "语 张老师 101", "语 张老师 101"]),
        text_row(&["702", "数 王老师 201", "地 吴老师 103"]),
    ]
}

fn check(grid: &RawGrid) -> CheckReport {
    ScheduleChecker::new().check(grid).unwrap()
}

#[test]
fn render_week_to_excel() {
    let report = check(&create_week());
    assert!(!report.is_clean());

    let xlsx = ExcelRenderer::new().render(&report).unwrap();

    // Verify it's a valid XLSX file (starts with PK zip signature)
    assert!(xlsx.len() > 100);
    assert_eq!(&xlsx[0..2], b"PK");

    // Write to file for inspection (uncomment for local testing)
    // std::fs::write("/tmp/coursecheck_week.xlsx", &xlsx).unwrap();
}

#[test]
fn render_clean_week_to_excel() {
    let grid = vec![
        text_row(&["", "星期三"]),
        text_row(&["班级", "第1节"]),
        text_row(&["701", "数 王老师 201"]),
        text_row(&["702", "语 张老师 101"]),
    ];
    let report = check(&grid);
    assert!(report.is_clean());

    let xlsx = ExcelRenderer::new().render(&report).unwrap();
    assert!(xlsx.len() > 100);
}

#[test]
fn render_excel_without_extra_sheets() {
    let report = check(&create_week());
    let xlsx = ExcelRenderer::new()
        .no_conflicts()
        .no_legend()
        .slot_width(12.0)
        .render(&report)
        .unwrap();
    assert!(xlsx.len() > 100);
}

#[test]
fn render_excel_without_day_rows_fails() {
    let grid = vec![text_row(&["", "星期五"]), text_row(&["班级", "第1节"])];
    let report = check(&grid);
    assert!(ExcelRenderer::new().render(&report).is_err());
}
