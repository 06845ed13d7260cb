//! HTML report renderer
//!
//! Generates a standalone HTML page with:
//! - The success or problem banner
//! - Problems grouped by category
//! - Per-day detail tables with conflict highlighting
//! - A legend for the three highlight styles

use std::fmt::Write;

use coursecheck_core::{
    CellHighlight, CheckReport, DayTable, LegendEntry, RenderError, Renderer, LEGEND,
};

use crate::{problem_banner, DETAILS_TITLE, SUCCESS_MESSAGE, SUCCESS_TITLE};

const LEGEND_TITLE: &str = "图例说明：";

/// Border drawn around legend swatches that carry no conflict border
const PLAIN_SWATCH_BORDER: &str = "1px solid #ccc";

const CSS: &str = r"        body { font-family: system-ui, -apple-system, sans-serif; margin: 24px; color: #2c3e50; }
        .success { background: #e8f5e9; border-left: 4px solid #43a047; padding: 8px 16px; }
        .warning { background: #fff8e1; border-left: 4px solid #ffa000; padding: 8px 16px; }
        .error { background: #ffebee; border-left: 4px solid #e53935; padding: 8px 16px; margin-top: 12px; }
        table { border-collapse: collapse; margin-bottom: 16px; }
        th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: center; }
        th { background: #f5f5f5; }
        .legend { display: flex; flex-wrap: wrap; gap: 15px; }
        .legend-item { display: flex; align-items: center; }
        .legend-box { width: 20px; height: 20px; margin-right: 5px; }";

/// HTML report renderer configuration
#[derive(Clone, Debug)]
pub struct HtmlRenderer {
    /// Page title
    pub title: String,
    /// Render the per-day detail tables
    pub show_tables: bool,
    /// Render the legend below the tables
    pub show_legend: bool,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self {
            title: "排课检查结果".into(),
            show_tables: true,
            show_legend: true,
        }
    }
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Only render the banner and grouped problems
    pub fn summary_only(mut self) -> Self {
        self.show_tables = false;
        self.show_legend = false;
        self
    }

    fn render_results(&self, report: &CheckReport) -> String {
        let mut html = String::new();

        if report.is_clean() {
            let _ = write!(
                html,
                "    <div class=\"success\">\n        <h3>{SUCCESS_TITLE}</h3>\n        <p>{SUCCESS_MESSAGE}</p>\n    </div>\n"
            );
            return html;
        }

        let _ = write!(
            html,
            "    <div class=\"warning\">\n        <h3>{}</h3>\n    </div>\n",
            problem_banner(report.problem_count())
        );

        for group in &report.groups {
            let _ = write!(
                html,
                "    <div class=\"error\">\n        <h4>【{}】({}个问题):</h4>\n        <ul>\n",
                group.category,
                group.records.len()
            );
            for (index, record) in group.records.iter().enumerate() {
                let _ = writeln!(
                    html,
                    "            <li><strong>问题 {}:</strong> {}</li>",
                    index + 1,
                    html_escape(&record.message)
                );
            }
            html.push_str("        </ul>\n    </div>\n");
        }

        html
    }

    fn render_table(&self, table: &DayTable) -> String {
        let mut html = String::new();
        let _ = writeln!(html, "    <h4>{}</h4>", table.day);
        html.push_str("    <table>\n        <thead><tr>");
        for header in table.headers() {
            let _ = write!(html, "<th>{}</th>", html_escape(&header));
        }
        html.push_str("</tr></thead>\n        <tbody>\n");

        for row in &table.rows {
            let _ = write!(
                html,
                "            <tr><td><strong>{}</strong></td>",
                html_escape(&row.class_name)
            );
            for cell in &row.cells {
                match cell_style(&cell.highlight) {
                    Some(style) => {
                        let _ = write!(
                            html,
                            "<td style=\"{style}\">{}</td>",
                            html_escape(&cell.text)
                        );
                    }
                    None => {
                        let _ = write!(html, "<td>{}</td>", html_escape(&cell.text));
                    }
                }
            }
            html.push_str("</tr>\n");
        }

        html.push_str("        </tbody>\n    </table>\n");
        html
    }

    fn render_legend(&self) -> String {
        let mut html = String::new();
        let _ = writeln!(html, "    <div style=\"margin-top: 20px;\">");
        let _ = writeln!(html, "        <h4>{LEGEND_TITLE}</h4>");
        html.push_str("        <div class=\"legend\">\n");
        for entry in &LEGEND {
            let _ = writeln!(
                html,
                "            <div class=\"legend-item\"><div class=\"legend-box\" style=\"{}\"></div><span>{}</span></div>",
                swatch_style(entry),
                entry.label
            );
        }
        html.push_str("        </div>\n    </div>\n");
        html
    }
}

impl Renderer for HtmlRenderer {
    type Output = String;

    fn render(&self, report: &CheckReport) -> Result<String, RenderError> {
        let mut body = self.render_results(report);

        if self.show_tables && !report.tables.is_empty() {
            let _ = writeln!(body, "    <h3>{DETAILS_TITLE}</h3>");
            for table in &report.tables {
                body.push_str(&self.render_table(table));
            }
            if self.show_legend {
                body.push_str(&self.render_legend());
            }
        }

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
    <h1>{title}</h1>
{body}</body>
</html>
"#,
            title = html_escape(&self.title),
            css = CSS,
            body = body,
        ))
    }
}

/// Inline style for a highlighted cell, `None` for plain cells
fn cell_style(highlight: &CellHighlight) -> Option<String> {
    let background = highlight.background()?;
    Some(match highlight.border() {
        Some(border) => format!("background-color: {background}; border: 2px solid {border};"),
        None => format!("background-color: {background};"),
    })
}

fn swatch_style(entry: &LegendEntry) -> String {
    let border = entry
        .border
        .map_or_else(|| PLAIN_SWATCH_BORDER.to_string(), |color| format!("2px solid {color}"));
    format!("background-color: {}; border: {border};", entry.background)
}

/// HTML-escape a string
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
