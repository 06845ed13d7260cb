//! Report formatting for CLI output
//!
//! This module implements report emitters for different output formats:
//! - `TerminalEmitter`: grouped text report with a per-day summary
//! - `JsonEmitter`: machine-readable JSON output
//!
//! With `--quiet` the terminal prints nothing for a clean run and only the
//! grouped problems otherwise; JSON output drops highlights and stats.
//!
//! ## Exit Code Semantics
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success: no conflicts found |
//! | 1 | Failure: conflicts found, or the file could not be checked |
//!
//! - **`--quiet` mode**: Does NOT affect exit code, only output visibility
//! - **`--format=json`**: Exit code semantics identical to text mode

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::process;

use coursecheck_core::{
    CheckError, CheckReport, ConflictGroup, ConflictRecord, DayStats, HighlightMap, Renderer,
    Weekday,
};
use coursecheck_render::TextRenderer;
use serde::Serialize;

// ============================================================================
// Exit Code
// ============================================================================

/// Exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: no conflicts found
    Success = 0,
    /// Failure: conflicts found or the check did not run
    Failure = 1,
}

impl ExitCode {
    /// Determine exit code from the number of reported problems
    pub fn from_problem_count(count: usize) -> Self {
        if count > 0 {
            ExitCode::Failure
        } else {
            ExitCode::Success
        }
    }

    /// Check if this represents success
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Get the numeric value
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

// ============================================================================
// Emitter Config
// ============================================================================

/// Configuration for report output
#[derive(Debug, Clone, Default)]
pub struct EmitterConfig {
    /// Print nothing for a clean run, only the problems otherwise
    pub quiet: bool,
    /// Append per-day detail tables (text output)
    pub details: bool,
}

impl EmitterConfig {
    /// Create a new config with quiet mode enabled
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Default::default()
        }
    }

    /// Enable detail tables
    pub fn with_details(mut self) -> Self {
        self.details = true;
        self
    }
}

/// Sink for the outcome of one check run
pub trait ReportEmitter {
    /// Emit a finished report
    fn emit_report(&mut self, report: &CheckReport);

    /// Emit a failure that stopped the check
    fn emit_error(&mut self, error: &CheckError);

    /// Exit code for everything emitted so far
    fn exit_code(&self) -> ExitCode;
}

// ============================================================================
// Terminal
// ============================================================================

/// Terminal emitter: report on `writer`, failures on `errors`
pub struct TerminalEmitter<W: Write, E: Write> {
    writer: W,
    errors: E,
    config: EmitterConfig,
    problem_count: usize,
    failed: bool,
}

impl<W: Write, E: Write> TerminalEmitter<W, E> {
    pub fn new(writer: W, errors: E, config: EmitterConfig) -> Self {
        Self {
            writer,
            errors,
            config,
            problem_count: 0,
            failed: false,
        }
    }

    /// Get the number of problems reported
    pub fn problem_count(&self) -> usize {
        self.problem_count
    }

    fn write_report(&mut self, report: &CheckReport) -> io::Result<()> {
        if self.config.quiet && report.is_clean() {
            return Ok(());
        }

        let renderer = if self.config.details && !self.config.quiet {
            TextRenderer::new().with_details()
        } else {
            TextRenderer::new()
        };
        let text = renderer
            .render(report)
            .map_err(|e| io::Error::other(e.to_string()))?;
        write!(self.writer, "{text}")?;

        if !self.config.quiet && !report.stats.is_empty() {
            writeln!(self.writer)?;
            for (day, stats) in &report.stats {
                writeln!(
                    self.writer,
                    "{}: {} 个班级, {} 节课",
                    day, stats.rows, stats.slots
                )?;
            }
        }

        Ok(())
    }
}

impl<W: Write, E: Write> ReportEmitter for TerminalEmitter<W, E> {
    fn emit_report(&mut self, report: &CheckReport) {
        self.problem_count += report.problem_count();
        // Ignore write errors (stdout may be closed)
        let _ = self.write_report(report);
    }

    fn emit_error(&mut self, error: &CheckError) {
        self.failed = true;
        let _ = writeln!(self.errors, "error: {error}");
    }

    fn exit_code(&self) -> ExitCode {
        if self.failed {
            ExitCode::Failure
        } else {
            ExitCode::from_problem_count(self.problem_count)
        }
    }
}

// ============================================================================
// JSON
// ============================================================================

/// JSON emitter that collects the run outcome in machine-readable form
pub struct JsonEmitter {
    output: Option<JsonReport>,
    config: EmitterConfig,
}

/// JSON representation of a check run
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub status: &'static str,
    pub problem_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<ConflictRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<ConflictGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<HighlightMap>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub stats: BTreeMap<Weekday, DayStats>,
}

impl JsonEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            output: None,
            config,
        }
    }

    /// Get the collected report
    pub fn report(&self) -> Option<&JsonReport> {
        self.output.as_ref()
    }

    /// Convert to a JSON value
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(&self.output).unwrap_or(serde_json::Value::Null)
    }

    /// Pretty-printed JSON document
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.to_json_value()).unwrap_or_default()
    }
}

impl ReportEmitter for JsonEmitter {
    fn emit_report(&mut self, report: &CheckReport) {
        // Quiet drops highlights and stats
        let (highlights, stats) = if self.config.quiet {
            (None, BTreeMap::new())
        } else {
            (Some(report.highlights.clone()), report.stats.clone())
        };

        self.output = Some(JsonReport {
            status: if report.is_clean() { "clean" } else { "conflicts" },
            problem_count: report.problem_count(),
            error: None,
            conflicts: report.conflicts.clone(),
            groups: report.groups.clone(),
            highlights,
            stats,
        });
    }

    fn emit_error(&mut self, error: &CheckError) {
        self.output = Some(JsonReport {
            status: "error",
            problem_count: 0,
            error: Some(error.to_string()),
            conflicts: Vec::new(),
            groups: Vec::new(),
            highlights: None,
            stats: BTreeMap::new(),
        });
    }

    fn exit_code(&self) -> ExitCode {
        match &self.output {
            Some(report) if report.status == "error" => ExitCode::Failure,
            Some(report) => ExitCode::from_problem_count(report.problem_count),
            None => ExitCode::Success,
        }
    }
}
