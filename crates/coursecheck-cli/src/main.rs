//! coursecheck CLI - Weekly class-schedule conflict checker
//!
//! Command-line interface for checking timetable files and exporting
//! annotated reports.

mod config;
mod diagnostics;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use coursecheck_checker::{CheckOptions, ScheduleChecker};
use coursecheck_core::{CheckError, CheckReport, Renderer};
use coursecheck_parser::ParseOptions;
use coursecheck_render::{ExcelRenderer, HtmlRenderer};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::{Config, OutputFormat};
use diagnostics::{EmitterConfig, ExitCode, JsonEmitter, ReportEmitter, TerminalEmitter};

#[derive(Parser)]
#[command(name = "coursecheck")]
#[command(author, version, about = "Weekly class-schedule conflict checker", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: coursecheck.toml in the working directory)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a timetable for conflicts
    Check {
        /// Timetable file (.xlsx, .xls, .ods or .csv)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Print nothing for a clean timetable, only the problems otherwise
        #[arg(short, long)]
        quiet: bool,

        /// Print the per-day tables after the problems (text output)
        #[arg(long)]
        details: bool,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Export an annotated report
    Export {
        /// Timetable file (.xlsx, .xls, .ods or .csv)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (.html or .xlsx)
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },
}

/// Flags shared by every command that runs a check
#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Run the conflict scans on the calling thread
    #[arg(long)]
    sequential: bool,

    /// Resolve 六..十 class counts in art cells
    #[arg(long)]
    full_numerals: bool,
}

impl RunArgs {
    /// Merge flags over the config file; flags only ever switch behavior on
    fn check_options(&self, config: &Config) -> CheckOptions {
        CheckOptions {
            parallel: config.check.parallel && !self.sequential,
            parse: ParseOptions {
                full_numeral_table: config.parser.full_numeral_table || self.full_numerals,
            },
        }
    }
}

/// Export target, picked from the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Html,
    Xlsx,
}

impl ExportFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(ExportFormat::Html),
            "xlsx" => Some(ExportFormat::Xlsx),
            _ => None,
        }
    }
}

fn main() -> process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code.into(),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::Failure.into()
        }
    }
}

/// Install the fmt subscriber on stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    let config = Config::load(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Some(Commands::Check {
            file,
            format,
            quiet,
            details,
            run,
        }) => {
            let mut emitter_config = EmitterConfig {
                quiet: quiet || config.output.quiet,
                details: false,
            };
            if details {
                emitter_config = emitter_config.with_details();
            }
            let format = format.unwrap_or(config.output.format);
            Ok(cmd_check(&file, format, emitter_config, run.check_options(&config)))
        }
        Some(Commands::Export { file, output, run }) => {
            cmd_export(&file, &output, run.check_options(&config))
        }
        None => {
            println!("coursecheck - Weekly class-schedule conflict checker");
            println!("Run with --help for usage information");
            Ok(ExitCode::Success)
        }
    }
}

fn cmd_check(
    file: &Path,
    format: OutputFormat,
    emitter_config: EmitterConfig,
    options: CheckOptions,
) -> ExitCode {
    info!(file = %file.display(), ?options, "checking timetable");
    let result = ScheduleChecker { options }.check_file(file);

    match format {
        OutputFormat::Text => {
            let mut emitter = TerminalEmitter::new(io::stdout().lock(), io::stderr(), emitter_config);
            emit(&mut emitter, &result);
            emitter.exit_code()
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(emitter_config);
            emit(&mut emitter, &result);
            println!("{}", emitter.to_json_string());
            emitter.exit_code()
        }
    }
}

fn emit(emitter: &mut impl ReportEmitter, result: &Result<CheckReport, CheckError>) {
    match result {
        Ok(report) => emitter.emit_report(report),
        Err(err) => emitter.emit_error(err),
    }
}

fn cmd_export(file: &Path, output: &Path, options: CheckOptions) -> anyhow::Result<ExitCode> {
    let format = ExportFormat::from_path(output).with_context(|| {
        format!(
            "unsupported export format: {} (expected .html or .xlsx)",
            output.display()
        )
    })?;

    let report = ScheduleChecker { options }.check_file(file)?;

    let bytes = match format {
        ExportFormat::Html => {
            let title = file
                .file_stem()
                .map(|stem| format!("{} 排课检查结果", stem.to_string_lossy()))
                .unwrap_or_else(|| "排课检查结果".into());
            HtmlRenderer::new().title(title).render(&report)?.into_bytes()
        }
        ExportFormat::Xlsx => ExcelRenderer::new().render(&report)?,
    };

    fs::write(output, bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(output = %output.display(), problems = report.problem_count(), "report exported");
    eprintln!(
        "已导出: {} ({} 个问题)",
        output.display(),
        report.problem_count()
    );

    Ok(ExitCode::Success)
}
