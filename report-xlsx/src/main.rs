//! report-xlsx: turn contact report CSV exports into Excel workbooks
//!
//! Reads the export (resolving its character encoding), splits the
//! questionnaire column into five columns and saves a single-sheet `.xlsx`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::*;

use report_xlsx::config::{ReportConfig, ReportConfigBuilder};
use report_xlsx::error::ReportError;
use report_xlsx::pipeline::{ConversionSummary, convert};

const RULE_WIDTH: usize = 60;

#[derive(Parser, Debug)]
#[command(name = "report-xlsx", version, about = "Convert a contact report CSV to Excel")]
struct Cli {
    /// CSV file to convert [default: Reporte_Contactos_2025_10_30_1215.csv]
    input: Option<PathBuf>,

    /// Excel file to write [default: <input stem>.xlsx]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file [default: <config dir>/report-xlsx/config.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Column holding the questionnaire text
    #[arg(long = "column", value_name = "NAME")]
    source_column: Option<String>,

    /// Worksheet name
    #[arg(long = "sheet", value_name = "NAME")]
    sheet_name: Option<String>,

    /// Encoding to try, in order (repeatable)
    #[arg(short, long = "encoding", value_name = "LABEL")]
    encodings: Vec<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Layer command-line flags over the loaded configuration
    fn into_config(self, base: ReportConfig) -> ReportConfig {
        let mut builder = ReportConfigBuilder::from_config(base);

        if let Some(input) = self.input {
            builder = builder.input(input);
        }
        if let Some(output) = self.output {
            builder = builder.output(output);
        }
        if let Some(column) = self.source_column {
            builder = builder.source_column(column);
        }
        if let Some(sheet) = self.sheet_name {
            builder = builder.sheet_name(sheet);
        }
        if !self.encodings.is_empty() {
            builder = builder.encodings(self.encodings);
        }

        builder.build()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    print_rule();
    println!("{}", "CSV TO EXCEL CONVERTER".bold());
    print_rule();

    let base = match ReportConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            report_error(&ReportError::Processing(e));
            return ExitCode::FAILURE;
        }
    };
    let config = cli.into_config(base);

    println!("Reading CSV file: {}", config.input.display().to_string().cyan());

    match convert(&config) {
        Ok(summary) => {
            print_summary(&summary, &config);
            println!();
            print_rule();
            println!("{}", "DONE".bold());
            print_rule();
            ExitCode::SUCCESS
        }
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn print_summary(summary: &ConversionSummary, config: &ReportConfig) {
    let ok = "✓".green();

    println!("{} Encoding detected: {}", ok, summary.encoding.label().bright_green());
    println!(
        "{} CSV read: {} rows, {} columns",
        ok,
        summary.row_count,
        summary.source_columns.len()
    );
    println!("Columns found: {}", summary.source_columns.join(", ").dimmed());

    println!();
    println!("Splitting column '{}'...", config.source_column);
    if summary.decomposed() {
        println!("{} Split into {} columns:", ok, summary.added_columns.len());
        for name in &summary.added_columns {
            println!("  - {}", name);
        }
    } else {
        println!(
            "{} Column '{}' not found, no columns added",
            "⚠".yellow(),
            config.source_column
        );
    }

    println!();
    println!("{} Excel file saved: {}", ok, summary.output.display().to_string().cyan());
    println!("{} Rows written: {}", ok, summary.row_count);
    println!("{} Columns written: {}", ok, summary.column_count);
}

fn report_error(err: &ReportError) {
    eprintln!("{} {}: {}", "✗".red(), err.kind().red().bold(), err);

    if let ReportError::Processing(inner) = err {
        for cause in inner.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
        }
    }
}

fn print_rule() {
    println!("{}", "=".repeat(RULE_WIDTH));
}
