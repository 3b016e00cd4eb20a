//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use prisk_lib::ScoreReport;
use std::io::Write;

/// Output format for the score
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Bare score with six decimals (default)
    #[default]
    Plain,
    /// JSON object with score, risk level and dispatch details
    Json,
}

/// Render a report in the requested format, without a trailing newline
pub fn render(report: &ScoreReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(report.formatted.clone()),
        OutputFormat::Json => serde_json::to_string(report).context("Failed to serialize report"),
    }
}

/// Write the rendered report to stdout
pub fn print_report(report: &ScoreReport, format: OutputFormat) -> Result<()> {
    let rendered = render(report, format)?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|_| stdout.flush())
        .context("Failed to write score to stdout")
}
