//! PRISK risk scoring CLI
//!
//! Scores seven pressure/temperature features against the trained model
//! installed next to this binary and prints the risk score.

mod output;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use output::OutputFormat;
use prisk_lib::observability::{init_tracing, LogConfig};
use prisk_lib::{report, PredictError, RunConfig};
use std::process::ExitCode;

/// Pressure line risk scoring
#[derive(Parser)]
#[command(name = "predict-risk")]
#[command(
    author,
    version,
    about = "Score pressure line sensor features with the PRISK risk model",
    long_about = None
)]
pub struct Cli {
    /// Feature values in order: P T Vit_P Vit_T Instab_P Ratio_PT Corr_PT
    #[arg(value_name = "FEATURE", num_args = 0.., allow_negative_numbers = true)]
    pub features: Vec<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Check the model's declared inputs against the feature schema
    #[arg(long)]
    pub strict_schema: bool,

    /// Expected SHA256 of the model artifact (hex)
    #[arg(long, value_name = "HEX")]
    pub expected_sha256: Option<String>,

    /// Log to stderr (-v info, -vv debug, -vvv trace)
    #[arg(long, short, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            strict_schema: self.strict_schema,
            expected_sha256: self.expected_sha256.clone(),
            ..Default::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => return report::report(&PredictError::InvalidOption(clap_message(&e))),
    };

    init_tracing(LogConfig {
        verbosity: cli.verbose,
        json: cli.log_json,
    });

    let score_report = match prisk_lib::score(&cli.run_config(), &cli.features) {
        Ok(score_report) => score_report,
        Err(e) => return report::report(&e),
    };

    match output::print_report(&score_report, cli.format) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report::report(&format!("{:#}", e)),
    }
}

/// First line of a clap error, without its `error:` prefix
fn clap_message(err: &clap::Error) -> String {
    let message = err.to_string();
    let first = message.lines().next().unwrap_or_default();
    first.trim_start_matches("error: ").to_string()
}
