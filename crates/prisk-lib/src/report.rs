//! Failure reporting for the binary
//!
//! Whatever stage failed, the caller sees one `ERROR:` line on stderr and
//! exit status 1.

use std::fmt::Display;
use std::io::Write;
use std::process::ExitCode;

/// Exit status shared by every failure kind
pub const FAILURE_STATUS: u8 = 1;

/// Render a failure as a single `ERROR:` line, without the newline
pub fn render(err: &dyn Display) -> String {
    let message = err.to_string();
    let flattened: Vec<&str> = message.split_whitespace().collect();
    format!("ERROR: {}", flattened.join(" "))
}

/// Write the failure line to stderr and produce the failure exit code
pub fn report(err: &dyn Display) -> ExitCode {
    let line = render(err);
    // Nothing left to report to if stderr itself is gone
    let _ = writeln!(std::io::stderr().lock(), "{}", line);
    ExitCode::from(FAILURE_STATUS)
}
