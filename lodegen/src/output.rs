//! Output formatting for CLI commands.
//!
//! Provides abstraction layer for outputting results in text or JSON format.

use anyhow::Result;
use lodegen_core::{Failure, Generated, LeafOrigin, PlannedOutput};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Writer for command output with format abstraction.
pub struct OutputWriter {
    format: OutputFormat,
    stdout: io::Stdout,
}

impl OutputWriter {
    /// Create a new OutputWriter.
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            stdout: io::stdout(),
        }
    }

    /// Write output using the configured format.
    ///
    /// The `text_fn` closure is called only in text mode to generate the
    /// human-readable output.
    pub fn write<T: Serialize>(&self, data: &T, text_fn: impl FnOnce() -> String) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                writeln!(&self.stdout, "{}", json)?;
            }
            OutputFormat::Text => {
                let text = text_fn();
                if !text.is_empty() {
                    write!(&self.stdout, "{}", text)?;
                }
            }
        }
        Ok(())
    }

    /// Write an error message to stderr.
    ///
    /// In JSON mode, writes a JSON error object with success=false.
    /// In text mode, writes the error message directly.
    pub fn write_error(&self, error: &anyhow::Error, result_code: u8) {
        match self.format {
            OutputFormat::Json => {
                let error_output = ErrorOutput {
                    success: false,
                    result_code,
                    error: format!("{:#}", error),
                };
                if let Ok(json) = serde_json::to_string_pretty(&error_output) {
                    let _ = writeln!(io::stderr(), "{}", json);
                }
            }
            OutputFormat::Text => {
                let _ = writeln!(io::stderr(), "Error: {:#}", error);
            }
        }
    }
}

/// Text lines for recorded failures.
pub fn failure_lines(failures: &[Failure]) -> String {
    let mut text = String::new();
    for failure in failures {
        let _ = writeln!(
            text,
            "failed [{}] {}: {}",
            failure.kind, failure.address, failure.message
        );
    }
    text
}

// ============================================================================
// Data Transfer Objects (DTOs) for JSON output
// ============================================================================

/// Error output structure.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub success: bool,
    pub result_code: u8,
    pub error: String,
}

/// Output for `generate` command.
#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub success: bool,
    pub result_code: u8,
    pub target_directory: String,
    pub finished_at: String,
    pub generated: Vec<Generated>,
    pub failures: Vec<Failure>,
}

/// A planned document for `scan` command.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedInfo {
    pub input: String,
    pub source: String,
    pub origin: LeafOrigin,
    pub context: String,
    pub output: String,
}

impl From<&PlannedOutput> for PlannedInfo {
    fn from(planned: &PlannedOutput) -> Self {
        Self {
            input: planned.leaf.input.clone(),
            source: planned.leaf.locator.address(),
            origin: planned.leaf.origin,
            context: planned.leaf.context.to_string(),
            output: planned.output.display().to_string(),
        }
    }
}

/// Output for `scan` command.
#[derive(Debug, Serialize)]
pub struct ScanOutput {
    pub success: bool,
    pub result_code: u8,
    pub outputs: Vec<PlannedInfo>,
    pub failures: Vec<Failure>,
}
