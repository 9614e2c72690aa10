//! Output formatting for status reports
//!
//! Reports render as JSON, YAML or human-readable text. Human output splits
//! between stdout (the result itself) and stderr (summaries and failures);
//! machine-readable formats put the whole report on stdout.
//!
//! # Example
//!
//! ```
//! use stacklens::cli::output::{OutputFormat, OutputFormatter, StatusReport};
//!
//! let report = StatusReport::Covered { total_files: 3, uncovered_files: vec![] };
//! let rendered = OutputFormatter::new(OutputFormat::Json).format(&report).unwrap();
//! assert!(rendered.stdout.contains("\"status\": \"covered\""));
//! ```

use anyhow::{Context, Result};
use serde::Serialize;

use crate::coverage::{CoverageError, CoverageResult};
use crate::stackfile::ValidationError;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-friendly, version-control friendly)
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Outcome of a `status` run that produced a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusReport {
    Covered {
        total_files: usize,
        uncovered_files: Vec<String>,
    },
    Uncovered {
        total_files: usize,
        uncovered_files: Vec<String>,
    },
    Invalid {
        errors: Vec<ValidationError>,
    },
    Conflict {
        file: String,
        technologies: Vec<String>,
        message: String,
    },
}

impl StatusReport {
    pub fn from_coverage(result: CoverageResult) -> Self {
        if result.is_fully_covered() {
            return Self::Covered {
                total_files: result.total_files,
                uncovered_files: Vec::new(),
            };
        }

        let mut uncovered_files = result.uncovered_files;
        uncovered_files.sort();
        Self::Uncovered {
            total_files: result.total_files,
            uncovered_files,
        }
    }

    /// Maps an analyzer failure onto a report. Pattern errors carry no
    /// conflicting file, so they are reported against the technology only.
    pub fn from_coverage_error(err: &CoverageError) -> Self {
        match err {
            CoverageError::ClassificationConflict {
                file,
                first,
                second,
            } => Self::Conflict {
                file: file.clone(),
                technologies: vec![first.clone(), second.clone()],
                message: err.to_string(),
            },
            CoverageError::InvalidPattern { technology, .. } => Self::Conflict {
                file: String::new(),
                technologies: vec![technology.clone()],
                message: err.to_string(),
            },
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Covered { .. } => 0,
            Self::Uncovered { .. } | Self::Invalid { .. } | Self::Conflict { .. } => 1,
        }
    }
}

/// Text destined for the two output streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedReport {
    pub stdout: String,
    pub stderr: String,
}

/// Output formatter for status reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &StatusReport) -> Result<RenderedReport> {
        match self.format {
            OutputFormat::Json => Ok(RenderedReport {
                stdout: format_json(report)?,
                stderr: String::new(),
            }),
            OutputFormat::Yaml => Ok(RenderedReport {
                stdout: format_yaml(report)?,
                stderr: String::new(),
            }),
            OutputFormat::Human => Ok(format_human(report)),
        }
    }
}

fn format_json(report: &StatusReport) -> Result<String> {
    let mut output =
        serde_json::to_string_pretty(report).context("Failed to serialize status report to JSON")?;
    output.push('\n');
    Ok(output)
}

fn format_yaml(report: &StatusReport) -> Result<String> {
    serde_yaml::to_string(report).context("Failed to serialize status report to YAML")
}

fn format_human(report: &StatusReport) -> RenderedReport {
    let mut rendered = RenderedReport::default();

    match report {
        StatusReport::Covered { .. } => {
            rendered
                .stdout
                .push_str("\u{2713} Stackfile valid. All files are covered.\n");
        }
        StatusReport::Uncovered {
            uncovered_files, ..
        } => {
            for file in uncovered_files {
                rendered.stdout.push_str(file);
                rendered.stdout.push('\n');
            }
            rendered.stderr.push_str(&format!(
                "{} uncovered file(s) found.\n",
                uncovered_files.len()
            ));
        }
        StatusReport::Invalid { errors } => {
            rendered.stderr.push_str("Stackfile validation failed:\n");
            for error in errors {
                rendered.stderr.push_str(&format!("  {}\n", error));
            }
        }
        StatusReport::Conflict { message, .. } => {
            rendered.stderr.push_str(message);
            rendered.stderr.push('\n');
        }
    }

    rendered
}
