//! Coverage analysis types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Summary of a coverage run against a validated Stackfile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageResult {
    /// Every file considered, covered or not.
    pub total_files: usize,
    /// Files matched by no technology, in input order.
    pub uncovered_files: Vec<String>,
}

impl CoverageResult {
    pub fn is_fully_covered(&self) -> bool {
        self.uncovered_files.is_empty()
    }

    pub fn covered_count(&self) -> usize {
        self.total_files - self.uncovered_files.len()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoverageError {
    /// Two technologies at the same hierarchy depth claim the same file.
    #[error(
        "Classification conflict: technologies \"{first}\" and \"{second}\" both match \"{file}\" at the same depth"
    )]
    ClassificationConflict {
        file: String,
        first: String,
        second: String,
    },

    #[error("Invalid glob pattern \"{pattern}\" in technology \"{technology}\": {message}")]
    InvalidPattern {
        technology: String,
        pattern: String,
        message: String,
    },
}

/// Failures while enumerating repository files.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Repository path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Repository path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to scan repository at {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },

    #[error("File scan task failed: {0}")]
    Join(String),
}
