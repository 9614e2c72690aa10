//! Repository file enumeration and coverage analysis.

pub mod analyzer;
pub mod pattern;
pub mod scanner;
pub mod types;

pub use analyzer::analyze_coverage;
pub use pattern::{GlobPattern, PatternError, PatternList};
pub use scanner::{scan_files, scan_files_blocking};
pub use types::{CoverageError, CoverageResult, ScanError};
