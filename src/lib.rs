//! stacklens - semantic technology stack projection
//!
//! A repository declares its technologies in a Stackfile (`.stack`, YAML):
//! each technology has an id, an optional parent and glob patterns naming the
//! files it accounts for. stacklens validates that document and checks that
//! every non-ignored file in the repository is claimed by some technology.
//!
//! # Core Concepts
//!
//! - **Validation**: schema and structural checks over the untyped YAML value,
//!   producing either a [`StackfileDocument`] or a list of coded
//!   [`ValidationError`]s
//! - **Hierarchy**: technologies form a forest through `parent`; a file may be
//!   claimed by several technologies only when they sit at different depths
//! - **Coverage**: classification of repository files against the validated
//!   document, reporting the files no technology matches
//!
//! # Example Usage
//!
//! ```no_run
//! use stacklens::{analyze_coverage, parse_stackfile, scan_files, validate_stackfile};
//! use std::path::Path;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let text = stacklens::load_stackfile(Path::new(".stack")).await?;
//! let raw = parse_stackfile(&text)?;
//! let document = match validate_stackfile(&raw) {
//!     Ok(document) => document,
//!     Err(errors) => {
//!         for error in errors {
//!             eprintln!("{}", error);
//!         }
//!         return Ok(());
//!     }
//! };
//!
//! let files = scan_files(Path::new(".")).await?;
//! let result = analyze_coverage(&files, &document)?;
//! for file in &result.uncovered_files {
//!     println!("{}", file);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`stackfile`]: loading, parsing and validating Stackfiles
//! - [`coverage`]: repository scanning and coverage analysis
//! - [`cli`]: the `stacklens` command-line interface

pub mod cli;
pub mod config;
pub mod coverage;
pub mod stackfile;
pub mod util;

pub use config::{ConfigError, StacklensConfig};
pub use coverage::{analyze_coverage, scan_files, CoverageError, CoverageResult, ScanError};
pub use stackfile::{
    load_stackfile, parse_stackfile, validate_stackfile, StackfileDocument, StackfileError,
    Technology, ValidationError, ValidationErrorCode, ValidationResult,
};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
