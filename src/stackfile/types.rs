//! Stackfile v0 domain types and error enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The only Stackfile schema version this crate understands.
pub const SUPPORTED_VERSION: &str = "0.1";

/// Validated detection rules for a single technology (v0: include-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectRules {
    /// Glob patterns evaluated relative to the repository root.
    pub include: Vec<String>,
}

/// A validated node in the single-inheritance technology hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub id: String,
    /// Parent technology id. `None` for roots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub detect: DetectRules,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Technology {
    pub fn new(id: impl Into<String>, include: Vec<String>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            detect: DetectRules { include },
            tags: None,
            description: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// An `imports` entry. Carried through validation, never resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    pub source: String,
    pub version: String,
}

/// A validated, fully-typed Stackfile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackfileDocument {
    /// Always [`SUPPORTED_VERSION`].
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imports: Option<Vec<ImportEntry>>,
    pub technologies: Vec<Technology>,
}

impl StackfileDocument {
    pub fn new(technologies: Vec<Technology>) -> Self {
        Self {
            version: SUPPORTED_VERSION.to_string(),
            imports: None,
            technologies,
        }
    }
}

/// Machine-readable validation failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorCode {
    MissingVersion,
    UnsupportedVersion,
    UnknownTopLevelKey,
    MissingTechnologies,
    DuplicateTechnologyId,
    MissingTechnologyId,
    MissingDetectInclude,
    EmptyDetectInclude,
    UnknownParent,
    CyclicInheritance,
}

impl ValidationErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorCode::MissingVersion => "MISSING_VERSION",
            ValidationErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ValidationErrorCode::UnknownTopLevelKey => "UNKNOWN_TOP_LEVEL_KEY",
            ValidationErrorCode::MissingTechnologies => "MISSING_TECHNOLOGIES",
            ValidationErrorCode::DuplicateTechnologyId => "DUPLICATE_TECHNOLOGY_ID",
            ValidationErrorCode::MissingTechnologyId => "MISSING_TECHNOLOGY_ID",
            ValidationErrorCode::MissingDetectInclude => "MISSING_DETECT_INCLUDE",
            ValidationErrorCode::EmptyDetectInclude => "EMPTY_DETECT_INCLUDE",
            ValidationErrorCode::UnknownParent => "UNKNOWN_PARENT",
            ValidationErrorCode::CyclicInheritance => "CYCLIC_INHERITANCE",
        }
    }

    /// Codes that stop validation before any technology is inspected.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ValidationErrorCode::MissingVersion
                | ValidationErrorCode::UnsupportedVersion
                | ValidationErrorCode::MissingTechnologies
        )
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured error produced by the Stackfile validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub code: ValidationErrorCode,
    /// Human-readable description, printed verbatim by the CLI.
    pub message: String,
    /// Location of the offending field, e.g. `technologies[2].parent`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ValidationError {
    pub fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Outcome of [`validate_stackfile`](super::validate_stackfile).
pub type ValidationResult = Result<StackfileDocument, Vec<ValidationError>>;

/// Failures while reading or deserializing a Stackfile.
#[derive(Error, Debug)]
pub enum StackfileError {
    #[error("Stackfile not found at: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read Stackfile at: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid YAML: {message}")]
    Parse { message: String },
}
