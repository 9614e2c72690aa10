//! Stackfile loading, parsing and schema validation.

pub mod hierarchy;
pub mod loader;
pub mod parser;
pub mod types;
pub mod validator;

pub use loader::load_stackfile;
pub use parser::parse_stackfile;
pub use types::{
    DetectRules, ImportEntry, StackfileDocument, StackfileError, Technology, ValidationError,
    ValidationErrorCode, ValidationResult, SUPPORTED_VERSION,
};
pub use validator::validate_stackfile;
