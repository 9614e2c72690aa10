use super::types::StackfileError;
use serde_yaml::Value;

/// Parses raw Stackfile text into an untyped value for validation.
///
/// Empty input parses to [`Value::Null`], which the validator then reports
/// as missing `version` and `technologies`.
pub fn parse_stackfile(raw: &str) -> Result<Value, StackfileError> {
    serde_yaml::from_str(raw).map_err(|err| StackfileError::Parse {
        message: err.to_string(),
    })
}
