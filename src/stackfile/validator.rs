//! Schema validation from an untyped YAML value to a [`StackfileDocument`].
//!
//! Validation runs in tiers. Top-level shape errors are collected first; a
//! missing or unsupported `version`, or a missing `technologies` sequence,
//! stops the run before any technology is inspected. Per-technology errors
//! stop the run before parent references are resolved, and unknown parents
//! stop it before the cycle search. The tier order decides which errors a
//! malformed document reports, so it must not be rearranged.

use super::hierarchy::find_cycles;
use super::types::{
    DetectRules, ImportEntry, StackfileDocument, Technology, ValidationError,
    ValidationErrorCode, ValidationResult, SUPPORTED_VERSION,
};
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use tracing::debug;

const ALLOWED_TOP_LEVEL_KEYS: [&str; 3] = ["version", "imports", "technologies"];

const MISSING_VERSION_MESSAGE: &str = "\"version\" field is required.";
const MISSING_TECHNOLOGIES_MESSAGE: &str =
    "\"technologies\" field is required and must be an array.";

/// Validates a parsed Stackfile against every v0 rule.
///
/// Never panics on malformed input: every problem is reported as a
/// [`ValidationError`] in the `Err` batch.
pub fn validate_stackfile(raw: &Value) -> ValidationResult {
    let Some(root) = raw.as_mapping() else {
        debug!("Stackfile root is not a mapping");
        return Err(vec![
            ValidationError::new(ValidationErrorCode::MissingVersion, MISSING_VERSION_MESSAGE),
            ValidationError::new(
                ValidationErrorCode::MissingTechnologies,
                MISSING_TECHNOLOGIES_MESSAGE,
            ),
        ]);
    };

    let mut errors = check_top_level_keys(root);
    errors.extend(check_version(root));

    let technologies = match root.get("technologies") {
        Some(Value::Sequence(items)) => Some(items),
        _ => {
            errors.push(
                ValidationError::new(
                    ValidationErrorCode::MissingTechnologies,
                    MISSING_TECHNOLOGIES_MESSAGE,
                )
                .at("technologies"),
            );
            None
        }
    };

    let technologies = match technologies {
        Some(items) if !errors.iter().any(|e| e.code.is_fatal()) => items,
        _ => return Err(errors),
    };

    let accepted = collect_technologies(technologies, &mut errors);
    if !errors.is_empty() {
        debug!(errors = errors.len(), "Technology entries rejected");
        return Err(errors);
    }

    let parent_errors = check_parents(&accepted);
    if !parent_errors.is_empty() {
        return Err(parent_errors);
    }

    let cycle_errors: Vec<ValidationError> = find_cycles(&accepted)
        .into_iter()
        .map(|members| {
            let chain = members
                .iter()
                .map(|m| format!("\"{}\"", m))
                .collect::<Vec<_>>()
                .join(" → ");
            ValidationError::new(
                ValidationErrorCode::CyclicInheritance,
                format!("Cyclic inheritance detected among technologies: {}.", chain),
            )
        })
        .collect();
    if !cycle_errors.is_empty() {
        return Err(cycle_errors);
    }

    debug!(technologies = accepted.len(), "Stackfile validated");

    Ok(StackfileDocument {
        version: SUPPORTED_VERSION.to_string(),
        imports: collect_imports(root),
        technologies: accepted,
    })
}

fn check_top_level_keys(root: &Mapping) -> Vec<ValidationError> {
    root.keys()
        .filter(|key| {
            key.as_str()
                .map_or(true, |k| !ALLOWED_TOP_LEVEL_KEYS.contains(&k))
        })
        .map(|key| {
            let name = render_value(key);
            ValidationError::new(
                ValidationErrorCode::UnknownTopLevelKey,
                format!("Unknown top-level key: \"{}\".", name),
            )
            .at(name)
        })
        .collect()
}

fn check_version(root: &Mapping) -> Option<ValidationError> {
    match root.get("version") {
        None => Some(
            ValidationError::new(ValidationErrorCode::MissingVersion, MISSING_VERSION_MESSAGE)
                .at("version"),
        ),
        Some(Value::String(v)) if v == SUPPORTED_VERSION => None,
        Some(other) => Some(
            ValidationError::new(
                ValidationErrorCode::UnsupportedVersion,
                format!(
                    "Unsupported version: \"{}\". Only \"{}\" is supported.",
                    render_value(other),
                    SUPPORTED_VERSION
                ),
            )
            .at("version"),
        ),
    }
}

fn collect_technologies(items: &[Value], errors: &mut Vec<ValidationError>) -> Vec<Technology> {
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut accepted = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let Some(entry) = item.as_mapping() else {
            errors.push(
                ValidationError::new(
                    ValidationErrorCode::MissingTechnologyId,
                    format!("Technology at index {} is not an object.", index),
                )
                .at(format!("technologies[{}]", index)),
            );
            continue;
        };

        let id = match entry.get("id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                errors.push(
                    ValidationError::new(
                        ValidationErrorCode::MissingTechnologyId,
                        format!(
                            "Technology at index {} is missing a non-empty \"id\" field.",
                            index
                        ),
                    )
                    .at(format!("technologies[{}].id", index)),
                );
                continue;
            }
        };

        if !seen_ids.insert(id) {
            errors.push(
                ValidationError::new(
                    ValidationErrorCode::DuplicateTechnologyId,
                    format!("Duplicate technology id: \"{}\".", id),
                )
                .at(format!("technologies[{}].id", index)),
            );
            continue;
        }

        let Some(detect) = entry.get("detect").and_then(Value::as_mapping) else {
            errors.push(missing_include(id, format!("technologies[{}].detect", index)));
            continue;
        };

        let Some(include) = detect.get("include").and_then(Value::as_sequence) else {
            errors.push(missing_include(
                id,
                format!("technologies[{}].detect.include", index),
            ));
            continue;
        };

        if include.is_empty() {
            errors.push(
                ValidationError::new(
                    ValidationErrorCode::EmptyDetectInclude,
                    format!("Technology \"{}\" has an empty \"detect.include\" array.", id),
                )
                .at(format!("technologies[{}].detect.include", index)),
            );
            continue;
        }

        accepted.push(Technology {
            id: id.to_string(),
            parent: string_field(entry, "parent"),
            detect: DetectRules {
                include: strings_only(include),
            },
            tags: entry
                .get("tags")
                .and_then(Value::as_sequence)
                .map(|tags| strings_only(tags)),
            description: string_field(entry, "description"),
        });
    }

    accepted
}

fn missing_include(id: &str, path: String) -> ValidationError {
    ValidationError::new(
        ValidationErrorCode::MissingDetectInclude,
        format!("Technology \"{}\" is missing \"detect.include\".", id),
    )
    .at(path)
}

fn check_parents(technologies: &[Technology]) -> Vec<ValidationError> {
    let known: HashSet<&str> = technologies.iter().map(|t| t.id.as_str()).collect();

    technologies
        .iter()
        .enumerate()
        .filter_map(|(index, tech)| {
            let parent = tech.parent.as_deref()?;
            if known.contains(parent) {
                return None;
            }
            Some(
                ValidationError::new(
                    ValidationErrorCode::UnknownParent,
                    format!(
                        "Technology \"{}\" references unknown parent \"{}\".",
                        tech.id, parent
                    ),
                )
                .at(format!("technologies[{}].parent", index)),
            )
        })
        .collect()
}

fn collect_imports(root: &Mapping) -> Option<Vec<ImportEntry>> {
    let entries = root.get("imports")?.as_sequence()?;
    Some(
        entries
            .iter()
            .filter_map(Value::as_mapping)
            .filter_map(|entry| {
                let source = entry.get("source")?.as_str()?;
                let version = entry.get("version")?.as_str()?;
                Some(ImportEntry {
                    source: source.to_string(),
                    version: version.to_string(),
                })
            })
            .collect(),
    )
}

fn string_field(entry: &Mapping, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(str::to_string)
}

fn strings_only(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// Renders a scalar for an error message the way it was written.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Tagged(tagged) => render_value(&tagged.value),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{:?}", other)),
    }
}
