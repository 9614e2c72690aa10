use super::pattern::{GlobPattern, PatternList};
use super::types::{CoverageError, CoverageResult};
use crate::stackfile::hierarchy::depth_map;
use crate::stackfile::{StackfileDocument, Technology};
use tracing::{debug, trace};

/// A technology's include patterns compiled into one ordered matcher.
struct TechnologyMatcher<'a> {
    id: &'a str,
    depth: usize,
    patterns: PatternList,
}

impl<'a> TechnologyMatcher<'a> {
    fn compile(tech: &'a Technology, depth: usize) -> Result<Self, CoverageError> {
        let patterns = tech
            .detect
            .include
            .iter()
            .map(|pattern| {
                GlobPattern::new(pattern).map_err(|err| CoverageError::InvalidPattern {
                    technology: tech.id.clone(),
                    pattern: pattern.clone(),
                    message: err.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let patterns = PatternList::new(patterns);
        if patterns.is_empty() {
            debug!(technology = %tech.id, "Technology has no string include patterns");
        }

        Ok(Self {
            id: &tech.id,
            depth,
            patterns,
        })
    }

    fn matches(&self, file: &str) -> bool {
        self.patterns.is_match(file)
    }
}

/// Determines which files are covered by the Stackfile's detection rules.
///
/// When several technologies match one file they must sit at different
/// hierarchy depths. The first depth shared by two matches fails the whole
/// run with [`CoverageError::ClassificationConflict`], naming the first two
/// technologies seen at that depth.
pub fn analyze_coverage(
    files: &[String],
    stackfile: &StackfileDocument,
) -> Result<CoverageResult, CoverageError> {
    let depths = depth_map(&stackfile.technologies);
    let matchers = stackfile
        .technologies
        .iter()
        .map(|tech| {
            let depth = depths.get(tech.id.as_str()).copied().unwrap_or(0);
            TechnologyMatcher::compile(tech, depth)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut uncovered_files = Vec::new();

    for file in files {
        let matching: Vec<&TechnologyMatcher> =
            matchers.iter().filter(|m| m.matches(file)).collect();

        if matching.len() >= 2 {
            check_same_depth(file, &matching)?;
        }

        if matching.is_empty() {
            trace!(file = %file, "No technology matches");
            uncovered_files.push(file.clone());
        }
    }

    let result = CoverageResult {
        total_files: files.len(),
        uncovered_files,
    };

    debug!(
        total_files = result.total_files,
        covered = result.covered_count(),
        uncovered = result.uncovered_files.len(),
        technologies = matchers.len(),
        "Coverage analysis completed"
    );

    Ok(result)
}

fn check_same_depth(file: &str, matching: &[&TechnologyMatcher]) -> Result<(), CoverageError> {
    let mut by_depth: Vec<(usize, Vec<&str>)> = Vec::new();
    for matcher in matching {
        match by_depth.iter_mut().find(|(depth, _)| *depth == matcher.depth) {
            Some((_, ids)) => ids.push(matcher.id),
            None => by_depth.push((matcher.depth, vec![matcher.id])),
        }
    }

    match by_depth.iter().find(|(_, ids)| ids.len() >= 2) {
        Some((_, ids)) => Err(CoverageError::ClassificationConflict {
            file: file.to_string(),
            first: ids[0].to_string(),
            second: ids[1].to_string(),
        }),
        None => Ok(()),
    }
}
