//! Glob patterns with micromatch-style defaults.
//!
//! - `*`, `?` and `[...]` stay inside one path segment; `**` as a whole
//!   segment spans any number of segments.
//! - Wildcards never match a segment that starts with `.` unless the pattern
//!   segment itself starts with `.`, so `**/*.yml` leaves `.github/ci.yml`
//!   and `.eslintrc.yml` alone.
//! - `{a,b}` and `{1..3}` expand before matching.
//! - `@(a|b)`, `?(a|b)`, `+(a|b)` and `*(a|b)` extglob groups work inside a
//!   segment. Negated groups `!(a|b)` are rejected.
//! - A leading `!` turns a whole pattern into an exclusion. In a
//!   [`PatternList`] exclusions and inclusions apply in order, and a list of
//!   exclusions alone matches everything it does not exclude.

use regex::Regex;
use thiserror::Error;

const MAX_BRACE_EXPANSION: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("negated extglob groups \"!(...)\" are not supported")]
    NegatedExtglob,

    #[error("unclosed extglob group")]
    UnclosedGroup,

    #[error("extglob groups cannot contain a path separator")]
    SeparatorInGroup,

    #[error("brace expansion produces more than 4096 patterns")]
    ExpansionTooLarge,

    #[error("{0}")]
    Regex(String),
}

#[derive(Debug)]
enum Segment {
    Globstar,
    Part { regex: Regex, explicit_dot: bool },
}

impl Segment {
    fn compile(source: &[char]) -> Result<Self, PatternError> {
        let translated = translate(source)?;
        let regex = Regex::new(&format!("^{}$", translated))
            .map_err(|err| PatternError::Regex(err.to_string()))?;
        Ok(Self::Part {
            regex,
            explicit_dot: source.first() == Some(&'.'),
        })
    }
}

/// One brace-free alternative split into path segments.
#[derive(Debug)]
struct SegmentPattern {
    segments: Vec<Segment>,
}

impl SegmentPattern {
    fn compile(glob: &str) -> Result<Self, PatternError> {
        let chars: Vec<char> = glob.chars().collect();
        let mut segments = Vec::new();

        for part in split_segments(&chars)? {
            if part == &['*', '*'][..] {
                if !matches!(segments.last(), Some(Segment::Globstar)) {
                    segments.push(Segment::Globstar);
                }
            } else {
                segments.push(Segment::compile(part)?);
            }
        }

        Ok(Self { segments })
    }

    fn is_match(&self, path: &[&str]) -> bool {
        match_segments(&self.segments, path)
    }
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::Globstar, rest)) => {
            for skip in 0..=path.len() {
                if match_segments(rest, &path[skip..]) {
                    return true;
                }
                if path.get(skip).map_or(true, |name| name.starts_with('.')) {
                    return false;
                }
            }
            false
        }
        Some((Segment::Part { regex, explicit_dot }, rest)) => match path.split_first() {
            Some((name, tail)) => {
                (*explicit_dot || !name.starts_with('.'))
                    && regex.is_match(name)
                    && match_segments(rest, tail)
            }
            None => false,
        },
    }
}

/// A single include entry, possibly negated and possibly brace-expanded.
#[derive(Debug)]
pub struct GlobPattern {
    negated: bool,
    alternatives: Vec<SegmentPattern>,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let mut body = pattern;
        let mut negated = false;
        while let Some(rest) = body.strip_prefix('!') {
            if rest.starts_with('(') {
                break;
            }
            negated = !negated;
            body = rest;
        }
        let body = body.strip_prefix("./").unwrap_or(body);

        let alternatives = expand_braces(body)?
            .iter()
            .map(|glob| SegmentPattern::compile(glob))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            negated,
            alternatives,
        })
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Whether the pattern body matches `path`, ignoring negation.
    pub fn is_match(&self, path: &str) -> bool {
        let segments: Vec<&str> = path.split('/').collect();
        self.matches_segments(&segments)
    }

    fn matches_segments(&self, segments: &[&str]) -> bool {
        self.alternatives.iter().any(|alt| alt.is_match(segments))
    }
}

/// An ordered list of patterns evaluated as one matcher.
#[derive(Debug, Default)]
pub struct PatternList {
    patterns: Vec<GlobPattern>,
}

impl PatternList {
    pub fn new(patterns: Vec<GlobPattern>) -> Self {
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_match(&self, path: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let segments: Vec<&str> = path.split('/').collect();
        let mut kept = false;
        let mut omitted = false;
        for pattern in &self.patterns {
            if !pattern.matches_segments(&segments) {
                continue;
            }
            if pattern.negated {
                omitted = true;
            } else {
                omitted = false;
                kept = true;
            }
        }

        let only_exclusions = self.patterns.iter().all(GlobPattern::is_negated);
        (kept || only_exclusions) && !omitted
    }
}

/// Splits on `/` outside classes; a separator inside an extglob group is an error.
fn split_segments(chars: &[char]) -> Result<Vec<&[char]>, PatternError> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' => {
                if let Some(end) = class_end(chars, i) {
                    i = end;
                }
            }
            '(' if depth > 0 || (i > 0 && matches!(chars[i - 1], '*' | '?' | '+' | '@' | '!')) => {
                depth += 1
            }
            ')' => depth = depth.saturating_sub(1),
            '/' if depth > 0 => return Err(PatternError::SeparatorInGroup),
            '/' => {
                parts.push(&chars[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&chars[start..]);

    Ok(parts)
}

/// Translates one segment into a regex body.
fn translate(chars: &[char]) -> Result<String, PatternError> {
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' => {
                i += 1;
                push_literal(&mut out, chars.get(i).copied().unwrap_or('\\'));
            }
            '!' if chars.get(i + 1) == Some(&'(') => return Err(PatternError::NegatedExtglob),
            '*' | '?' | '+' | '@' if chars.get(i + 1) == Some(&'(') => {
                let close = group_end(chars, i + 1).ok_or(PatternError::UnclosedGroup)?;
                let body = split_alternatives(&chars[i + 2..close])
                    .into_iter()
                    .map(translate)
                    .collect::<Result<Vec<_>, _>>()?
                    .join("|");
                out.push_str("(?:");
                out.push_str(&body);
                out.push(')');
                match c {
                    '*' => out.push('*'),
                    '?' => out.push('?'),
                    '+' => out.push('+'),
                    _ => {}
                }
                i = close;
            }
            '*' => {
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
                out.push_str("[^/]*");
            }
            '?' => out.push_str("[^/]"),
            '[' => match class_end(chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i + 1..end]));
                    i = end;
                }
                None => push_literal(&mut out, '['),
            },
            _ => push_literal(&mut out, c),
        }
        i += 1;
    }

    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

/// Index of the `)` closing the group opened at `open`.
fn group_end(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;

    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' => {
                if let Some(end) = class_end(chars, i) {
                    i = end;
                }
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

fn split_alternatives(chars: &[char]) -> Vec<&[char]> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' => {
                if let Some(end) = class_end(chars, i) {
                    i = end;
                }
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                parts.push(&chars[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&chars[start..]);

    parts
}

/// Index of the `]` closing the class opened at `open`, if it closes within
/// the segment.
fn class_end(chars: &[char], open: usize) -> Option<usize> {
    let mut i = open + 1;
    if matches!(chars.get(i), Some('!') | Some('^')) {
        i += 1;
    }
    if chars.get(i) == Some(&']') {
        i += 1;
    }

    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' if chars.get(i + 1) == Some(&':') => {
                if let Some(end) = posix_class_end(chars, i) {
                    i = end;
                }
            }
            ']' => return Some(i),
            '/' => return None,
            _ => {}
        }
        i += 1;
    }

    None
}

/// Index of the `]` ending a `[:name:]` class that starts at `open`.
fn posix_class_end(chars: &[char], open: usize) -> Option<usize> {
    let mut i = open + 2;
    while i + 1 < chars.len() {
        if chars[i] == ':' && chars[i + 1] == ']' {
            return Some(i + 1);
        }
        if !chars[i].is_ascii_alphabetic() {
            return None;
        }
        i += 1;
    }
    None
}

fn translate_class(body: &[char]) -> String {
    let mut out = String::from("[");
    let mut start = 0;
    if matches!(body.first(), Some('!') | Some('^')) {
        out.push_str("^/");
        start = 1;
    }

    let mut i = start;
    while i < body.len() {
        let c = body[i];
        if c == '[' && body.get(i + 1) == Some(&':') {
            if let Some(end) = posix_class_end(body, i) {
                out.extend(&body[i..=end]);
                i = end + 1;
                continue;
            }
        }
        if c == '\\' {
            if let Some(&next) = body.get(i + 1) {
                push_class_literal(&mut out, next);
                i += 2;
                continue;
            }
        }
        if c == '-' && i > start && i + 1 < body.len() {
            out.push('-');
        } else {
            push_class_literal(&mut out, c);
        }
        i += 1;
    }

    out.push(']');
    out
}

fn push_class_literal(out: &mut String, c: char) {
    if matches!(c, '\\' | '[' | ']' | '^' | '-' | '&' | '~') {
        out.push('\\');
    }
    out.push(c);
}

/// Expands every `{a,b}` and `{x..y}` group.
///
/// Braces with neither a top-level comma nor a valid range stay literal.
fn expand_braces(pattern: &str) -> Result<Vec<String>, PatternError> {
    let mut pending = vec![pattern.chars().collect::<Vec<char>>()];
    let mut expanded = Vec::new();

    while let Some(current) = pending.pop() {
        match next_brace_group(&current) {
            None => expanded.push(current.into_iter().collect()),
            Some((open, close, options)) => {
                for option in options {
                    let mut next = current[..open].to_vec();
                    next.extend(option.chars());
                    next.extend_from_slice(&current[close + 1..]);
                    pending.push(next);
                }
            }
        }
        if expanded.len() + pending.len() > MAX_BRACE_EXPANSION {
            return Err(PatternError::ExpansionTooLarge);
        }
    }

    Ok(expanded)
}

/// Finds the first expandable brace group: its bounds and its options.
fn next_brace_group(chars: &[char]) -> Option<(usize, usize, Vec<String>)> {
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' => {
                if let Some(end) = class_end(chars, i) {
                    i = end;
                }
            }
            '{' => {
                if let Some(close) = brace_end(chars, i) {
                    let inner = &chars[i + 1..close];
                    if let Some(options) = brace_options(inner) {
                        return Some((i, close, options));
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn brace_end(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn brace_options(inner: &[char]) -> Option<Vec<String>> {
    let mut options = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut i = 0;

    while i < inner.len() {
        match inner[i] {
            '\\' => i += 1,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                options.push(inner[start..i].iter().collect());
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if options.is_empty() {
        let text: String = inner.iter().collect();
        return brace_range(&text);
    }
    options.push(inner[start..].iter().collect());
    Some(options)
}

/// Expands `1..5` or `a..e`; anything else is not a range.
fn brace_range(text: &str) -> Option<Vec<String>> {
    let (from, to) = text.split_once("..")?;

    if let (Ok(from), Ok(to)) = (from.parse::<i64>(), to.parse::<i64>()) {
        if from.abs_diff(to) >= MAX_BRACE_EXPANSION as u64 {
            return None;
        }
        let values: Vec<String> = if from <= to {
            (from..=to).map(|n| n.to_string()).collect()
        } else {
            (to..=from).rev().map(|n| n.to_string()).collect()
        };
        return Some(values);
    }

    let mut from_chars = from.chars();
    let mut to_chars = to.chars();
    match (
        from_chars.next(),
        from_chars.next(),
        to_chars.next(),
        to_chars.next(),
    ) {
        (Some(a), None, Some(b), None) if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
            let values: Vec<String> = if a <= b {
                (a..=b).map(String::from).collect()
            } else {
                (b..=a).rev().map(String::from).collect()
            };
            Some(values)
        }
        _ => None,
    }
}
