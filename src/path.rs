//! Path-query evaluation over documents.
//!
//! Implements the JSONPath-style subset used for scoping and exclusion:
//! `$` for the root, dotted child steps (`$.components.responses`),
//! bracketed steps (`$['x-stackQL-resources']`, `$[0]`), and wildcards
//! (`$.paths.*`, `$[*]`). Matching zero nodes is not an error at this
//! layer; callers decide whether an empty result matters.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::DerefError;

/// One concrete step from the document root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Mapping key.
    Key(String),
    /// Sequence index.
    Index(usize),
}

/// One parsed segment of a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
    Wildcard,
}

/// Evaluate a path expression, returning matching nodes in document order.
///
/// # Errors
///
/// Returns `DerefError::InvalidPath` if the expression is malformed.
pub fn select<'a>(document: &'a Value, expr: &str) -> Result<Vec<&'a Value>, DerefError> {
    Ok(select_with_paths(document, expr)?
        .into_iter()
        .map(|(_, node)| node)
        .collect())
}

/// Replace the node(s) matched by `expr` with `replacement`, returning a
/// rebuilt document. The input is untouched; zero matches returns an
/// unchanged copy.
///
/// # Errors
///
/// Returns `DerefError::InvalidPath` if the expression is malformed.
pub fn splice(document: &Value, expr: &str, replacement: &Value) -> Result<Value, DerefError> {
    let targets: HashSet<Vec<Step>> = select_with_paths(document, expr)?
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    if targets.is_empty() {
        return Ok(document.clone());
    }
    let mut path = Vec::new();
    Ok(rebuild(document, &mut path, &targets, replacement))
}

/// Like [`select`], but pairs each match with its concrete path.
pub(crate) fn select_with_paths<'a>(
    document: &'a Value,
    expr: &str,
) -> Result<Vec<(Vec<Step>, &'a Value)>, DerefError> {
    let segments = parse(expr)?;
    let mut matches: Vec<(Vec<Step>, &Value)> = vec![(Vec::new(), document)];

    for segment in &segments {
        let mut next = Vec::new();
        for (path, node) in matches {
            match segment {
                Segment::Key(key) => {
                    if let Some(child) = node.as_object().and_then(|map| map.get(key)) {
                        let mut child_path = path.clone();
                        child_path.push(Step::Key(key.clone()));
                        next.push((child_path, child));
                    }
                }
                Segment::Index(index) => {
                    if let Some(child) = node.as_array().and_then(|arr| arr.get(*index)) {
                        let mut child_path = path.clone();
                        child_path.push(Step::Index(*index));
                        next.push((child_path, child));
                    }
                }
                Segment::Wildcard => match node {
                    Value::Object(map) => {
                        for (key, child) in map {
                            let mut child_path = path.clone();
                            child_path.push(Step::Key(key.clone()));
                            next.push((child_path, child));
                        }
                    }
                    Value::Array(arr) => {
                        for (index, child) in arr.iter().enumerate() {
                            let mut child_path = path.clone();
                            child_path.push(Step::Index(index));
                            next.push((child_path, child));
                        }
                    }
                    _ => {}
                },
            }
        }
        matches = next;
    }

    Ok(matches)
}

/// Replace the node at one concrete path, returning a rebuilt document.
pub(crate) fn splice_at(document: &Value, at: &[Step], replacement: &Value) -> Value {
    let mut targets = HashSet::new();
    targets.insert(at.to_vec());
    let mut path = Vec::new();
    rebuild(document, &mut path, &targets, replacement)
}

/// Render a concrete path in expression syntax, for error messages.
pub(crate) fn path_to_string(path: &[Step]) -> String {
    let mut out = String::from("$");
    for step in path {
        match step {
            Step::Key(key) if is_plain_key(key) => {
                out.push('.');
                out.push_str(key);
            }
            Step::Key(key) => {
                out.push_str("['");
                out.push_str(key);
                out.push_str("']");
            }
            Step::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

// --- Internal implementation ---

fn rebuild(
    node: &Value,
    path: &mut Vec<Step>,
    targets: &HashSet<Vec<Step>>,
    replacement: &Value,
) -> Value {
    if targets.contains(path.as_slice()) {
        return replacement.clone();
    }
    match node {
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, child) in map {
                path.push(Step::Key(key.clone()));
                out.insert(key.clone(), rebuild(child, path, targets, replacement));
                path.pop();
            }
            Value::Object(out)
        }
        Value::Array(arr) => {
            let mut out = Vec::with_capacity(arr.len());
            for (index, child) in arr.iter().enumerate() {
                path.push(Step::Index(index));
                out.push(rebuild(child, path, targets, replacement));
                path.pop();
            }
            Value::Array(out)
        }
        other => other.clone(),
    }
}

fn parse(expr: &str) -> Result<Vec<Segment>, DerefError> {
    let invalid = |message: &str| DerefError::InvalidPath {
        expr: expr.to_string(),
        message: message.to_string(),
    };

    let trimmed = expr.trim();
    let mut chars = trimmed.char_indices().peekable();
    match chars.next() {
        Some((_, '$')) => {}
        _ => return Err(invalid("expression must start with '$'")),
    }

    let mut segments = Vec::new();
    while let Some((_, c)) = chars.next() {
        match c {
            '.' => {
                if matches!(chars.peek(), Some((_, '*'))) {
                    chars.next();
                    segments.push(Segment::Wildcard);
                    continue;
                }
                let mut key = String::new();
                while let Some((_, next)) = chars.peek() {
                    if *next == '.' || *next == '[' {
                        break;
                    }
                    key.push(*next);
                    chars.next();
                }
                if key.is_empty() {
                    return Err(invalid("empty key after '.'"));
                }
                segments.push(Segment::Key(key));
            }
            '[' => {
                match chars.peek() {
                    Some((_, '*')) => {
                        chars.next();
                        match chars.next() {
                            Some((_, ']')) => segments.push(Segment::Wildcard),
                            _ => return Err(invalid("expected ']' after '*'")),
                        }
                    }
                    Some((_, quote @ ('\'' | '"'))) => {
                        let quote = *quote;
                        chars.next();
                        let mut key = String::new();
                        let mut closed = false;
                        for (_, next) in chars.by_ref() {
                            if next == quote {
                                closed = true;
                                break;
                            }
                            key.push(next);
                        }
                        if !closed {
                            return Err(invalid("unterminated quoted key"));
                        }
                        match chars.next() {
                            Some((_, ']')) => segments.push(Segment::Key(key)),
                            _ => return Err(invalid("expected ']' after quoted key")),
                        }
                    }
                    Some((_, d)) if d.is_ascii_digit() => {
                        let mut digits = String::new();
                        while let Some((_, next)) = chars.peek() {
                            if !next.is_ascii_digit() {
                                break;
                            }
                            digits.push(*next);
                            chars.next();
                        }
                        match chars.next() {
                            Some((_, ']')) => {
                                let index = digits
                                    .parse::<usize>()
                                    .map_err(|_| invalid("index out of range"))?;
                                segments.push(Segment::Index(index));
                            }
                            _ => return Err(invalid("expected ']' after index")),
                        }
                    }
                    _ => return Err(invalid("expected index, quoted key, or '*' after '['")),
                }
            }
            _ => return Err(invalid("expected '.' or '[' between steps")),
        }
    }

    Ok(segments)
}
