//! Static diagnostics - reports document problems without transforming.
//!
//! Finds what the transforms would later fail on: unresolvable or
//! non-local `$ref` pointers, reference cycles, and empty `oneOf`/`anyOf`
//! sequences. Dereferencing aborts on the first problem; this pass
//! collects all of them.

use serde::Serialize;
use serde_json::Value;

use crate::error::DerefError;
use crate::path::{path_to_string, Step};
use crate::resolver::resolve_pointer;
use crate::types::{ref_target, CompositionKind, REF_KEY};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic found in a document.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable machine-readable code, e.g. "broken-ref".
    pub code: String,
    /// Path expression locating the offending node.
    pub path: String,
    pub message: String,
}

/// Result of checking one document.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub errors: usize,
    pub warnings: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    /// True when no error-severity diagnostics were found.
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Scan a document for problems the transforms would fail on.
///
/// Reported codes:
/// - `broken-ref` (error): a `$ref` pointer that doesn't resolve.
/// - `external-ref` (error): a `$ref` that isn't a local fragment pointer.
/// - `ref-cycle` (error): a chained-reference cycle.
/// - `non-string-ref` (warning): a `$ref` key holding a non-string value.
/// - `empty-composition` (error): an empty `oneOf`/`anyOf` sequence.
pub fn check(document: &Value) -> CheckResult {
    let mut diagnostics = Vec::new();
    let mut path = Vec::new();
    check_node(document, document, &mut path, &mut diagnostics);

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;
    CheckResult {
        errors,
        warnings,
        diagnostics,
    }
}

// --- Internal implementation ---

fn check_node(node: &Value, root: &Value, path: &mut Vec<Step>, out: &mut Vec<Diagnostic>) {
    match node {
        Value::Object(map) => {
            if let Some(pointer) = ref_target(node) {
                check_pointer(pointer, root, path, out);
            } else if map.contains_key(REF_KEY) {
                out.push(Diagnostic {
                    severity: Severity::Warning,
                    code: "non-string-ref".to_string(),
                    path: path_to_string(path),
                    message: "$ref value is not a string".to_string(),
                });
            }

            // An empty allOf merges to its siblings; only the selection
            // keywords need a first element
            for kind in [CompositionKind::OneOf, CompositionKind::AnyOf] {
                if let Some(members) = map.get(kind.key()).and_then(Value::as_array) {
                    if members.is_empty() {
                        out.push(Diagnostic {
                            severity: Severity::Error,
                            code: "empty-composition".to_string(),
                            path: path_to_string(path),
                            message: format!("{kind} has no alternatives"),
                        });
                    }
                }
            }

            for (key, child) in map {
                path.push(Step::Key(key.clone()));
                check_node(child, root, path, out);
                path.pop();
            }
        }
        Value::Array(arr) => {
            for (index, child) in arr.iter().enumerate() {
                path.push(Step::Index(index));
                check_node(child, root, path, out);
                path.pop();
            }
        }
        _ => {}
    }
}

fn check_pointer(pointer: &str, root: &Value, path: &[Step], out: &mut Vec<Diagnostic>) {
    let (code, message) = match resolve_pointer(pointer, root) {
        Ok(_) => return,
        Err(DerefError::InvalidPointer { .. }) => (
            "external-ref",
            format!("\"{pointer}\" is not a local fragment pointer"),
        ),
        Err(DerefError::CycleDetected { .. }) => {
            ("ref-cycle", format!("\"{pointer}\" is part of a reference cycle"))
        }
        Err(_) => ("broken-ref", format!("\"{pointer}\" does not resolve")),
    };
    out.push(Diagnostic {
        severity: Severity::Error,
        code: code.to_string(),
        path: path_to_string(path),
        message,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_document_passes() {
        let document = json!({
            "components": { "A": { "type": "string" } },
            "B": { "$ref": "#/components/A" },
            "C": { "oneOf": [ { "type": "number" } ] }
        });
        let result = check(&document);
        assert!(result.is_ok());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn broken_ref_reported_with_path() {
        let document = json!({
            "B": { "$ref": "#/components/missing" }
        });
        let result = check(&document);
        assert_eq!(result.errors, 1);
        assert_eq!(result.diagnostics[0].code, "broken-ref");
        assert_eq!(result.diagnostics[0].path, "$.B");
    }

    #[test]
    fn external_ref_reported() {
        let document = json!({
            "B": { "$ref": "other.yaml#/components/A" }
        });
        let result = check(&document);
        assert_eq!(result.diagnostics[0].code, "external-ref");
    }

    #[test]
    fn ref_cycle_reported() {
        let document = json!({
            "a": { "$ref": "#/b" },
            "b": { "$ref": "#/a" }
        });
        let result = check(&document);
        assert!(result
            .diagnostics
            .iter()
            .all(|d| d.code == "ref-cycle"));
        assert_eq!(result.errors, 2);
    }

    #[test]
    fn non_string_ref_is_a_warning() {
        let document = json!({ "B": { "$ref": 42 } });
        let result = check(&document);
        assert!(result.is_ok());
        assert_eq!(result.warnings, 1);
        assert_eq!(result.diagnostics[0].code, "non-string-ref");
    }

    #[test]
    fn empty_selection_composition_reported() {
        let document = json!({
            "A": { "oneOf": [] },
            "B": { "anyOf": [] },
            "C": { "allOf": [] }
        });
        let result = check(&document);
        // allOf is mergeable when empty; only oneOf/anyOf are errors
        assert_eq!(result.errors, 2);
        assert!(result
            .diagnostics
            .iter()
            .all(|d| d.code == "empty-composition"));
    }

    #[test]
    fn collects_multiple_problems() {
        let document = json!({
            "a": { "$ref": "#/missing" },
            "b": { "$ref": "#/also/missing" },
            "c": { "anyOf": [] }
        });
        let result = check(&document);
        assert_eq!(result.errors, 3);
    }
}
