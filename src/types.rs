//! Core types for document dereferencing and composition normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key marking a reference node.
pub const REF_KEY: &str = "$ref";

/// Default nesting-depth budget for tree walks.
///
/// Deep enough for any real OpenAPI document; small enough that a
/// pathological or mutually-referencing input fails with
/// [`DerefError::DepthExceeded`](crate::DerefError::DepthExceeded)
/// instead of exhausting the native stack.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns the pointer string if `node` is a reference node.
///
/// A reference node is any mapping whose `$ref` key holds a string.
/// Sibling keys do not disqualify it; resolution replaces the whole node.
pub fn ref_target(node: &Value) -> Option<&str> {
    node.as_object()?.get(REF_KEY)?.as_str()
}

/// Composition keyword being normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompositionKind {
    AllOf,
    OneOf,
    AnyOf,
}

impl CompositionKind {
    /// Returns the document key for this keyword.
    pub fn key(&self) -> &'static str {
        match self {
            CompositionKind::AllOf => "allOf",
            CompositionKind::OneOf => "oneOf",
            CompositionKind::AnyOf => "anyOf",
        }
    }
}

impl std::fmt::Display for CompositionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Options for [`dereference`](crate::dereference).
#[derive(Debug, Clone)]
pub struct DerefOptions {
    /// Path expression selecting the subtree to dereference.
    /// The first match becomes the scope root. Defaults to `"$"`.
    pub start_at: String,
    /// Path expressions, evaluated against the full document, marking
    /// subtrees whose `$ref` content must be left untouched.
    pub ignore: Vec<String>,
    /// Nesting-depth budget for the walk.
    pub max_depth: usize,
}

impl Default for DerefOptions {
    fn default() -> Self {
        Self {
            start_at: "$".to_string(),
            ignore: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DerefOptions {
    /// Create options scoped to the document root with no ignores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scoping path expression.
    pub fn start_at(mut self, expr: impl Into<String>) -> Self {
        self.start_at = expr.into();
        self
    }

    /// Set the ignore expressions.
    pub fn ignore(mut self, exprs: Vec<String>) -> Self {
        self.ignore = exprs;
        self
    }

    /// Add a single ignore expression.
    pub fn ignore_path(mut self, expr: impl Into<String>) -> Self {
        self.ignore.push(expr.into());
        self
    }

    /// Override the nesting-depth budget.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
