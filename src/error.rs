//! Error types for document loading, dereferencing, and normalization.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::CompositionKind;

/// Errors from the dereference and composition-normalization operations.
///
/// One tagged error type covers all four engine operations, so callers
/// match on the kind instead of juggling exceptions and sentinels.
#[derive(Debug, Error)]
pub enum DerefError {
    #[error("start-at path matched nothing: {path}")]
    ScopeNotFound { path: String },

    #[error("invalid path expression \"{expr}\": {message}")]
    InvalidPath { expr: String, message: String },

    #[error("unsupported $ref \"{pointer}\": only local fragment pointers (#/...) are resolvable")]
    InvalidPointer { pointer: String },

    #[error("unresolvable $ref \"{pointer}\"")]
    Unresolvable { pointer: String },

    #[error("reference cycle detected at \"{pointer}\"")]
    CycleDetected { pointer: String },

    #[error("empty {keyword} at {path}: no first alternative to select")]
    EmptyComposition {
        keyword: CompositionKind,
        path: String,
    },

    #[error("nesting depth limit of {limit} exceeded at {path}")]
    DepthExceeded { limit: usize, path: String },
}

/// Errors while loading a document from disk or text.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML: {source}")]
    InvalidYaml {
        #[source]
        source: serde_yaml::Error,
    },
}

impl DerefError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        // All engine errors are document/semantic errors
        2
    }
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            LoadError::InvalidJson { .. } | LoadError::InvalidYaml { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deref_error_exit_codes() {
        let err = DerefError::Unresolvable {
            pointer: "#/components/missing".into(),
        };
        assert_eq!(err.exit_code(), 2);

        let err = DerefError::ScopeNotFound {
            path: "$.nowhere".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("spec.yaml"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::InvalidJson {
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unresolvable_names_the_pointer() {
        let err = DerefError::Unresolvable {
            pointer: "#/components/missing".into(),
        };
        assert!(err.to_string().contains("#/components/missing"));
    }

    #[test]
    fn empty_composition_names_keyword_and_path() {
        let err = DerefError::EmptyComposition {
            keyword: CompositionKind::OneOf,
            path: "$.components.schemas.Pet".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("oneOf"));
        assert!(msg.contains("$.components.schemas.Pet"));
    }
}
