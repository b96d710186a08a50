//! Document loading from files and strings.
//!
//! OpenAPI documents come as YAML or JSON; both parse into the same
//! in-memory tree. Format is detected from the file extension, with JSON
//! as the fallback.

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;

/// On-disk representation of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a path's extension. Anything that is not
    /// `.yaml`/`.yml` is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Load a document from a file path, detecting YAML or JSON by extension.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// `LoadError::ReadError` if it can't be read, or the format's parse error.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    match DocumentFormat::from_path(path) {
        DocumentFormat::Json => load_document_str(&content),
        DocumentFormat::Yaml => load_yaml_str(&content),
    }
}

/// Parse a document from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_document_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Parse a document from a YAML string.
///
/// # Errors
///
/// Returns `LoadError::InvalidYaml` if the string isn't valid YAML.
pub fn load_yaml_str(content: &str) -> Result<Value, LoadError> {
    serde_yaml::from_str(content).map_err(|source| LoadError::InvalidYaml { source })
}
