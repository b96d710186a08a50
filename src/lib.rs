//! OpenAPI Dereferencer
//!
//! Inlines internal `$ref` pointers and normalizes schema composition
//! keywords in tree-shaped specification documents (OpenAPI / JSON-Schema
//! style).
//!
//! Dereferencing can be scoped to a subtree with a path expression and can
//! exclude named subtrees; composition normalization merges `allOf` members
//! into a single object and reduces `oneOf`/`anyOf` to their first
//! alternative. Every operation is pure: the input document is never
//! mutated, and the result is a brand-new tree.
//!
//! # Example
//!
//! ```
//! use openapi_deref::{dereference, DerefOptions};
//! use serde_json::json;
//!
//! let document = json!({
//!     "components": {
//!         "schemas": { "Pet": { "type": "object" } }
//!     },
//!     "paths": {
//!         "/pets": {
//!             "get": {
//!                 "responses": { "200": { "$ref": "#/components/schemas/Pet" } }
//!             }
//!         }
//!     }
//! });
//!
//! let resolved = dereference(&document, &DerefOptions::new()).unwrap();
//!
//! assert_eq!(
//!     resolved["paths"]["/pets"]["get"]["responses"]["200"],
//!     json!({ "type": "object" })
//! );
//! ```
//!
//! # Operations
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`dereference`] | Inline every `$ref` in scope, excluding ignored subtrees |
//! | [`flatten_all_of`] | Merge `allOf` members into a single object |
//! | [`select_first_one_of`] | Replace each `oneOf` node with its first alternative |
//! | [`select_first_any_of`] | Replace each `anyOf` node with its first alternative |
//!
//! Scoping and exclusion use a JSONPath-style subset, e.g.
//! `$.components.responses` or `$.components.x-stackQL-resources`; `$ref`
//! pointers are local fragment pointers (`#/components/schemas/Pet`).
//! References to other files or URLs are not supported and fail with
//! [`DerefError::InvalidPointer`].

mod check;
mod compose;
mod error;
mod loader;
mod path;
mod resolver;
mod types;
mod walker;

pub use check::{check, CheckResult, Diagnostic, Severity};
pub use compose::{flatten_all_of, select_first_any_of, select_first_one_of};
pub use error::{DerefError, LoadError};
pub use loader::{load_document, load_document_str, load_yaml_str, DocumentFormat};
pub use path::{select, splice};
pub use resolver::{dereference, resolve_pointer};
pub use types::{json_type_name, ref_target, CompositionKind, DerefOptions, DEFAULT_MAX_DEPTH};
