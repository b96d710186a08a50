//! Composition normalization - `allOf` merging and `oneOf`/`anyOf`
//! first-choice reduction.
//!
//! Each operation is one pure pass over the whole document: a tree walk
//! whose transform rewrites composition nodes. `allOf` members fold into a
//! single object; `oneOf`/`anyOf` collapse to their first alternative.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::DerefError;
use crate::path::{path_to_string, Step};
use crate::types::{CompositionKind, DEFAULT_MAX_DEPTH};
use crate::walker::{walk, WalkContext};

/// Merge every `allOf` in the document into a single object.
///
/// Members fold in array order over the node's own sibling keys: later
/// values overwrite earlier ones, except `properties`, which merges as a
/// key-union (same-named entries overwrite, others survive). The result
/// contains no `allOf` key anywhere; nested `allOf` inside members or
/// merged content is flattened too.
///
/// # Errors
///
/// Returns `DerefError::DepthExceeded` on pathologically deep documents.
pub fn flatten_all_of(document: &Value) -> Result<Value, DerefError> {
    normalize(document, CompositionKind::AllOf)
}

/// Replace every `oneOf` node with its first alternative.
///
/// The entire node is replaced by element 0 of the sequence; sibling keys
/// and the remaining alternatives are discarded. The result contains no
/// `oneOf` key anywhere.
///
/// # Errors
///
/// Returns `DerefError::EmptyComposition` if a `oneOf` sequence is empty.
pub fn select_first_one_of(document: &Value) -> Result<Value, DerefError> {
    normalize(document, CompositionKind::OneOf)
}

/// Replace every `anyOf` node with its first alternative.
///
/// Same selection rule as [`select_first_one_of`], for the `anyOf` keyword.
///
/// # Errors
///
/// Returns `DerefError::EmptyComposition` if an `anyOf` sequence is empty.
pub fn select_first_any_of(document: &Value) -> Result<Value, DerefError> {
    normalize(document, CompositionKind::AnyOf)
}

// --- Internal implementation ---

fn normalize(document: &Value, kind: CompositionKind) -> Result<Value, DerefError> {
    let excluded = HashSet::new();
    let ctx = WalkContext {
        excluded: &excluded,
        max_depth: DEFAULT_MAX_DEPTH,
    };
    let mut transform =
        |node: &Value, at: &[Step]| -> Result<Value, DerefError> { apply(node, at, kind) };
    walk(document, &mut Vec::new(), &ctx, &mut transform)
}

/// Rewrite one node if it is a composition node for `kind`.
///
/// Loops until the keyword is gone from the node's top level: an `allOf`
/// member may itself carry `allOf`, and a selected first alternative may
/// itself carry `oneOf`/`anyOf`. Deeper occurrences are the walk's job.
fn apply(node: &Value, at: &[Step], kind: CompositionKind) -> Result<Value, DerefError> {
    let mut current = node.clone();
    loop {
        let Some(map) = current.as_object() else {
            return Ok(current);
        };
        // Only a sequence value makes this a composition node
        let Some(members) = map.get(kind.key()).and_then(Value::as_array) else {
            return Ok(current);
        };

        current = match kind {
            CompositionKind::AllOf => merge_members(map, members),
            CompositionKind::OneOf | CompositionKind::AnyOf => {
                match members.first() {
                    Some(first) => first.clone(),
                    None => {
                        return Err(DerefError::EmptyComposition {
                            keyword: kind,
                            path: path_to_string(at),
                        })
                    }
                }
            }
        };
    }
}

/// Fold `allOf` members over the node's sibling keys.
fn merge_members(map: &Map<String, Value>, members: &[Value]) -> Value {
    let mut result = Map::new();
    for (key, value) in map {
        if key != CompositionKind::AllOf.key() {
            result.insert(key.clone(), value.clone());
        }
    }

    for member in members {
        // Non-mapping members have no top-level keys to contribute
        let Some(fields) = member.as_object() else {
            continue;
        };
        for (key, value) in fields {
            if key == "properties" {
                merge_properties(&mut result, value);
            } else {
                result.insert(key.clone(), value.clone());
            }
        }
    }

    Value::Object(result)
}

/// Key-union merge for `properties`: entries from `incoming` overwrite
/// same-named entries, keys absent from `incoming` survive.
fn merge_properties(result: &mut Map<String, Value>, incoming: &Value) {
    let Some(incoming_props) = incoming.as_object() else {
        result.insert("properties".to_string(), incoming.clone());
        return;
    };

    let merged = match result.get_mut("properties").and_then(Value::as_object_mut) {
        Some(existing) => {
            for (name, schema) in incoming_props {
                existing.insert(name.clone(), schema.clone());
            }
            return;
        }
        None => Value::Object(incoming_props.clone()),
    };
    result.insert("properties".to_string(), merged);
}
