//! Reference resolution - inlines local `$ref` pointers.
//!
//! [`resolve_pointer`] turns one `#/...` fragment pointer into the concrete
//! content it names, chasing chained references (A→B→C resolves straight to
//! C's content). [`dereference`] applies that resolution across a scoped
//! subtree of a document, honoring ignore paths, and returns a rebuilt
//! document with the resolved subtree spliced back in.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::DerefError;
use crate::path::{self, Step};
use crate::types::{ref_target, DerefOptions};
use crate::walker::{walk, WalkContext};

/// Dereference every `$ref` reachable from the scope selected by
/// `options.start_at`, excluding subtrees matched by `options.ignore`.
///
/// Pointers always resolve against the original, unmodified `document`, so
/// a reference's target is never itself mid-transform. The input is never
/// mutated; the result is a brand-new tree.
///
/// # Errors
///
/// - `ScopeNotFound` if `start_at` matches nothing.
/// - `InvalidPath` if `start_at` or an ignore expression is malformed.
/// - `InvalidPointer`, `Unresolvable`, or `CycleDetected` from pointer
///   resolution; any of these aborts the whole call.
/// - `DepthExceeded` if the walk overruns `options.max_depth`.
pub fn dereference(document: &Value, options: &DerefOptions) -> Result<Value, DerefError> {
    let matches = path::select_with_paths(document, &options.start_at)?;
    let Some((scope_path, scope_node)) = matches.into_iter().next() else {
        return Err(DerefError::ScopeNotFound {
            path: options.start_at.clone(),
        });
    };

    // Ignore expressions are evaluated against the full document, never
    // the scope, so exclusion paths are absolute.
    let mut excluded: HashSet<Vec<Step>> = HashSet::new();
    for expr in &options.ignore {
        for (matched_path, _) in path::select_with_paths(document, expr)? {
            excluded.insert(matched_path);
        }
    }

    let ctx = WalkContext {
        excluded: &excluded,
        max_depth: options.max_depth,
    };
    let mut transform = |node: &Value, _: &[Step]| -> Result<Value, DerefError> {
        match ref_target(node) {
            Some(pointer) => resolve_pointer(pointer, document),
            None => Ok(node.clone()),
        }
    };

    let mut walk_path = scope_path.clone();
    let resolved = walk(scope_node, &mut walk_path, &ctx, &mut transform)?;

    Ok(path::splice_at(document, &scope_path, &resolved))
}

/// Resolve one local fragment pointer (`#/seg1/seg2/...`) against `root`.
///
/// If the target is itself a reference node it is chased, so multi-hop
/// indirection resolves directly to concrete content. `#` and `#/` name the
/// whole root.
///
/// # Errors
///
/// - `InvalidPointer` if `pointer` is not a local fragment pointer.
/// - `Unresolvable` if any segment is missing from `root`; the error
///   carries the literal pointer string.
/// - `CycleDetected` if a chain revisits a pointer.
pub fn resolve_pointer(pointer: &str, root: &Value) -> Result<Value, DerefError> {
    let mut chain = Vec::new();
    resolve_chained(pointer, root, &mut chain)
}

// --- Internal implementation ---

fn resolve_chained(
    pointer: &str,
    root: &Value,
    chain: &mut Vec<String>,
) -> Result<Value, DerefError> {
    if chain.iter().any(|seen| seen == pointer) {
        return Err(DerefError::CycleDetected {
            pointer: pointer.to_string(),
        });
    }
    chain.push(pointer.to_string());

    let target = lookup(pointer, root)?;
    match ref_target(target) {
        Some(next) => resolve_chained(next, root, chain),
        None => Ok(target.clone()),
    }
}

fn lookup<'a>(pointer: &str, root: &'a Value) -> Result<&'a Value, DerefError> {
    let Some(fragment) = pointer.strip_prefix('#') else {
        return Err(DerefError::InvalidPointer {
            pointer: pointer.to_string(),
        });
    };

    let fragment = fragment.trim_start_matches('/');
    if fragment.is_empty() {
        return Ok(root);
    }

    let mut current = root;
    for part in fragment.split('/') {
        // Unescape JSON Pointer encoding (~1 = /, ~0 = ~)
        let key = part.replace("~1", "/").replace("~0", "~");
        let child = match current {
            Value::Object(map) => map.get(&key),
            Value::Array(arr) => key.parse::<usize>().ok().and_then(|i| arr.get(i)),
            _ => None,
        };
        current = child.ok_or_else(|| DerefError::Unresolvable {
            pointer: pointer.to_string(),
        })?;
    }
    Ok(current)
}
