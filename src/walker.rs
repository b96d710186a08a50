//! Generic pre-order substitution walk over a document tree.
//!
//! The walk offers each node to a transform, then recurses into the
//! (possibly replaced) node's children and rebuilds the parent from the
//! results. Mappings are enumerated in insertion order, sequences in index
//! order; no key or index is visited twice. Nodes whose concrete path is in
//! the exclusion set are returned verbatim without recursing.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::DerefError;
use crate::path::{path_to_string, Step};

/// Shared walk state: exclusion paths (absolute, from the document root)
/// and the nesting-depth budget.
pub(crate) struct WalkContext<'a> {
    pub excluded: &'a HashSet<Vec<Step>>,
    pub max_depth: usize,
}

/// Walk `node`, applying `transform` pre-order, and return the rebuilt tree.
///
/// `path` is the node's concrete path from the document root; it is
/// extended and restored around each child so exclusion paths compare
/// against absolute positions even when the walk starts below the root.
pub(crate) fn walk<F>(
    node: &Value,
    path: &mut Vec<Step>,
    ctx: &WalkContext,
    transform: &mut F,
) -> Result<Value, DerefError>
where
    F: FnMut(&Value, &[Step]) -> Result<Value, DerefError>,
{
    walk_at_depth(node, path, 0, ctx, transform)
}

fn walk_at_depth<F>(
    node: &Value,
    path: &mut Vec<Step>,
    depth: usize,
    ctx: &WalkContext,
    transform: &mut F,
) -> Result<Value, DerefError>
where
    F: FnMut(&Value, &[Step]) -> Result<Value, DerefError>,
{
    if ctx.excluded.contains(path.as_slice()) {
        return Ok(node.clone());
    }
    if depth >= ctx.max_depth {
        return Err(DerefError::DepthExceeded {
            limit: ctx.max_depth,
            path: path_to_string(path),
        });
    }

    let replaced = transform(node, path)?;

    match replaced {
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, child) in map {
                path.push(Step::Key(key.clone()));
                let rebuilt = walk_at_depth(&child, path, depth + 1, ctx, transform)?;
                path.pop();
                out.insert(key, rebuilt);
            }
            Ok(Value::Object(out))
        }
        Value::Array(arr) => {
            let mut out = Vec::with_capacity(arr.len());
            for (index, child) in arr.iter().enumerate() {
                path.push(Step::Index(index));
                out.push(walk_at_depth(child, path, depth + 1, ctx, transform)?);
                path.pop();
            }
            Ok(Value::Array(out))
        }
        scalar => Ok(scalar),
    }
}
