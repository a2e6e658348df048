//! Container navigator
//!
//! Resolves an [`ArrayPath`] below a target array, creating missing
//! intermediate arrays on the way.

use crate::error::{CoderError, CoderResult};
use coder_syntax::{ArrayPath, Entry, NodeId, NodeKind, PathSegment, SyntaxTree};

/// Resolve `path` starting at `root`, returning the innermost array
///
/// A segment matches a string key exactly or an integer key numerically.
/// When a key occurs more than once the last occurrence wins, which is the
/// one the host language keeps at runtime. A missing key is appended as a
/// new keyed entry holding an empty array in the parent's style.
///
/// # Errors
/// - [`CoderError::ShapeMismatch`] if `root` or a value on the path is not
///   an array; the error path is the prefix leading to that value
/// - [`CoderError::Tree`] on dangling ids
pub fn resolve(tree: &mut SyntaxTree, root: NodeId, path: &ArrayPath) -> CoderResult<NodeId> {
    ensure_array(tree, root, &ArrayPath::root())?;

    let mut current = root;
    for (depth, segment) in path.iter().enumerate() {
        current = match find_keyed(tree, current, segment)? {
            Some(value) => {
                ensure_array(tree, value, &path.prefix(depth + 1))?;
                value
            }
            None => create_child(tree, current, segment)?,
        };
    }
    Ok(current)
}

/// Value of the last entry of `array` keyed by `segment`
///
/// # Errors
/// Returns [`CoderError::Tree`] if `array` is not an array of `tree`
pub fn find_keyed(tree: &SyntaxTree, array: NodeId, segment: &PathSegment) -> CoderResult<Option<NodeId>> {
    let mut found = None;
    for entry in tree.array(array)?.entries() {
        let Some(key) = entry.key else {
            continue;
        };
        let matches = match (tree.kind(key)?, segment) {
            (NodeKind::Str(k), PathSegment::Key(s)) => k == s,
            (NodeKind::Int(k), PathSegment::Index(i)) => k == i,
            _ => false,
        };
        if matches {
            found = Some(entry.value);
        }
    }
    Ok(found)
}

fn ensure_array(tree: &SyntaxTree, id: NodeId, at: &ArrayPath) -> CoderResult<()> {
    let kind = tree.kind(id)?;
    if kind.is_array() {
        Ok(())
    } else {
        Err(CoderError::shape_mismatch(at.clone(), kind.name()))
    }
}

fn create_child(tree: &mut SyntaxTree, parent: NodeId, segment: &PathSegment) -> CoderResult<NodeId> {
    let (style, layout) = {
        let array = tree.array(parent)?;
        (array.style(), array.layout().nested(tree.indent_unit()))
    };
    let key = tree.alloc_kind(match segment {
        PathSegment::Key(k) => NodeKind::Str(k.clone()),
        PathSegment::Index(i) => NodeKind::Int(*i),
    });
    let child = tree.create_array(style, layout);
    tree.push_entry(parent, Entry::keyed(key, child))?;
    tracing::debug!("Created array for key '{}' under {}", segment, parent);
    Ok(child)
}
