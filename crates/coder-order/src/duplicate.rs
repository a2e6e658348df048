//! Duplicate detection

use crate::classify::{classify, ValueKind};
use coder_syntax::{NodeId, SyntaxTree, TreeError};

/// Position of the first entry of `container` whose value equals
/// `candidate`, keyed entries compared by their value
///
/// Opaque candidates never match.
///
/// # Errors
/// Returns [`TreeError`] if `container` is not an array of this tree
pub fn find_duplicate(
    tree: &SyntaxTree,
    container: NodeId,
    candidate: &ValueKind<'_>,
) -> Result<Option<usize>, TreeError> {
    if candidate.is_opaque() {
        return Ok(None);
    }
    for (index, entry) in tree.array(container)?.entries().iter().enumerate() {
        if classify(tree, entry.value)? == *candidate {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Check whether `candidate` is already present in `container`
///
/// # Errors
/// Same as [`find_duplicate`]
#[inline]
pub fn exists(tree: &SyntaxTree, container: NodeId, candidate: &ValueKind<'_>) -> Result<bool, TreeError> {
    find_duplicate(tree, container, candidate).map(|found| found.is_some())
}
