//! Insertion engine
//!
//! Adds at most one element to an array: duplicates are skipped, typed
//! values go to their ordered slot, opaque values go to the end.

use crate::classify::{classify, ValueKind};
use crate::duplicate::find_duplicate;
use crate::error::{CoderError, CoderResult};
use crate::value::Value;
use coder_syntax::{Entry, NodeId, SyntaxTree};
use std::cmp::Ordering;

/// Result of a single insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionOutcome {
    /// New element placed at `index`
    Inserted {
        /// Entry position
        index: usize,
        /// New value node
        node: NodeId,
    },
    /// Equal element already present at `existing`
    SkippedDuplicate {
        /// Entry position of the equal element
        existing: usize,
    },
}

impl InsertionOutcome {
    /// Check if the array changed
    #[inline]
    #[must_use]
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertionOutcome::Inserted { .. })
    }
}

/// Insert `value` into `container`
///
/// Pre-existing entries are never moved or rewritten. The new element is
/// always a plain entry.
///
/// # Errors
/// - [`CoderError::UnsupportedValueShape`] if `value` fails [`Value::validate`]
/// - [`CoderError::Tree`] if `container` is not an array of `tree`
pub fn insert(tree: &mut SyntaxTree, container: NodeId, value: &Value) -> CoderResult<InsertionOutcome> {
    value.validate()?;
    let candidate = value.kind();

    if let Some(existing) = find_duplicate(tree, container, &candidate)? {
        tracing::debug!("Skipping duplicate of {:?} at entry {}", candidate, existing);
        return Ok(InsertionOutcome::SkippedDuplicate { existing });
    }

    let index = insertion_index(tree, container, &candidate)?;
    let node = build_node(tree, value)?;
    tree.insert_entry(container, index, Entry::plain(node))?;
    tracing::debug!("Inserted {} into {} at entry {}", tree.display(node), container, index);

    Ok(InsertionOutcome::Inserted { index, node })
}

/// Entry position for `candidate` in `container`
///
/// The first entry ordered strictly after the candidate, which for typed
/// candidates is at the latest the first opaque entry. Opaque candidates
/// go to the end.
///
/// # Errors
/// Returns [`CoderError::Tree`] if `container` is not an array of `tree`
pub fn insertion_index(tree: &SyntaxTree, container: NodeId, candidate: &ValueKind<'_>) -> CoderResult<usize> {
    let entries = tree.array(container)?.entries();
    if candidate.is_opaque() {
        return Ok(entries.len());
    }
    for (index, entry) in entries.iter().enumerate() {
        let existing = classify(tree, entry.value)?;
        if existing.partial_cmp(candidate) == Some(Ordering::Greater) {
            return Ok(index);
        }
    }
    Ok(entries.len())
}

fn build_node(tree: &mut SyntaxTree, value: &Value) -> CoderResult<NodeId> {
    if let Value::Opaque(fragment) = value {
        return Ok(tree.graft(fragment.tree(), fragment.root())?);
    }
    value
        .to_node_kind()
        .map(|kind| tree.alloc_kind(kind))
        .ok_or_else(|| CoderError::unsupported("value has no literal form"))
}
