//! Entry points
//!
//! Locate a target array, walk the path below it, insert the value.

use crate::error::CoderResult;
use crate::insertion::insert;
use crate::locator::{locate_property, locate_return, MethodMatcher};
use crate::navigator::resolve;
use crate::value::Value;
use coder_syntax::{ArrayPath, SyntaxTree};

/// Whether an entry point changed the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Value inserted, arrays possibly created on the way
    Modified,
    /// Value already present; tree untouched
    Unchanged,
}

impl Outcome {
    /// Check for [`Outcome::Modified`]
    #[inline]
    #[must_use]
    pub fn is_modified(self) -> bool {
        self == Outcome::Modified
    }
}

/// Insert `value` into the array held by property `property`, at `path`
///
/// # Errors
/// - [`CoderError::UnsupportedValueShape`](crate::CoderError::UnsupportedValueShape)
///   for invalid values, before the tree is touched
/// - [`CoderError::TargetNotFound`](crate::CoderError::TargetNotFound) if
///   the property is not declared
/// - [`CoderError::ShapeMismatch`](crate::CoderError::ShapeMismatch) if the
///   initializer or a value on the path is not an array
pub fn insert_into_property_array(
    tree: &mut SyntaxTree,
    property: &str,
    path: &ArrayPath,
    value: &Value,
) -> CoderResult<Outcome> {
    value.validate()?;
    let before = tree.len();
    let root = locate_property(tree, property)?;
    apply(tree, root, path, value, before)
}

/// Insert `value` into the array returned by the method `matcher` selects,
/// at `path`
///
/// # Errors
/// Same as [`insert_into_property_array`]; a matched method without
/// return statement is also `TargetNotFound`.
pub fn insert_into_return_array<M>(
    tree: &mut SyntaxTree,
    matcher: &M,
    path: &ArrayPath,
    value: &Value,
) -> CoderResult<Outcome>
where
    M: MethodMatcher + ?Sized,
{
    value.validate()?;
    let before = tree.len();
    let root = locate_return(tree, matcher)?;
    apply(tree, root, path, value, before)
}

fn apply(
    tree: &mut SyntaxTree,
    root: coder_syntax::NodeId,
    path: &ArrayPath,
    value: &Value,
    before: usize,
) -> CoderResult<Outcome> {
    let container = resolve(tree, root, path)?;
    insert(tree, container, value)?;
    // Every change allocates at least one node
    Ok(if tree.len() > before {
        Outcome::Modified
    } else {
        Outcome::Unchanged
    })
}
