//! Target locator
//!
//! Finds the array a property initializer or a method return holds,
//! using the declaration table the host registered in the tree.

use crate::error::{CoderError, CoderResult};
use coder_syntax::{
    ArrayPath, ArrayStyle, Declaration, Layout, MethodSignature, NodeId, SyntaxTree, ValueSlot, Visibility,
};
use std::fmt::{self, Display, Formatter};

/// Predicate selecting a method declaration
pub trait MethodMatcher {
    /// Check a method signature
    fn matches(&self, signature: &MethodSignature) -> bool;

    /// Human-readable description used in errors
    fn describe(&self) -> String {
        "matching the given predicate".to_string()
    }
}

impl<F> MethodMatcher for F
where
    F: Fn(&MethodSignature) -> bool,
{
    fn matches(&self, signature: &MethodSignature) -> bool {
        self(signature)
    }
}

/// Method matcher by name and optional signature constraints
///
/// Names compare case-insensitively, like method names in PHP.
///
/// # Example
///
/// ```rust
/// use coder_order::{MethodMatcher, MethodQuery};
/// use coder_syntax::{MethodSignature, Visibility};
///
/// let query = MethodQuery::new("rules").visibility(Visibility::Public);
/// assert!(query.matches(&MethodSignature::new("Rules")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodQuery {
    name: String,
    visibility: Option<Visibility>,
    is_static: Option<bool>,
    parameters: Option<Vec<String>>,
}

impl MethodQuery {
    /// Match any method called `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: None,
            is_static: None,
            parameters: None,
        }
    }

    /// Require a visibility
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Require the method to be static or not
    #[must_use]
    pub fn is_static(mut self, is_static: bool) -> Self {
        self.is_static = Some(is_static);
        self
    }

    /// Require exactly these parameter names, in order
    #[must_use]
    pub fn parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = Some(parameters.into_iter().map(Into::into).collect());
        self
    }

    /// Method name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl MethodMatcher for MethodQuery {
    fn matches(&self, signature: &MethodSignature) -> bool {
        signature.name.eq_ignore_ascii_case(&self.name)
            && self.visibility.map_or(true, |v| v == signature.visibility)
            && self.is_static.map_or(true, |s| s == signature.is_static)
            && self
                .parameters
                .as_ref()
                .map_or(true, |p| *p == signature.parameters)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl Display for MethodQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.name)?;
        if let Some(visibility) = self.visibility {
            write!(f, " {visibility}")?;
        }
        if let Some(is_static) = self.is_static {
            f.write_str(if is_static { " static" } else { " non-static" })?;
        }
        if let Some(parameters) = &self.parameters {
            let names: Vec<String> = parameters.iter().map(|p| format!("${p}")).collect();
            write!(f, " ({})", names.join(", "))?;
        }
        Ok(())
    }
}

/// Array held by the initializer of property `name`
///
/// The first property declared with exactly this name is used. A property
/// without initializer gets a new empty array.
///
/// # Errors
/// - [`CoderError::TargetNotFound`] if no such property is declared
/// - [`CoderError::ShapeMismatch`] if the initializer is not an array
pub fn locate_property(tree: &mut SyntaxTree, name: &str) -> CoderResult<NodeId> {
    let position = tree
        .declarations()
        .iter()
        .position(|decl| matches!(decl, Declaration::Property(p) if p.name == name))
        .ok_or_else(|| CoderError::property_not_found(name))?;

    let current = match &tree.declarations()[position] {
        Declaration::Property(p) => p.slot.value,
        Declaration::Method(_) => None,
    };
    match current {
        Some(value) => expect_array(tree, value),
        None => {
            let array = tree.create_array(ArrayStyle::Short, Layout::Inline);
            if let Declaration::Property(p) = &mut tree.declarations_mut()[position] {
                p.slot.value = Some(array);
            }
            tracing::debug!("Created initializer for property '${}'", name);
            Ok(array)
        }
    }
}

/// Array returned by the first method `matcher` accepts
///
/// Among its return statements the first one returning an array literal
/// wins. Failing that, the first bare `return;` is given a new empty
/// array.
///
/// # Errors
/// - [`CoderError::TargetNotFound`] if no method matches or the method has
///   no return statement
/// - [`CoderError::ShapeMismatch`] if every return has a non-array operand
pub fn locate_return<M>(tree: &mut SyntaxTree, matcher: &M) -> CoderResult<NodeId>
where
    M: MethodMatcher + ?Sized,
{
    let (position, slot) = {
        let (position, method) = tree
            .declarations()
            .iter()
            .enumerate()
            .find_map(|(i, decl)| match decl {
                Declaration::Method(m) if matcher.matches(&m.signature) => Some((i, m)),
                _ => None,
            })
            .ok_or_else(|| CoderError::method_not_found(matcher.describe()))?;

        if method.returns.is_empty() {
            return Err(CoderError::return_not_found(&method.signature.name));
        }
        if let Some(array) = first_array(tree, &method.returns) {
            return Ok(array);
        }
        match method.returns.iter().position(|slot| slot.value.is_none()) {
            Some(slot) => (position, slot),
            None => {
                let found = method.returns[0]
                    .value
                    .map_or(Ok("nothing"), |id| tree.kind(id).map(|kind| kind.name()))?;
                return Err(CoderError::shape_mismatch(ArrayPath::root(), found));
            }
        }
    };

    let array = tree.create_array(ArrayStyle::Short, Layout::Inline);
    if let Declaration::Method(m) = &mut tree.declarations_mut()[position] {
        m.returns[slot].value = Some(array);
        tracing::debug!("Created return value for method '{}'", m.signature.name);
    }
    Ok(array)
}

fn first_array(tree: &SyntaxTree, returns: &[ValueSlot]) -> Option<NodeId> {
    returns
        .iter()
        .filter_map(|slot| slot.value)
        .find(|&id| tree.kind(id).is_ok_and(|kind| kind.is_array()))
}

fn expect_array(tree: &SyntaxTree, id: NodeId) -> CoderResult<NodeId> {
    let kind = tree.kind(id)?;
    if kind.is_array() {
        Ok(id)
    } else {
        Err(CoderError::shape_mismatch(ArrayPath::root(), kind.name()))
    }
}
