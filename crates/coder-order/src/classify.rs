//! Value classifier
//!
//! Maps tree nodes and [`Value`]s to [`ValueKind`], the comparable view
//! used by ordering and duplicate detection. Classification is purely
//! structural: nothing is evaluated or resolved.

use crate::value::Value;
use coder_syntax::{NodeId, NodeKind, SyntaxTree, TreeError};

/// Classified value with its comparable payload
///
/// Equality and ordering follow [`compare`](crate::compare). `Opaque` is
/// never equal to anything, itself included.
#[derive(Debug, Clone, Copy)]
pub enum ValueKind<'a> {
    /// `null`
    Null,
    /// `false`
    False,
    /// `true`
    True,
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal (compared byte-wise)
    String(&'a str),
    /// `Name::class`
    ClassRef(&'a str),
    /// `Name::CONSTANT`
    ConstRef {
        /// Class name
        class: &'a str,
        /// Constant identifier
        constant: &'a str,
    },
    /// Anything else
    Opaque,
}

impl ValueKind<'_> {
    /// Check for the catch-all kind
    #[inline]
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        matches!(self, ValueKind::Opaque)
    }
}

/// Classify a node kind
#[must_use]
pub fn classify_kind(kind: &NodeKind) -> ValueKind<'_> {
    match kind {
        NodeKind::Null => ValueKind::Null,
        NodeKind::Bool(false) => ValueKind::False,
        NodeKind::Bool(true) => ValueKind::True,
        NodeKind::Int(i) => ValueKind::Int(*i),
        NodeKind::Float(x) => ValueKind::Float(*x),
        NodeKind::Str(s) => ValueKind::String(s),
        NodeKind::ClassRef { class } => ValueKind::ClassRef(class),
        NodeKind::ConstRef { class, constant } => ValueKind::ConstRef { class, constant },
        NodeKind::Array(_) | NodeKind::Raw(_) => ValueKind::Opaque,
    }
}

/// Classify the node `id` of `tree`
///
/// # Errors
/// Returns [`TreeError::UnknownNode`] if `id` is not in `tree`
#[inline]
pub fn classify(tree: &SyntaxTree, id: NodeId) -> Result<ValueKind<'_>, TreeError> {
    tree.kind(id).map(classify_kind)
}

impl Value {
    /// Classify the value the same way its node would be classified
    ///
    /// Opaque values stay opaque whatever their fragment holds.
    #[must_use]
    pub fn kind(&self) -> ValueKind<'_> {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(false) => ValueKind::False,
            Value::Bool(true) => ValueKind::True,
            Value::Int(i) => ValueKind::Int(*i),
            Value::Float(x) => ValueKind::Float(*x),
            Value::String(s) => ValueKind::String(s),
            Value::ClassRef(class) => ValueKind::ClassRef(class),
            Value::ConstRef { class, constant } => ValueKind::ConstRef { class, constant },
            Value::Opaque(_) => ValueKind::Opaque,
        }
    }
}
