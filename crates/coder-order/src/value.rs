//! Values to insert
//!
//! Provides [`Value`], the caller-supplied element, and [`Fragment`], a
//! pre-built host expression carried verbatim.

use crate::error::CoderError;
use coder_syntax::{NodeId, NodeKind, SyntaxTree};

/// Pre-built expression owned by its own small tree
///
/// # Invariants
/// - `root` is a node of `tree`
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    tree: SyntaxTree,
    root: NodeId,
}

impl Fragment {
    /// Wrap `root` of `tree`
    ///
    /// # Errors
    /// Returns [`CoderError::UnsupportedValueShape`] if `root` is not in `tree`
    pub fn new(tree: SyntaxTree, root: NodeId) -> Result<Self, CoderError> {
        if tree.node(root).is_err() {
            return Err(CoderError::unsupported(format!(
                "fragment root {root} is not part of its tree"
            )));
        }
        Ok(Self { tree, root })
    }

    /// Fragment holding a single node
    #[must_use]
    pub fn from_kind(kind: NodeKind) -> Self {
        let mut tree = SyntaxTree::new();
        let root = tree.alloc_kind(kind);
        Self { tree, root }
    }

    /// Fragment holding verbatim expression text
    #[inline]
    #[must_use]
    pub fn raw(code: impl Into<String>) -> Self {
        Self::from_kind(NodeKind::Raw(code.into()))
    }

    /// Owning tree
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Root node
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }
}

/// Value to insert into an array
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point (must be finite)
    Float(f64),
    /// String
    String(String),
    /// `Name::class`
    ClassRef(String),
    /// `Name::CONSTANT`
    ConstRef {
        /// Class name
        class: String,
        /// Constant identifier
        constant: String,
    },
    /// Expression inserted as-is, never ordered or deduplicated
    Opaque(Fragment),
}

impl Value {
    /// Reference to `class::constant`
    ///
    /// A constant named `class` (any case) yields [`Value::ClassRef`].
    #[must_use]
    pub fn class_constant(class: impl Into<String>, constant: impl Into<String>) -> Self {
        let constant = constant.into();
        if constant.eq_ignore_ascii_case("class") {
            Self::ClassRef(class.into())
        } else {
            Self::ConstRef {
                class: class.into(),
                constant,
            }
        }
    }

    /// Opaque verbatim expression
    #[inline]
    #[must_use]
    pub fn code(code: impl Into<String>) -> Self {
        Self::Opaque(Fragment::raw(code))
    }

    /// Check the value can be built into an element
    ///
    /// # Errors
    /// Returns [`CoderError::UnsupportedValueShape`] for non-finite floats,
    /// malformed class names or constant identifiers, and empty verbatim code
    pub fn validate(&self) -> Result<(), CoderError> {
        match self {
            Value::Float(x) if !x.is_finite() => Err(CoderError::unsupported(format!(
                "float {x} has no literal form"
            ))),
            Value::ClassRef(class) => validate_class_name(class),
            Value::ConstRef { class, constant } => {
                validate_class_name(class)?;
                if is_identifier(constant) {
                    Ok(())
                } else {
                    Err(CoderError::unsupported(format!(
                        "invalid constant name '{constant}'"
                    )))
                }
            }
            Value::Opaque(fragment) => match fragment.tree().kind(fragment.root()) {
                Ok(NodeKind::Raw(code)) if code.trim().is_empty() => {
                    Err(CoderError::unsupported("empty code fragment"))
                }
                Ok(_) => Ok(()),
                Err(e) => Err(CoderError::unsupported(e.to_string())),
            },
            _ => Ok(()),
        }
    }

    /// Node shape for this value; `None` for opaque values, which are
    /// grafted from their fragment instead
    #[must_use]
    pub fn to_node_kind(&self) -> Option<NodeKind> {
        Some(match self {
            Value::Null => NodeKind::Null,
            Value::Bool(b) => NodeKind::Bool(*b),
            Value::Int(i) => NodeKind::Int(*i),
            Value::Float(x) => NodeKind::Float(*x),
            Value::String(s) => NodeKind::Str(s.clone()),
            Value::ClassRef(class) => NodeKind::ClassRef {
                class: class.clone(),
            },
            Value::ConstRef { class, constant } => NodeKind::ConstRef {
                class: class.clone(),
                constant: constant.clone(),
            },
            Value::Opaque(_) => return None,
        })
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Fragment> for Value {
    fn from(fragment: Fragment) -> Self {
        Self::Opaque(fragment)
    }
}

fn validate_class_name(class: &str) -> Result<(), CoderError> {
    let name = class.strip_prefix('\\').unwrap_or(class);
    if !name.is_empty() && name.split('\\').all(is_identifier) {
        Ok(())
    } else {
        Err(CoderError::unsupported(format!("invalid class name '{class}'")))
    }
}

/// PHP label: `[a-zA-Z_\x80-\xff][a-zA-Z0-9_\x80-\xff]*`
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric() || !c.is_ascii())
}
