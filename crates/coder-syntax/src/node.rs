//! Arena nodes
//!
//! Provides [`NodeId`], [`Node`] and [`NodeKind`], the building blocks of
//! a [`SyntaxTree`](crate::SyntaxTree).

use std::fmt::{self, Display, Formatter};
use std::ops::Range;

/// Byte range in the source text a node was lowered from
pub type Span = Range<usize>;

/// Index of a node inside a [`SyntaxTree`](crate::SyntaxTree)
///
/// Ids are only meaningful for the tree that allocated them. Nodes are
/// never removed, so an id stays valid for the lifetime of its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shape of a node
///
/// Literal kinds carry their decoded payload. Anything the host could not
/// lower into one of them is kept as [`NodeKind::Raw`] source text.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer literal (sign folded in)
    Int(i64),
    /// Floating-point literal
    Float(f64),
    /// String literal, decoded
    Str(String),
    /// `Name::class`
    ClassRef {
        /// Class name as written
        class: String,
    },
    /// `Name::CONSTANT`
    ConstRef {
        /// Class name as written
        class: String,
        /// Constant identifier
        constant: String,
    },
    /// Array literal
    Array(ArrayNode),
    /// Expression kept verbatim
    Raw(String),
}

impl NodeKind {
    /// Short human-readable name of the kind
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Null => "null",
            NodeKind::Bool(_) => "bool",
            NodeKind::Int(_) => "int",
            NodeKind::Float(_) => "float",
            NodeKind::Str(_) => "string",
            NodeKind::ClassRef { .. } => "class reference",
            NodeKind::ConstRef { .. } => "constant reference",
            NodeKind::Array(_) => "array",
            NodeKind::Raw(_) => "expression",
        }
    }

    /// Check if this is an array literal
    #[inline]
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, NodeKind::Array(_))
    }

    /// Borrow as array
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            NodeKind::Array(array) => Some(array),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn as_array_mut(&mut self) -> Option<&mut ArrayNode> {
        match self {
            NodeKind::Array(array) => Some(array),
            _ => None,
        }
    }
}

/// One arena slot
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    origin: Option<Span>,
}

impl Node {
    /// Node built in memory
    #[inline]
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, origin: None }
    }

    /// Node lowered from `span` of the source text
    #[inline]
    #[must_use]
    pub fn with_origin(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            origin: Some(span),
        }
    }

    /// Node shape
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Source span, if the node came from source text
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Option<&Span> {
        self.origin.as_ref()
    }
}

/// Array literal syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayStyle {
    /// `[...]`
    #[default]
    Short,
    /// `array(...)`
    Long,
}

impl ArrayStyle {
    /// Opening and closing delimiters
    #[inline]
    #[must_use]
    pub fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            ArrayStyle::Short => ("[", "]"),
            ArrayStyle::Long => ("array(", ")"),
        }
    }
}

/// How entries of an array are laid out
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Layout {
    /// All entries on the line of the opening delimiter
    #[default]
    Inline,
    /// One entry per line
    Multiline {
        /// Whitespace in front of every entry
        indent: String,
        /// Whitespace in front of the closing delimiter
        closing: String,
    },
}

impl Layout {
    /// Layout for an array nested one level inside `self`
    #[must_use]
    pub fn nested(&self, unit: &str) -> Layout {
        match self {
            Layout::Inline => Layout::Inline,
            Layout::Multiline { indent, .. } => Layout::Multiline {
                indent: format!("{indent}{unit}"),
                closing: indent.clone(),
            },
        }
    }
}

/// Array entry, plain (`value`) or keyed (`key => value`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    /// Key node, if keyed
    pub key: Option<NodeId>,
    /// Value node
    pub value: NodeId,
}

impl Entry {
    /// Plain entry
    #[inline]
    #[must_use]
    pub fn plain(value: NodeId) -> Self {
        Self { key: None, value }
    }

    /// Keyed entry
    #[inline]
    #[must_use]
    pub fn keyed(key: NodeId, value: NodeId) -> Self {
        Self {
            key: Some(key),
            value,
        }
    }
}

/// Ordered entry list of an array literal
///
/// # Invariants
/// - Entry order is only changed by inserting new entries
/// - `dirty` is set once the entry list differs from the source text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayNode {
    entries: Vec<Entry>,
    style: ArrayStyle,
    layout: Layout,
    dirty: bool,
}

impl ArrayNode {
    /// Empty array as found in source
    #[inline]
    #[must_use]
    pub fn new(style: ArrayStyle, layout: Layout) -> Self {
        Self {
            entries: Vec::new(),
            style,
            layout,
            dirty: false,
        }
    }

    /// Array as found in source, with its entries
    #[inline]
    #[must_use]
    pub fn with_entries(style: ArrayStyle, layout: Layout, entries: Vec<Entry>) -> Self {
        Self {
            entries,
            style,
            layout,
            dirty: false,
        }
    }

    /// Entries in order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check for no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Delimiter style
    #[inline]
    #[must_use]
    pub fn style(&self) -> ArrayStyle {
        self.style
    }

    /// Entry layout
    #[inline]
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Check if the entry list changed since lowering
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn insert(&mut self, index: usize, entry: Entry) {
        self.entries.insert(index, entry);
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId::from_index(7).to_string(), "#7");
        assert_eq!(NodeId::from_index(7).index(), 7);
    }

    #[test]
    fn node_id_past_u32_range_stays_distinct() {
        let past = u32::MAX as usize + 1;
        assert_eq!(NodeId::from_index(past).index(), past);
        assert_ne!(NodeId::from_index(past), NodeId::from_index(past + 1));
        assert_ne!(NodeId::from_index(u32::MAX as usize), NodeId::from_index(past));
    }

    #[test]
    fn kind_names() {
        assert_eq!(NodeKind::Null.name(), "null");
        assert_eq!(NodeKind::Raw("foo()".into()).name(), "expression");
        assert_eq!(NodeKind::Array(ArrayNode::default()).name(), "array");
    }

    #[test]
    fn layout_nested() {
        let outer = Layout::Multiline {
            indent: "        ".into(),
            closing: "    ".into(),
        };
        assert_eq!(
            outer.nested("    "),
            Layout::Multiline {
                indent: "            ".into(),
                closing: "        ".into(),
            }
        );
        assert_eq!(Layout::Inline.nested("    "), Layout::Inline);
    }

    #[test]
    fn array_insert_marks_dirty() {
        let mut array = ArrayNode::new(ArrayStyle::Short, Layout::Inline);
        assert!(!array.is_dirty());
        array.insert(0, Entry::plain(NodeId::from_index(1)));
        assert!(array.is_dirty());
        assert_eq!(array.len(), 1);
    }

    #[test]
    fn style_delimiters() {
        assert_eq!(ArrayStyle::Short.delimiters(), ("[", "]"));
        assert_eq!(ArrayStyle::Long.delimiters(), ("array(", ")"));
    }
}
