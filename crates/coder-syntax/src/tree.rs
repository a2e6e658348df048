//! Arena syntax tree
//!
//! Provides [`SyntaxTree`], an index-addressed arena of [`Node`]s plus the
//! declaration table the host filled while lowering its own syntax.

use crate::decl::Declaration;
use crate::node::{ArrayNode, ArrayStyle, Entry, Layout, Node, NodeId, NodeKind, Span};
use std::fmt::{self, Display, Formatter};

/// Default indentation unit when the host could not detect one
pub const DEFAULT_INDENT_UNIT: &str = "    ";

/// Index-addressed syntax tree
///
/// # Invariants
/// - Every [`NodeId`] stored inside the tree points into `nodes`
/// - Nodes are only appended, never removed or moved
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    declarations: Vec<Declaration>,
    indent_unit: String,
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxTree {
    /// Create empty tree
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            declarations: Vec::new(),
            indent_unit: DEFAULT_INDENT_UNIT.to_string(),
        }
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check for no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Append a node built in memory
    #[inline]
    pub fn alloc_kind(&mut self, kind: NodeKind) -> NodeId {
        self.alloc(Node::new(kind))
    }

    /// Append a node lowered from `span`
    #[inline]
    pub fn alloc_with_origin(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.alloc(Node::with_origin(kind, span))
    }

    /// Create a new, empty array that is not backed by source text
    pub fn create_array(&mut self, style: ArrayStyle, layout: Layout) -> NodeId {
        let mut array = ArrayNode::new(style, layout);
        array.mark_dirty();
        self.alloc_kind(NodeKind::Array(array))
    }

    /// Look up a node
    ///
    /// # Errors
    /// Returns [`TreeError::UnknownNode`] if `id` is not in this tree
    #[inline]
    pub fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(id.index()).ok_or(TreeError::UnknownNode(id))
    }

    /// Look up a node's kind
    ///
    /// # Errors
    /// Returns [`TreeError::UnknownNode`] if `id` is not in this tree
    #[inline]
    pub fn kind(&self, id: NodeId) -> Result<&NodeKind, TreeError> {
        self.node(id).map(Node::kind)
    }

    /// Look up an array node
    ///
    /// # Errors
    /// - [`TreeError::UnknownNode`] if `id` is not in this tree
    /// - [`TreeError::NotAnArray`] if the node is not an array
    pub fn array(&self, id: NodeId) -> Result<&ArrayNode, TreeError> {
        let kind = self.kind(id)?;
        kind.as_array().ok_or(TreeError::NotAnArray {
            id,
            found: kind.name(),
        })
    }

    /// Mutable access to an array node
    ///
    /// # Errors
    /// Same as [`SyntaxTree::array`]
    pub fn array_mut(&mut self, id: NodeId) -> Result<&mut ArrayNode, TreeError> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(TreeError::UnknownNode(id))?;
        let found = node.kind().name();
        node.kind_mut()
            .as_array_mut()
            .ok_or(TreeError::NotAnArray { id, found })
    }

    /// Insert `entry` into `array` at `index`
    ///
    /// # Errors
    /// - [`TreeError::UnknownNode`] if any id is not in this tree
    /// - [`TreeError::NotAnArray`] if `array` is not an array
    /// - [`TreeError::IndexOutOfBounds`] if `index > len`
    pub fn insert_entry(&mut self, array: NodeId, index: usize, entry: Entry) -> Result<(), TreeError> {
        self.check_entry(&entry)?;
        let node = self.array_mut(array)?;
        if index > node.len() {
            return Err(TreeError::IndexOutOfBounds {
                index,
                len: node.len(),
            });
        }
        node.insert(index, entry);
        Ok(())
    }

    /// Append `entry` at the end of `array`
    ///
    /// # Errors
    /// Same as [`SyntaxTree::insert_entry`], minus the bounds check
    pub fn push_entry(&mut self, array: NodeId, entry: Entry) -> Result<(), TreeError> {
        let len = self.array(array)?.len();
        self.insert_entry(array, len, entry)
    }

    fn check_entry(&self, entry: &Entry) -> Result<(), TreeError> {
        if let Some(key) = entry.key {
            self.node(key)?;
        }
        self.node(entry.value)?;
        Ok(())
    }

    /// Deep-copy the subtree at `root` of `other` into this tree
    ///
    /// Copied nodes lose their source origin, since it refers to another
    /// text. Returns the id of the copied root.
    ///
    /// # Errors
    /// Returns [`TreeError::UnknownNode`] if `other` has dangling ids
    pub fn graft(&mut self, other: &SyntaxTree, root: NodeId) -> Result<NodeId, TreeError> {
        let kind = match other.kind(root)? {
            NodeKind::Array(array) => {
                let mut entries = Vec::with_capacity(array.len());
                for entry in array.entries() {
                    let key = entry.key.map(|k| self.graft(other, k)).transpose()?;
                    let value = self.graft(other, entry.value)?;
                    entries.push(Entry { key, value });
                }
                NodeKind::Array(ArrayNode::with_entries(
                    array.style(),
                    array.layout().clone(),
                    entries,
                ))
            }
            kind => kind.clone(),
        };
        Ok(self.alloc_kind(kind))
    }

    /// Check whether `id` has to be printed from the tree rather than
    /// copied from source: it has no origin, or it is an array whose
    /// entries changed, or one of its descendants needs rendering.
    #[must_use]
    pub fn needs_render(&self, id: NodeId) -> bool {
        let Ok(node) = self.node(id) else {
            return false;
        };
        if node.origin().is_none() {
            return true;
        }
        match node.kind() {
            NodeKind::Array(array) => {
                array.is_dirty()
                    || array.entries().iter().any(|entry| {
                        entry.key.is_some_and(|k| self.needs_render(k)) || self.needs_render(entry.value)
                    })
            }
            _ => false,
        }
    }

    /// Registered declarations, in source order
    #[inline]
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Mutable declarations
    #[inline]
    pub fn declarations_mut(&mut self) -> &mut [Declaration] {
        &mut self.declarations
    }

    /// Register a declaration
    #[inline]
    pub fn add_declaration(&mut self, declaration: Declaration) {
        self.declarations.push(declaration);
    }

    /// Indentation unit used for nesting created arrays
    #[inline]
    #[must_use]
    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    /// Set indentation unit
    #[inline]
    pub fn set_indent_unit(&mut self, unit: impl Into<String>) {
        self.indent_unit = unit.into();
    }

    /// Compact one-line rendering of the subtree at `id`
    #[inline]
    #[must_use]
    pub fn display(&self, id: NodeId) -> DisplayNode<'_> {
        DisplayNode { tree: self, id }
    }
}

/// Compact one-line rendering of a subtree
///
/// Produced by [`SyntaxTree::display`]. Strings are single-quoted, arrays
/// use `[...]` regardless of their source style.
#[derive(Debug, Clone, Copy)]
pub struct DisplayNode<'a> {
    tree: &'a SyntaxTree,
    id: NodeId,
}

impl Display for DisplayNode<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Ok(kind) = self.tree.kind(self.id) else {
            return write!(f, "<{}>", self.id);
        };
        match kind {
            NodeKind::Null => f.write_str("null"),
            NodeKind::Bool(b) => write!(f, "{b}"),
            NodeKind::Int(i) => write!(f, "{i}"),
            NodeKind::Float(x) => write!(f, "{x:?}"),
            NodeKind::Str(s) => write_quoted(f, s),
            NodeKind::ClassRef { class } => write!(f, "{class}::class"),
            NodeKind::ConstRef { class, constant } => write!(f, "{class}::{constant}"),
            NodeKind::Raw(text) => f.write_str(text),
            NodeKind::Array(array) => {
                f.write_str("[")?;
                for (i, entry) in array.entries().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if let Some(key) = entry.key {
                        write!(f, "{} => ", self.tree.display(key))?;
                    }
                    write!(f, "{}", self.tree.display(entry.value))?;
                }
                f.write_str("]")
            }
        }
    }
}

fn write_quoted(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("'")
}

/// Errors related to tree access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Id does not belong to this tree
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    /// Node is not an array
    #[error("node {id} is {found}, not an array")]
    NotAnArray { id: NodeId, found: &'static str },

    /// Insertion index past the end
    #[error("entry index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (SyntaxTree, NodeId) {
        let mut tree = SyntaxTree::new();
        let one = tree.alloc_kind(NodeKind::Int(1));
        let text = tree.alloc_kind(NodeKind::Str("it's".into()));
        let key = tree.alloc_kind(NodeKind::Str("k".into()));
        let call = tree.alloc_kind(NodeKind::Raw("foo()".into()));
        let array = tree.alloc_kind(NodeKind::Array(ArrayNode::with_entries(
            ArrayStyle::Short,
            Layout::Inline,
            vec![Entry::plain(one), Entry::plain(text), Entry::keyed(key, call)],
        )));
        (tree, array)
    }

    #[test]
    fn display_compact() {
        let (tree, array) = sample();
        assert_eq!(tree.display(array).to_string(), "[1, 'it\\'s', 'k' => foo()]");
    }

    #[test]
    fn display_references() {
        let mut tree = SyntaxTree::new();
        let class = tree.alloc_kind(NodeKind::ClassRef { class: "Foo".into() });
        let constant = tree.alloc_kind(NodeKind::ConstRef {
            class: "Foo".into(),
            constant: "BAR".into(),
        });
        let float = tree.alloc_kind(NodeKind::Float(1.0));
        assert_eq!(tree.display(class).to_string(), "Foo::class");
        assert_eq!(tree.display(constant).to_string(), "Foo::BAR");
        assert_eq!(tree.display(float).to_string(), "1.0");
    }

    #[test]
    fn array_lookup_errors() {
        let (tree, array) = sample();
        let not_array = NodeId::from_index(0);
        assert!(tree.array(array).is_ok());
        assert_eq!(
            tree.array(not_array),
            Err(TreeError::NotAnArray {
                id: not_array,
                found: "int"
            })
        );
        let missing = NodeId::from_index(99);
        assert_eq!(tree.node(missing).err(), Some(TreeError::UnknownNode(missing)));
    }

    #[test]
    fn insert_entry_bounds() {
        let (mut tree, array) = sample();
        let value = tree.alloc_kind(NodeKind::Null);
        assert_eq!(
            tree.insert_entry(array, 4, Entry::plain(value)),
            Err(TreeError::IndexOutOfBounds { index: 4, len: 3 })
        );
        tree.insert_entry(array, 0, Entry::plain(value)).unwrap();
        assert_eq!(tree.display(array).to_string(), "[null, 1, 'it\\'s', 'k' => foo()]");
        assert!(tree.array(array).unwrap().is_dirty());
    }

    #[test]
    fn insert_entry_rejects_dangling_value() {
        let (mut tree, array) = sample();
        let dangling = NodeId::from_index(50);
        assert_eq!(
            tree.push_entry(array, Entry::plain(dangling)),
            Err(TreeError::UnknownNode(dangling))
        );
    }

    #[test]
    fn graft_copies_subtree() {
        let (fragment, root) = sample();
        let mut tree = SyntaxTree::new();
        tree.alloc_kind(NodeKind::Null);
        let copied = tree.graft(&fragment, root).unwrap();
        assert_eq!(tree.display(copied).to_string(), fragment.display(root).to_string());
        assert_eq!(tree.len(), 1 + fragment.len());
    }

    #[test]
    fn needs_render_tracks_dirty_descendants() {
        let mut tree = SyntaxTree::new();
        let inner = tree.alloc_with_origin(
            NodeKind::Array(ArrayNode::new(ArrayStyle::Short, Layout::Inline)),
            5..7,
        );
        let key = tree.alloc_with_origin(NodeKind::Str("x".into()), 1..4);
        let outer = tree.alloc_with_origin(
            NodeKind::Array(ArrayNode::with_entries(
                ArrayStyle::Short,
                Layout::Inline,
                vec![Entry::keyed(key, inner)],
            )),
            0..8,
        );
        assert!(!tree.needs_render(outer));

        let value = tree.alloc_kind(NodeKind::Int(5));
        tree.push_entry(inner, Entry::plain(value)).unwrap();
        assert!(tree.needs_render(inner));
        assert!(tree.needs_render(outer));
        assert!(!tree.needs_render(key));
    }

    #[test]
    fn created_array_is_dirty() {
        let mut tree = SyntaxTree::new();
        let array = tree.create_array(ArrayStyle::Long, Layout::Inline);
        assert!(tree.array(array).unwrap().is_dirty());
        assert_eq!(tree.array(array).unwrap().style(), ArrayStyle::Long);
    }
}
