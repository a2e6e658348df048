//! Coder Syntax
//!
//! Index-addressed syntax tree shared between a host language adapter and
//! the ordered-insertion engine.
//!
//! # Core Concepts
//!
//! - [`SyntaxTree`]: arena of [`Node`]s addressed by [`NodeId`]
//! - [`NodeKind`]: literal payloads, array literals and verbatim expressions
//! - [`Declaration`]: properties and methods the host found, with the
//!   [`ValueSlot`]s holding their array values
//! - [`ArrayPath`]: keys leading from a target array to a nested one
//!
//! # Example
//!
//! ```rust
//! use coder_syntax::{ArrayNode, ArrayStyle, Entry, Layout, NodeKind, SyntaxTree};
//!
//! let mut tree = SyntaxTree::new();
//! let one = tree.alloc_kind(NodeKind::Int(1));
//! let array = tree.alloc_kind(NodeKind::Array(ArrayNode::with_entries(
//!     ArrayStyle::Short,
//!     Layout::Inline,
//!     vec![Entry::plain(one)],
//! )));
//! assert_eq!(tree.display(array).to_string(), "[1]");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod decl;
mod node;
mod path;
mod tree;

// Re-exports
pub use decl::{
    Anchor, Declaration, MethodDecl, MethodSignature, PropertyDecl, UnknownVisibility, ValueSlot,
    Visibility,
};
pub use node::{ArrayNode, ArrayStyle, Entry, Layout, Node, NodeId, NodeKind, Span};
pub use path::{ArrayPath, PathError, PathSegment};
pub use tree::{DisplayNode, SyntaxTree, TreeError, DEFAULT_INDENT_UNIT};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
