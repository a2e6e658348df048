//! Testing utilities for the coder workspace
//!
//! Tree builders, fixtures and proptest strategies.

#![allow(missing_docs)]

use coder_order::Value;
use coder_syntax::{
    ArrayNode, ArrayStyle, Declaration, Entry, Layout, MethodDecl, MethodSignature, NodeId, PropertyDecl,
    SyntaxTree, ValueSlot,
};

/// Node for `value`, grafted when opaque
pub fn value_node(tree: &mut SyntaxTree, value: &Value) -> NodeId {
    match value {
        Value::Opaque(fragment) => tree.graft(fragment.tree(), fragment.root()).unwrap(),
        other => tree.alloc_kind(other.to_node_kind().unwrap()),
    }
}

/// Array of plain entries, as if read from source
pub fn array_in(tree: &mut SyntaxTree, values: &[Value]) -> NodeId {
    let entries = values.iter().map(|v| Entry::plain(value_node(tree, v))).collect();
    tree.alloc_kind(coder_syntax::NodeKind::Array(ArrayNode::with_entries(
        ArrayStyle::Short,
        Layout::Inline,
        entries,
    )))
}

pub fn array_of(values: &[Value]) -> (SyntaxTree, NodeId) {
    let mut tree = SyntaxTree::new();
    let array = array_in(&mut tree, values);
    (tree, array)
}

/// Tree declaring property `name` initialized with `values`
pub fn tree_with_property(name: &str, values: &[Value]) -> (SyntaxTree, NodeId) {
    let (mut tree, array) = array_of(values);
    tree.add_declaration(Declaration::Property(PropertyDecl {
        class: Some("Fixture".into()),
        name: name.into(),
        slot: ValueSlot::detached(Some(array)),
    }));
    (tree, array)
}

/// Tree declaring method `name` returning `values`
pub fn tree_with_method(name: &str, values: &[Value]) -> (SyntaxTree, NodeId) {
    let (mut tree, array) = array_of(values);
    tree.add_declaration(Declaration::Method(MethodDecl {
        class: Some("Fixture".into()),
        signature: MethodSignature::new(name),
        returns: vec![ValueSlot::detached(Some(array))],
    }));
    (tree, array)
}

/// Compact rendering of each entry of `array`
pub fn rendered_entries(tree: &SyntaxTree, array: NodeId) -> Vec<String> {
    tree.array(array)
        .unwrap()
        .entries()
        .iter()
        .map(|entry| match entry.key {
            Some(key) => format!("{} => {}", tree.display(key), tree.display(entry.value)),
            None => tree.display(entry.value).to_string(),
        })
        .collect()
}

pub mod strategies {
    //! Proptest strategies for values

    use coder_order::Value;
    use proptest::prelude::*;

    /// Finite floats with an exact binary representation
    pub fn float() -> impl Strategy<Value = f64> {
        (-40i32..40).prop_map(|i| f64::from(i) / 4.0)
    }

    /// Any literal value
    pub fn typed_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-20i64..20).prop_map(Value::Int),
            float().prop_map(Value::Float),
            "[a-c]{0,3}".prop_map(Value::String),
            prop::sample::select(vec!["Foo", "Bar", "\\Foo\\Bar"]).prop_map(|c| Value::ClassRef(c.to_string())),
            (
                prop::sample::select(vec!["Foo", "self"]),
                prop::sample::select(vec!["A", "B", "MAX"]),
            )
                .prop_map(|(class, constant)| Value::class_constant(class, constant)),
        ]
    }

    /// Opaque expression
    pub fn opaque_value() -> impl Strategy<Value = Value> {
        prop::sample::select(vec!["foo()", "$this->bar", "[1, 2]", "self::make()"]).prop_map(Value::code)
    }

    /// Literal or, less often, opaque value
    pub fn value() -> impl Strategy<Value = Value> {
        prop_oneof![
            4 => typed_value(),
            1 => opaque_value(),
        ]
    }
}
