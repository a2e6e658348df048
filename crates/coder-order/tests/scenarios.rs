//! End-to-end scenarios for ordered insertion

use coder_order::{
    insert, insert_into_property_array, insert_into_return_array, CoderError, InsertionOutcome, MethodQuery,
    Outcome, Value,
};
use coder_syntax::{
    ArrayNode, ArrayPath, ArrayStyle, Declaration, Entry, Layout, NodeKind, PropertyDecl, SyntaxTree, ValueSlot,
};
use coder_test_utils::{array_of, tree_with_method, tree_with_property};

#[test]
fn test_int_appended_after_smaller_scalars() {
    let (mut tree, array) = array_of(&[
        Value::Null,
        Value::Bool(false),
        Value::Bool(true),
        Value::Int(0),
        Value::Int(1),
    ]);
    let outcome = insert(&mut tree, array, &Value::Int(2)).unwrap();
    assert!(matches!(outcome, InsertionOutcome::Inserted { index: 5, .. }));
    assert_eq!(tree.display(array).to_string(), "[null, false, true, 0, 1, 2]");
}

#[test]
fn test_duplicate_int_skipped() {
    let (mut tree, array) = array_of(&[Value::Int(0), Value::Int(1), Value::Int(2)]);
    let before = tree.clone();
    let outcome = insert(&mut tree, array, &Value::Int(1)).unwrap();
    assert_eq!(outcome, InsertionOutcome::SkippedDuplicate { existing: 1 });
    assert_eq!(tree, before);
}

#[test]
fn test_string_inserted_before_opaque_tail() {
    let (mut tree, array) = array_of(&[Value::from("a"), Value::from("b")]);
    insert(&mut tree, array, &Value::code("foo()")).unwrap();
    assert_eq!(tree.display(array).to_string(), "['a', 'b', foo()]");

    insert(&mut tree, array, &Value::from("c")).unwrap();
    assert_eq!(tree.display(array).to_string(), "['a', 'b', 'c', foo()]");
}

#[test]
fn test_path_scaffolding_created() {
    let (mut tree, array) = tree_with_property("config", &[]);
    let path: ArrayPath = "x.y".parse().unwrap();
    let outcome = insert_into_property_array(&mut tree, "config", &path, &Value::Int(5)).unwrap();
    assert_eq!(outcome, Outcome::Modified);
    assert_eq!(tree.display(array).to_string(), "['x' => ['y' => [5]]]");
}

#[test]
fn test_missing_property_reported() {
    let (mut tree, _) = tree_with_property("items", &[Value::Int(1)]);
    let before = tree.clone();
    let result = insert_into_property_array(&mut tree, "missing", &ArrayPath::root(), &Value::Int(2));
    assert!(matches!(result, Err(CoderError::TargetNotFound(_))));
    assert_eq!(tree, before);
}

#[test]
fn test_cross_kind_order() {
    let (mut tree, array) = array_of(&[]);
    for value in [
        Value::code("foo()"),
        Value::class_constant("Foo", "BAR"),
        Value::ClassRef("Foo".into()),
        Value::from("s"),
        Value::Float(1.5),
        Value::Int(7),
        Value::Bool(true),
        Value::Bool(false),
        Value::Null,
    ] {
        insert(&mut tree, array, &value).unwrap();
    }
    assert_eq!(
        tree.display(array).to_string(),
        "[null, false, true, 7, 1.5, 's', Foo::class, Foo::BAR, foo()]"
    );
}

#[test]
fn test_return_array_second_run_unchanged() {
    let (mut tree, array) = tree_with_method("rules", &[Value::from("email")]);
    let query = MethodQuery::new("rules");
    let path: ArrayPath = "levels.0".parse().unwrap();

    let first = insert_into_return_array(&mut tree, &query, &path, &Value::Int(3)).unwrap();
    let snapshot = tree.clone();
    let second = insert_into_return_array(&mut tree, &query, &path, &Value::Int(3)).unwrap();

    assert_eq!(first, Outcome::Modified);
    assert_eq!(second, Outcome::Unchanged);
    assert_eq!(tree, snapshot);
    assert_eq!(tree.display(array).to_string(), "['email', 'levels' => [0 => [3]]]");
}

#[test]
fn test_shape_mismatch_on_scalar_path() {
    let mut tree = SyntaxTree::new();
    let key = tree.alloc_kind(NodeKind::Str("x".into()));
    let three = tree.alloc_kind(NodeKind::Int(3));
    let array = tree.alloc_kind(NodeKind::Array(ArrayNode::with_entries(
        ArrayStyle::Short,
        Layout::Inline,
        vec![Entry::keyed(key, three)],
    )));
    tree.add_declaration(Declaration::Property(PropertyDecl {
        class: None,
        name: "config".into(),
        slot: ValueSlot::detached(Some(array)),
    }));
    let before = tree.clone();

    let path: ArrayPath = "x.y".parse().unwrap();
    assert_eq!(
        insert_into_property_array(&mut tree, "config", &path, &Value::Int(1)),
        Err(CoderError::shape_mismatch(ArrayPath::single("x"), "int"))
    );
    assert_eq!(tree, before);
}
