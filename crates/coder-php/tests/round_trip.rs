//! Parse, insert and print PHP files

use coder_order::{insert_into_property_array, insert_into_return_array, CoderError, MethodQuery, Outcome, Value};
use coder_php::{parse_fragment, parse_source, render, ParseError};
use coder_syntax::{ArrayPath, Visibility};
use pretty_assertions::assert_eq;

const RULES: &str = r"<?php
/**
 * Validation rules
 */

use App\Support\FooClass;

class CountryRequest
{
    public function rules(): array
    {
        return [
            null,
            true,
            1,
            0.5,
            'null',
            'test',
            FooClass::TEST,
        ];
    }
}
";

const RULES_EXPECTED: &str = r"<?php
/**
 * Validation rules
 */

use App\Support\FooClass;

class CountryRequest
{
    public function rules(): array
    {
        return [
            null,
            false,
            true,
            0,
            1,
            0.0,
            0.5,
            '',
            'false',
            'null',
            'test',
            FooClass::class,
            FooClass::TEST,
            Rule::unique('countries')->ignore($country->getKey()),
        ];
    }
}
";

fn rules_value(value: Value) -> impl FnOnce(&mut coder_php::SourceUnit) -> Outcome {
    move |unit| {
        insert_into_return_array(unit.tree_mut(), &MethodQuery::new("rules"), &ArrayPath::root(), &value).unwrap()
    }
}

#[test]
fn test_return_array_takes_every_kind_in_order() {
    let mut unit = parse_source(RULES).unwrap();
    let code = parse_fragment("Rule::unique('countries')->ignore($country->getKey())").unwrap();
    for value in [
        Value::Opaque(code),
        Value::class_constant("FooClass", "class"),
        Value::from("false"),
        Value::from(""),
        Value::Float(0.0),
        Value::Int(0),
        Value::Bool(false),
    ] {
        assert_eq!(rules_value(value)(&mut unit), Outcome::Modified);
    }
    assert_eq!(render(&unit).unwrap(), RULES_EXPECTED);
}

#[test]
fn test_second_run_changes_nothing() {
    let mut unit = parse_source(RULES_EXPECTED).unwrap();
    for value in [Value::Bool(false), Value::Float(0.0), Value::from("test"), Value::class_constant("FooClass", "TEST")] {
        assert_eq!(rules_value(value)(&mut unit), Outcome::Unchanged);
    }
    assert_eq!(render(&unit).unwrap(), RULES_EXPECTED);
}

#[test]
fn test_nested_complex_value_appended() {
    let source = "<?php\nclass Config\n{\n    protected $values = [\n        'a',\n    ];\n}\n";
    let mut unit = parse_source(source).unwrap();
    let fragment = parse_fragment("[2, 'string', \\App\\BarClass::class, \\App\\BarClass::TEST]").unwrap();
    let outcome =
        insert_into_property_array(unit.tree_mut(), "values", &ArrayPath::root(), &Value::Opaque(fragment)).unwrap();

    assert_eq!(outcome, Outcome::Modified);
    assert_eq!(
        render(&unit).unwrap(),
        "<?php\nclass Config\n{\n    protected $values = [\n        'a',\n        [2, 'string', \\App\\BarClass::class, \\App\\BarClass::TEST],\n    ];\n}\n"
    );
}

#[test]
fn test_path_into_keyed_rules() {
    let source = r"<?php
class UserRequest
{
    protected $rules = [
        'email' => ['required', 'email'],
        'name' => ['required'],
    ];
}
";
    let mut unit = parse_source(source).unwrap();
    let tree = unit.tree_mut();
    insert_into_property_array(tree, "rules", &"name".parse().unwrap(), &Value::from("max:255")).unwrap();
    insert_into_property_array(tree, "rules", &"phone".parse().unwrap(), &Value::from("nullable")).unwrap();

    assert_eq!(
        render(&unit).unwrap(),
        r"<?php
class UserRequest
{
    protected $rules = [
        'email' => ['required', 'email'],
        'name' => ['max:255', 'required'],
        'phone' => [
            'nullable',
        ],
    ];
}
"
    );
}

#[test]
fn test_tab_indented_file() {
    let source = "<?php\nclass A\n{\n\tpublic $items = [\n\t\t'b' => [],\n\t];\n}\n";
    let mut unit = parse_source(source).unwrap();
    insert_into_property_array(unit.tree_mut(), "items", &"c".parse().unwrap(), &Value::Int(1)).unwrap();
    assert_eq!(
        render(&unit).unwrap(),
        "<?php\nclass A\n{\n\tpublic $items = [\n\t\t'b' => [],\n\t\t'c' => [\n\t\t\t1,\n\t\t],\n\t];\n}\n"
    );
}

#[test]
fn test_method_query_selects_overload_by_signature() {
    let source = r"<?php
class A
{
    public static function rules($a)
    {
        return ['static'];
    }

    protected function Rules()
    {
        return ['instance'];
    }
}
";
    let mut unit = parse_source(source).unwrap();
    let query = MethodQuery::new("rules").visibility(Visibility::Protected).is_static(false);
    insert_into_return_array(unit.tree_mut(), &query, &ArrayPath::root(), &Value::from("x")).unwrap();

    let rendered = render(&unit).unwrap();
    assert!(rendered.contains("return ['static'];"));
    assert!(rendered.contains("return ['instance', 'x'];"));
}

#[test]
fn test_errors_leave_source_untouched() {
    let source = "<?php\nclass A\n{\n    public $size = 3;\n}\n";
    let mut unit = parse_source(source).unwrap();

    let missing = insert_into_property_array(unit.tree_mut(), "items", &ArrayPath::root(), &Value::Int(1));
    assert!(matches!(missing, Err(CoderError::TargetNotFound(_))));

    let scalar = insert_into_property_array(unit.tree_mut(), "size", &ArrayPath::root(), &Value::Int(1));
    assert!(matches!(scalar, Err(CoderError::ShapeMismatch { .. })));

    assert_eq!(render(&unit).unwrap(), source);
}

#[test]
fn test_syntax_error_rejected() {
    let err = parse_source("<?php\nclass A\n{\n    public $items = [1,,];\n}\n").unwrap_err();
    assert!(matches!(err, ParseError::SyntaxError { line: 4, .. }), "{err}");
}
