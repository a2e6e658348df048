//! PHP egress
//!
//! Prints a [`SourceUnit`] back to text. Only value slots whose tree
//! changed are touched: untouched nodes are copied from the original
//! source, changed arrays keep their original entries and the text
//! between them (comments included) and get new entries spliced in.

use crate::error::SerializeError;
use crate::ingress::SourceUnit;
use crate::literal::{format_float, format_int, quote};
use coder_syntax::{Anchor, ArrayNode, Entry, Layout, NodeId, NodeKind, Span, SyntaxTree};

/// One replacement in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    span: Span,
    text: String,
}

/// Print `unit`, applying every changed value slot to its source text
///
/// # Errors
/// - [`SerializeError::Tree`] if the tree holds dangling ids
/// - [`SerializeError::SpanOutOfRange`] if a node span does not fit the source
/// - [`SerializeError::OverlappingEdit`] if two slots claim the same bytes
pub fn render(unit: &SourceUnit) -> Result<String, SerializeError> {
    let printer = Printer {
        source: unit.source(),
        tree: unit.tree(),
    };

    let mut edits = Vec::new();
    for declaration in unit.tree().declarations() {
        for slot in declaration.slots() {
            let Some(value) = slot.value else {
                continue;
            };
            if !unit.tree().needs_render(value) {
                continue;
            }
            let mut text = String::new();
            match &slot.anchor {
                Anchor::Replace(span) => {
                    printer.write(value, &mut text)?;
                    edits.push(Edit {
                        span: span.clone(),
                        text,
                    });
                }
                Anchor::Insert { offset, prefix } => {
                    text.push_str(prefix);
                    printer.write(value, &mut text)?;
                    edits.push(Edit {
                        span: *offset..*offset,
                        text,
                    });
                }
                Anchor::Detached => {
                    tracing::debug!("Skipping detached slot of '{}'", declaration.name());
                }
            }
        }
    }

    apply_edits(unit.source(), edits)
}

fn apply_edits(source: &str, mut edits: Vec<Edit>) -> Result<String, SerializeError> {
    edits.sort_by_key(|edit| (edit.span.start, edit.span.end));
    let mut out = String::with_capacity(source.len());
    let mut pos = 0;
    for edit in &edits {
        if edit.span.start < pos {
            return Err(SerializeError::OverlappingEdit(edit.span.start));
        }
        out.push_str(slice(source, &(pos..edit.span.start))?);
        out.push_str(&edit.text);
        pos = edit.span.end;
    }
    out.push_str(slice(source, &(pos..source.len()))?);
    tracing::debug!("Applied {} edits", edits.len());
    Ok(out)
}

fn slice<'s>(source: &'s str, span: &Span) -> Result<&'s str, SerializeError> {
    source.get(span.clone()).ok_or(SerializeError::SpanOutOfRange {
        start: span.start,
        end: span.end,
    })
}

struct Printer<'a> {
    source: &'a str,
    tree: &'a SyntaxTree,
}

impl Printer<'_> {
    fn write(&self, id: NodeId, out: &mut String) -> Result<(), SerializeError> {
        let node = self.tree.node(id)?;
        match (node.origin(), node.kind()) {
            (Some(span), _) if !self.tree.needs_render(id) => {
                out.push_str(slice(self.source, span)?);
                Ok(())
            }
            (Some(span), NodeKind::Array(array)) if array.entries().iter().any(|e| self.has_origin(e.value)) => {
                self.splice(span, array, out)
            }
            (_, kind) => self.write_fresh(kind, out),
        }
    }

    fn has_origin(&self, id: NodeId) -> bool {
        self.tree.node(id).is_ok_and(|node| node.origin().is_some())
    }

    fn origin(&self, id: NodeId) -> Result<Span, SerializeError> {
        let node = self.tree.node(id)?;
        node.origin().cloned().ok_or(SerializeError::SpanOutOfRange { start: 0, end: 0 })
    }

    /// Print an array lowered from source that gained entries
    fn splice(&self, span: &Span, array: &ArrayNode, out: &mut String) -> Result<(), SerializeError> {
        let indent = match array.layout() {
            Layout::Multiline { indent, .. } => Some(indent.as_str()),
            Layout::Inline => None,
        };
        let mut pos = span.start;
        let mut pending: Vec<String> = Vec::new();
        let mut seen_original = false;

        for entry in array.entries() {
            if !self.has_origin(entry.value) {
                pending.push(self.entry_text(entry)?);
                continue;
            }

            let value_span = self.origin(entry.value)?;
            let start = match entry.key {
                Some(key) => self.origin(key)?.start,
                None => value_span.start,
            };
            if seen_original {
                pos = self.write_after(pos, &pending, indent, out)?;
            }
            out.push_str(slice(self.source, &(pos..start))?);
            if !seen_original {
                for text in &pending {
                    match indent {
                        Some(indent) => {
                            out.push_str(text);
                            out.push_str(",\n");
                            out.push_str(indent);
                        }
                        None => {
                            out.push_str(text);
                            out.push_str(", ");
                        }
                    }
                }
            }
            pending.clear();

            out.push_str(slice(self.source, &(start..value_span.start))?);
            self.write(entry.value, out)?;
            pos = value_span.end;
            seen_original = true;
        }

        pos = self.write_after(pos, &pending, indent, out)?;
        out.push_str(slice(self.source, &(pos..span.end))?);
        Ok(())
    }

    /// Write new entries following an original entry ending at `pos`;
    /// returns the position copying resumes from
    fn write_after(
        &self,
        pos: usize,
        pending: &[String],
        indent: Option<&str>,
        out: &mut String,
    ) -> Result<usize, SerializeError> {
        if pending.is_empty() {
            return Ok(pos);
        }
        let rest = slice(self.source, &(pos..self.source.len()))?;
        let gap = rest.len() - rest.trim_start().len();
        if rest[gap..].starts_with(',') {
            let comma_end = pos + gap + 1;
            out.push_str(slice(self.source, &(pos..comma_end))?);
            for text in pending {
                match indent {
                    Some(indent) => {
                        out.push('\n');
                        out.push_str(indent);
                    }
                    None => out.push(' '),
                }
                out.push_str(text);
                out.push(',');
            }
            Ok(comma_end)
        } else {
            for text in pending {
                out.push(',');
                match indent {
                    Some(indent) => {
                        out.push('\n');
                        out.push_str(indent);
                    }
                    None => out.push(' '),
                }
                out.push_str(text);
            }
            Ok(pos)
        }
    }

    fn entry_text(&self, entry: &Entry) -> Result<String, SerializeError> {
        let mut text = String::new();
        if let Some(key) = entry.key {
            self.write(key, &mut text)?;
            text.push_str(" => ");
        }
        self.write(entry.value, &mut text)?;
        Ok(text)
    }

    fn write_fresh(&self, kind: &NodeKind, out: &mut String) -> Result<(), SerializeError> {
        match kind {
            NodeKind::Null => out.push_str("null"),
            NodeKind::Bool(true) => out.push_str("true"),
            NodeKind::Bool(false) => out.push_str("false"),
            NodeKind::Int(i) => out.push_str(&format_int(*i)),
            NodeKind::Float(x) => out.push_str(&format_float(*x)),
            NodeKind::Str(s) => out.push_str(&quote(s)),
            NodeKind::ClassRef { class } => {
                out.push_str(class);
                out.push_str("::class");
            }
            NodeKind::ConstRef { class, constant } => {
                out.push_str(class);
                out.push_str("::");
                out.push_str(constant);
            }
            NodeKind::Raw(text) => out.push_str(text),
            NodeKind::Array(array) => self.write_fresh_array(array, out)?,
        }
        Ok(())
    }

    fn write_fresh_array(&self, array: &ArrayNode, out: &mut String) -> Result<(), SerializeError> {
        let (open, close) = array.style().delimiters();
        out.push_str(open);
        match array.layout() {
            _ if array.is_empty() => {}
            Layout::Inline => {
                for (i, entry) in array.entries().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&self.entry_text(entry)?);
                }
            }
            Layout::Multiline { indent, closing } => {
                out.push('\n');
                for entry in array.entries() {
                    out.push_str(indent);
                    out.push_str(&self.entry_text(entry)?);
                    out.push_str(",\n");
                }
                out.push_str(closing);
            }
        }
        out.push_str(close);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingress::{parse_fragment, parse_source};
    use coder_order::{insert_into_property_array, insert_into_return_array, MethodQuery, Outcome, Value};
    use coder_syntax::ArrayPath;
    use pretty_assertions::assert_eq;

    fn class(body: &str) -> String {
        format!("<?php\n\nclass A\n{{\n{body}}}\n")
    }

    fn insert_property(source: &str, name: &str, path: &str, value: Value) -> String {
        let mut unit = parse_source(source).unwrap();
        let path: ArrayPath = path.parse().unwrap();
        insert_into_property_array(unit.tree_mut(), name, &path, &value).unwrap();
        render(&unit).unwrap()
    }

    #[test]
    fn untouched_source_is_identical() {
        let source = class("    public $items = [1, /* two */ 3];\n");
        let unit = parse_source(&source).unwrap();
        assert_eq!(render(&unit).unwrap(), source);
    }

    #[test]
    fn inline_insert_between_entries() {
        let source = class("    public $items = [1, 3];\n");
        assert_eq!(
            insert_property(&source, "items", "", Value::Int(2)),
            class("    public $items = [1, 2, 3];\n")
        );
    }

    #[test]
    fn int_min_printed_as_constant() {
        let source = class("    public $bounds = [0];\n");
        let printed = insert_property(&source, "bounds", "", Value::Int(i64::MIN));
        assert_eq!(printed, class("    public $bounds = [PHP_INT_MIN, 0];\n"));

        let mut unit = parse_source(&printed).unwrap();
        let again = insert_into_property_array(unit.tree_mut(), "bounds", &ArrayPath::root(), &Value::Int(i64::MIN));
        assert_eq!(again, Ok(Outcome::Unchanged));
        assert_eq!(
            insert_property(&printed, "bounds", "", Value::Int(-1)),
            class("    public $bounds = [PHP_INT_MIN, -1, 0];\n")
        );
    }

    #[test]
    fn long_array_append() {
        let source = class("    public $items = array(1, 2);\n");
        assert_eq!(
            insert_property(&source, "items", "", Value::Int(3)),
            class("    public $items = array(1, 2, 3);\n")
        );
    }

    #[test]
    fn multiline_keeps_comments() {
        let source = class("    protected $rules = [\n        'email', // contact\n        'name',\n    ];\n");
        assert_eq!(
            insert_property(&source, "rules", "", Value::from("phone")),
            class("    protected $rules = [\n        'email', // contact\n        'name',\n        'phone',\n    ];\n")
        );
        assert_eq!(
            insert_property(&source, "rules", "", Value::from("age")),
            class("    protected $rules = [\n        'age',\n        'email', // contact\n        'name',\n    ];\n")
        );
    }

    #[test]
    fn multiline_without_trailing_comma() {
        let source = class("    protected $rules = [\n        'a',\n        'b'\n    ];\n");
        assert_eq!(
            insert_property(&source, "rules", "", Value::from("c")),
            class("    protected $rules = [\n        'a',\n        'b',\n        'c'\n    ];\n")
        );
    }

    #[test]
    fn created_path_follows_layout() {
        let source = class("    public $config = [\n        'a' => 1,\n    ];\n");
        assert_eq!(
            insert_property(&source, "config", "b", Value::Int(2)),
            class("    public $config = [\n        'a' => 1,\n        'b' => [\n            2,\n        ],\n    ];\n")
        );
    }

    #[test]
    fn nested_existing_array() {
        let source = class("    public $rules = ['name' => ['required'], 'x'];\n");
        assert_eq!(
            insert_property(&source, "rules", "name", Value::from("max")),
            class("    public $rules = ['name' => ['max', 'required'], 'x'];\n")
        );
    }

    #[test]
    fn empty_array_gets_first_entry() {
        let source = class("    public $items = [];\n");
        assert_eq!(
            insert_property(&source, "items", "", Value::class_constant("Foo", "class")),
            class("    public $items = [Foo::class];\n")
        );
    }

    #[test]
    fn property_without_initializer() {
        let source = class("    private static $levels;\n");
        assert_eq!(
            insert_property(&source, "levels", "", Value::Float(0.5)),
            class("    private static $levels = [0.5];\n")
        );
    }

    #[test]
    fn floats_and_opaque_values() {
        let source = class("    public $steps = [0.0, 1.0];\n");
        let fragment = parse_fragment("self::make()").unwrap();
        let once = insert_property(&source, "steps", "", Value::Float(0.5));
        assert_eq!(once, class("    public $steps = [0.0, 0.5, 1.0];\n"));
        assert_eq!(
            insert_property(&once, "steps", "", Value::Opaque(fragment)),
            class("    public $steps = [0.0, 0.5, 1.0, self::make()];\n")
        );
    }

    #[test]
    fn bare_return_gets_array() {
        let source = class("    public function rules()\n    {\n        return;\n    }\n");
        let mut unit = parse_source(&source).unwrap();
        insert_into_return_array(
            unit.tree_mut(),
            &MethodQuery::new("rules"),
            &ArrayPath::root(),
            &Value::from("x"),
        )
        .unwrap();
        assert_eq!(
            render(&unit).unwrap(),
            class("    public function rules()\n    {\n        return ['x'];\n    }\n")
        );
    }

    #[test]
    fn overlapping_edits_rejected() {
        let edits = vec![
            Edit {
                span: 0..4,
                text: "a".into(),
            },
            Edit {
                span: 2..6,
                text: "b".into(),
            },
        ];
        assert_eq!(apply_edits("0123456789", edits), Err(SerializeError::OverlappingEdit(2)));
    }

    #[test]
    fn edits_applied_in_order() {
        let edits = vec![
            Edit {
                span: 8..8,
                text: "!".into(),
            },
            Edit {
                span: 0..1,
                text: "X".into(),
            },
        ];
        assert_eq!(apply_edits("0123456789", edits).unwrap(), "X1234567!89");
    }
}
