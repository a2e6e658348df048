//! PHP ingress
//!
//! Parses PHP source with tree-sitter and lowers it into a
//! [`SyntaxTree`]: class properties and methods become declarations,
//! array literals and scalar literals become typed nodes, every other
//! expression is kept as verbatim text.

use crate::error::ParseError;
use crate::literal;
use coder_order::Fragment;
use coder_syntax::{
    Anchor, ArrayNode, ArrayStyle, Declaration, Entry, Layout, MethodDecl, MethodSignature, NodeId, NodeKind,
    PropertyDecl, SyntaxTree, ValueSlot, Visibility, DEFAULT_INDENT_UNIT,
};
use tree_sitter::{Node, Parser, Tree};

/// Parsed PHP file: the original text plus its lowered tree
#[derive(Debug, Clone)]
pub struct SourceUnit {
    source: String,
    tree: SyntaxTree,
}

impl SourceUnit {
    /// Original source text
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Lowered tree
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Lowered tree, for editing
    #[inline]
    pub fn tree_mut(&mut self) -> &mut SyntaxTree {
        &mut self.tree
    }
}

/// Parse a PHP file
///
/// # Errors
/// - [`ParseError::ParserInit`] if the grammar cannot be loaded
/// - [`ParseError::SyntaxError`] for the first error or missing token
pub fn parse_source(source: &str) -> Result<SourceUnit, ParseError> {
    let ts_tree = parse_php(source)?;
    if let Some(error) = first_error(ts_tree.root_node()) {
        return Err(syntax_error(error, source));
    }

    let mut lowering = Lowering::new(source);
    lowering.visit(ts_tree.root_node(), None);
    tracing::debug!(
        "Lowered {} declarations, {} nodes",
        lowering.tree.declarations().len(),
        lowering.tree.len()
    );

    Ok(SourceUnit {
        source: source.to_string(),
        tree: lowering.tree,
    })
}

/// Parse one PHP expression into a fragment for opaque values
///
/// # Errors
/// Returns [`ParseError::NotAnExpression`] unless `code` is exactly one
/// well-formed expression
pub fn parse_fragment(code: &str) -> Result<Fragment, ParseError> {
    let not_expression = || ParseError::NotAnExpression(code.to_string());
    let wrapped = format!("<?php return {code};");
    let ts_tree = parse_php(&wrapped)?;
    let root = ts_tree.root_node();
    if first_error(root).is_some() {
        return Err(not_expression());
    }

    let statements: Vec<Node<'_>> = named_children(root)
        .into_iter()
        .filter(|n| n.kind() != "php_tag")
        .collect();
    let [statement] = statements.as_slice() else {
        return Err(not_expression());
    };
    if statement.kind() != "return_statement" {
        return Err(not_expression());
    }
    let operand = named_children(*statement).into_iter().next().ok_or_else(not_expression)?;

    let mut lowering = Lowering::new(&wrapped);
    let id = lowering.lower_expr(operand);
    let mut tree = SyntaxTree::new();
    let root = tree.graft(&lowering.tree, id).map_err(|_| not_expression())?;
    Fragment::new(tree, root).map_err(|_| not_expression())
}

fn parse_php(source: &str) -> Result<Tree, ParseError> {
    let language: tree_sitter::Language = tree_sitter_php::LANGUAGE_PHP.into();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ParseError::ParserInit(e.to_string()))?;
    parser.parse(source, None).ok_or(ParseError::ParseFailed)
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error).or(Some(node))
}

fn syntax_error(node: Node<'_>, source: &str) -> ParseError {
    let position = node.start_position();
    let message = if node.is_missing() {
        format!("missing '{}'", node.kind())
    } else {
        let text: String = source[node.byte_range()].chars().take(24).collect();
        format!("unexpected '{}'", text.trim())
    };
    ParseError::syntax_at(position.row, position.column, message)
}

/// Named children without comments
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}

fn has_child(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == kind);
    found
}

/// Function-like scopes whose `return` statements belong to someone else
const NESTED_SCOPES: &[&str] = &[
    "anonymous_function",
    "anonymous_function_creation_expression",
    "arrow_function",
    "function_definition",
    "class_declaration",
    "anonymous_class",
    "object_creation_expression",
];

struct Lowering<'s> {
    source: &'s str,
    tree: SyntaxTree,
}

impl<'s> Lowering<'s> {
    fn new(source: &'s str) -> Self {
        let mut tree = SyntaxTree::new();
        tree.set_indent_unit(detect_indent_unit(source).unwrap_or_else(|| DEFAULT_INDENT_UNIT.to_string()));
        Self { source, tree }
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        &self.source[node.byte_range()]
    }

    fn visit(&mut self, node: Node<'_>, class: Option<&str>) {
        match node.kind() {
            "class_declaration" | "trait_declaration" | "enum_declaration" => {
                let name = node.child_by_field_name("name").map(|n| self.text(n));
                if let Some(body) = node.child_by_field_name("body") {
                    for member in named_children(body) {
                        self.visit(member, name);
                    }
                }
            }
            "property_declaration" => self.lower_property(node, class),
            "method_declaration" => self.lower_method(node, class),
            _ => {
                for child in named_children(node) {
                    self.visit(child, class);
                }
            }
        }
    }

    fn lower_property(&mut self, node: Node<'_>, class: Option<&str>) {
        for element in named_children(node) {
            if element.kind() != "property_element" {
                continue;
            }
            let Some(name_node) = element
                .child_by_field_name("name")
                .or_else(|| named_children(element).into_iter().find(|n| n.kind() == "variable_name"))
            else {
                continue;
            };
            let name = self.text(name_node).trim_start_matches('$').to_string();

            let initializer = element.child_by_field_name("default_value").or_else(|| {
                named_children(element)
                    .into_iter()
                    .find(|n| n.kind() == "property_initializer")
                    .and_then(|init| named_children(init).into_iter().next())
            });
            let slot = match initializer {
                Some(expr) => ValueSlot {
                    value: Some(self.lower_expr(expr)),
                    anchor: Anchor::Replace(expr.byte_range()),
                },
                None => ValueSlot {
                    value: None,
                    anchor: Anchor::Insert {
                        offset: name_node.end_byte(),
                        prefix: " = ".to_string(),
                    },
                },
            };
            self.tree.add_declaration(Declaration::Property(PropertyDecl {
                class: class.map(str::to_string),
                name,
                slot,
            }));
        }
    }

    fn lower_method(&mut self, node: Node<'_>, class: Option<&str>) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let mut signature = MethodSignature::new(self.text(name_node));
        for child in named_children(node) {
            match child.kind() {
                "visibility_modifier" => {
                    signature.visibility = self.text(child).parse().unwrap_or(Visibility::Public);
                }
                "static_modifier" => signature.is_static = true,
                _ => {}
            }
        }
        if let Some(parameters) = node.child_by_field_name("parameters") {
            signature.parameters = named_children(parameters)
                .into_iter()
                .filter_map(|p| p.child_by_field_name("name"))
                .map(|n| self.text(n).trim_start_matches('$').to_string())
                .collect();
        }

        let mut returns = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            self.collect_returns(body, &mut returns);
        }
        self.tree.add_declaration(Declaration::Method(MethodDecl {
            class: class.map(str::to_string),
            signature,
            returns,
        }));
    }

    fn collect_returns(&mut self, node: Node<'_>, returns: &mut Vec<ValueSlot>) {
        for child in named_children(node) {
            if child.kind() == "return_statement" {
                let slot = match named_children(child).into_iter().next() {
                    Some(expr) => ValueSlot {
                        value: Some(self.lower_expr(expr)),
                        anchor: Anchor::Replace(expr.byte_range()),
                    },
                    None => ValueSlot {
                        value: None,
                        anchor: Anchor::Insert {
                            offset: child.start_byte() + "return".len(),
                            prefix: " ".to_string(),
                        },
                    },
                };
                returns.push(slot);
            } else if !NESTED_SCOPES.contains(&child.kind()) {
                self.collect_returns(child, returns);
            }
        }
    }

    fn lower_expr(&mut self, node: Node<'_>) -> NodeId {
        let kind = self.lower_kind(node);
        match kind {
            Some(kind) => self.tree.alloc_with_origin(kind, node.byte_range()),
            None if node.kind() == "array_creation_expression" => self.lower_array(node),
            None => self
                .tree
                .alloc_with_origin(NodeKind::Raw(self.text(node).to_string()), node.byte_range()),
        }
    }

    /// Scalar and reference literals; `None` for arrays and everything
    /// kept verbatim
    fn lower_kind(&self, node: Node<'_>) -> Option<NodeKind> {
        let text = self.text(node);
        match node.kind() {
            "null" => Some(NodeKind::Null),
            "boolean" => Some(NodeKind::Bool(text.eq_ignore_ascii_case("true"))),
            "integer" => literal::parse_int(text, false).map(NodeKind::Int),
            "float" => literal::parse_float(text, false).map(NodeKind::Float),
            "string" => literal::parse_single_quoted(text).map(NodeKind::Str),
            "encapsed_string" => {
                let interpolated = named_children(node)
                    .iter()
                    .any(|part| !matches!(part.kind(), "string_content" | "string_value" | "escape_sequence"));
                if interpolated {
                    None
                } else {
                    literal::parse_double_quoted(text).map(NodeKind::Str)
                }
            }
            "unary_op_expression" => self.lower_signed(node),
            "class_constant_access_expression" => self.lower_class_constant(node),
            "name" | "qualified_name" if text.trim_start_matches('\\') == literal::INT_MIN_CONSTANT => {
                Some(NodeKind::Int(i64::MIN))
            }
            _ => None,
        }
    }

    fn lower_signed(&self, node: Node<'_>) -> Option<NodeKind> {
        let negative = match node.child(0)?.kind() {
            "-" => true,
            "+" => false,
            _ => return None,
        };
        let children = named_children(node);
        let [operand] = children[..] else {
            return None;
        };
        let text = self.text(operand);
        match operand.kind() {
            "integer" => literal::parse_int(text, negative).map(NodeKind::Int),
            "float" => literal::parse_float(text, negative).map(NodeKind::Float),
            _ => None,
        }
    }

    fn lower_class_constant(&self, node: Node<'_>) -> Option<NodeKind> {
        let children = named_children(node);
        let [scope, constant] = children[..] else {
            return None;
        };
        if !matches!(scope.kind(), "name" | "qualified_name" | "relative_scope") || constant.kind() != "name" {
            return None;
        }
        let class = self.text(scope).to_string();
        let constant = self.text(constant);
        Some(if constant.eq_ignore_ascii_case("class") {
            NodeKind::ClassRef { class }
        } else {
            NodeKind::ConstRef {
                class,
                constant: constant.to_string(),
            }
        })
    }

    fn lower_array(&mut self, node: Node<'_>) -> NodeId {
        let style = if self.text(node).starts_with('[') {
            ArrayStyle::Short
        } else {
            ArrayStyle::Long
        };
        let elements: Vec<Node<'_>> = named_children(node)
            .into_iter()
            .filter(|n| n.kind() == "array_element_initializer")
            .collect();
        let layout = self.detect_layout(node, style, &elements);

        let entries = elements.iter().map(|&element| self.lower_element(element)).collect();
        self.tree.alloc_with_origin(
            NodeKind::Array(ArrayNode::with_entries(style, layout, entries)),
            node.byte_range(),
        )
    }

    fn lower_element(&mut self, element: Node<'_>) -> Entry {
        let parts = named_children(element);
        let verbatim = has_child(element, "by_ref") || parts.iter().any(|p| p.kind() == "variadic_unpacking");
        match parts.as_slice() {
            [key, value] if !verbatim && has_child(element, "=>") => {
                let key = self.lower_expr(*key);
                Entry::keyed(key, self.lower_expr(*value))
            }
            [value] if !verbatim => Entry::plain(self.lower_expr(*value)),
            _ => Entry::plain(self.tree.alloc_with_origin(
                NodeKind::Raw(self.text(element).to_string()),
                element.byte_range(),
            )),
        }
    }

    fn detect_layout(&self, node: Node<'_>, style: ArrayStyle, elements: &[Node<'_>]) -> Layout {
        let start = node.start_byte();
        let open_end = match style {
            ArrayStyle::Short => start + 1,
            ArrayStyle::Long => self.source[start..].find('(').map_or(start, |i| start + i + 1),
        };
        let close_start = node.end_byte().saturating_sub(1);
        let first_start = elements.first().map_or(close_start, Node::start_byte);
        if !self.source[open_end..first_start.max(open_end)].contains('\n') {
            return Layout::Inline;
        }

        let closing = line_indent(self.source, close_start);
        let indent = if elements.is_empty() {
            format!("{closing}{}", self.tree.indent_unit())
        } else {
            line_indent(self.source, first_start)
        };
        Layout::Multiline { indent, closing }
    }
}

/// Leading whitespace of the line containing `offset`
fn line_indent(source: &str, offset: usize) -> String {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    source[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

/// Smallest indentation step used by code lines, ignoring docblock
/// continuation lines
fn detect_indent_unit(source: &str) -> Option<String> {
    let mut smallest: Option<usize> = None;
    for line in source.lines() {
        let content = line.trim_start();
        if content.is_empty() || content.starts_with('*') {
            continue;
        }
        let indent = &line[..line.len() - content.len()];
        if indent.starts_with('\t') {
            return Some("\t".to_string());
        }
        if !indent.is_empty() && indent.chars().all(|c| c == ' ') {
            smallest = Some(smallest.map_or(indent.len(), |s| s.min(indent.len())));
        }
    }
    smallest.map(|n| " ".repeat(n))
}
