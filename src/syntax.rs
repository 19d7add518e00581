//! TypeScript syntax access for the taxonomy file, backed by tree-sitter.
//!
//! Only object literals, their `pair`s and arrays are looked at. Byte ranges
//! come straight from the syntax tree so edits can be spliced into the
//! original text.

use tree_sitter::{Node, Parser, Query, QueryCursor, Tree};

use crate::constants::CATEGORY_FIELD;
use crate::error::{CategorizerError, Result};

// Object literals carrying a `category: "<string>"` pair
const CATEGORY_OBJECT_QUERY: &str = r#"
(object
    (pair
        key: [(property_identifier) (string)] @key
        value: (string) @value
    )
) @object
"#;

/// Object literal declaring a string `category`.
#[derive(Debug, Clone, Copy)]
pub struct CategoryObject<'t, 's> {
    pub node: Node<'t>,
    pub category: &'s str,
}

/// A `key: value` member of an object literal.
#[derive(Debug, Clone, Copy)]
pub struct Pair<'t, 's> {
    pub key: &'s str,
    pub node: Node<'t>,
    pub key_node: Node<'t>,
    pub value: Node<'t>,
}

impl<'t, 's> Pair<'t, 's> {
    pub fn string_value(&self, source: &'s str) -> Option<&'s str> {
        string_value(self.value, source)
    }

    /// The value when it is an array literal.
    pub fn array_value(&self) -> Option<Node<'t>> {
        (self.value.kind() == "array").then_some(self.value)
    }

    pub fn value_text(&self, source: &'s str) -> &'s str {
        text(self.value, source)
    }

    /// The `,` following this pair, skipping comments.
    pub fn trailing_comma(&self) -> Option<Node<'t>> {
        let mut next = self.node.next_sibling();
        while let Some(sibling) = next {
            match sibling.kind() {
                "," => return Some(sibling),
                "comment" => next = sibling.next_sibling(),
                _ => return None,
            }
        }
        None
    }
}

pub struct TaxonomySyntax {
    parser: Parser,
    category_query: Query,
}

impl TaxonomySyntax {
    pub fn new() -> Result<Self> {
        let language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT;
        let mut parser = Parser::new();
        parser.set_language(&language.into())?;
        let category_query = Query::new(&language.into(), CATEGORY_OBJECT_QUERY)?;
        Ok(Self {
            parser,
            category_query,
        })
    }

    /// Parses `source`, rejecting input the grammar could only recover from
    /// with error or missing nodes.
    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        let tree = self.parser.parse(source, None).ok_or_else(|| {
            CategorizerError::parse_at(source, 0, "parser produced no syntax tree")
        })?;

        if let Some(node) = first_error(tree.root_node()) {
            let message = if node.is_missing() {
                format!("missing '{}'", node.kind())
            } else {
                let snippet: String = text(node, source).chars().take(24).collect();
                format!("unexpected '{}'", snippet.trim())
            };
            return Err(CategorizerError::parse_at(source, node.start_byte(), message));
        }
        Ok(tree)
    }

    /// Every object literal with a string `category` pair, in document order.
    pub fn category_objects<'t, 's>(
        &self,
        tree: &'t Tree,
        source: &'s str,
    ) -> Vec<CategoryObject<'t, 's>> {
        let (Some(object_idx), Some(key_idx), Some(value_idx)) = (
            self.category_query.capture_index_for_name("object"),
            self.category_query.capture_index_for_name("key"),
            self.category_query.capture_index_for_name("value"),
        ) else {
            return Vec::new();
        };

        let mut cursor = QueryCursor::new();
        let mut out: Vec<CategoryObject<'t, 's>> = Vec::new();
        for m in cursor.matches(&self.category_query, tree.root_node(), source.as_bytes()) {
            let mut object = None;
            let mut key = None;
            let mut value = None;
            for capture in m.captures {
                if capture.index == object_idx {
                    object = Some(capture.node);
                } else if capture.index == key_idx {
                    key = Some(capture.node);
                } else if capture.index == value_idx {
                    value = Some(capture.node);
                }
            }

            let (Some(object), Some(key), Some(value)) = (object, key, value) else {
                continue;
            };
            if key_text(key, source) != Some(CATEGORY_FIELD) {
                continue;
            }
            let Some(category) = string_value(value, source) else {
                continue;
            };
            if out.iter().any(|o| o.node.id() == object.id()) {
                continue;
            }
            out.push(CategoryObject {
                node: object,
                category,
            });
        }
        out
    }
}

pub fn text<'s>(node: Node, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// Contents of a quoted `string` node without its quotes. Escapes are left as written.
pub fn string_value<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    if node.kind() != "string" {
        return None;
    }
    let raw = text(node, source);
    (raw.len() >= 2).then(|| &raw[1..raw.len() - 1])
}

fn key_text<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    match node.kind() {
        "property_identifier" => Some(text(node, source)),
        "string" => string_value(node, source),
        _ => None,
    }
}

/// `pair` members of an object literal, in source order. Computed keys are skipped.
pub fn pairs<'t, 's>(object: Node<'t>, source: &'s str) -> Vec<Pair<'t, 's>> {
    let mut cursor = object.walk();
    let pairs = object
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "pair")
        .filter_map(|pair| {
            let key_node = pair.child_by_field_name("key")?;
            let value = pair.child_by_field_name("value")?;
            Some(Pair {
                key: key_text(key_node, source)?,
                node: pair,
                key_node,
                value,
            })
        })
        .collect();
    pairs
}

pub fn field<'t, 's>(object: Node<'t>, source: &'s str, name: &str) -> Option<Pair<'t, 's>> {
    pairs(object, source).into_iter().find(|p| p.key == name)
}

/// Elements of an array literal, comments excluded.
pub fn elements(array: Node) -> Vec<Node> {
    let mut cursor = array.walk();
    let elements = array
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    elements
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error).or(Some(node))
}
