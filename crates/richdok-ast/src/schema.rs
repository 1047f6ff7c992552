//! Positional node schema
//!
//! On the wire an AST is a JSON array of nodes, and every node is a pair
//! `[kind, fields]` where `fields` is itself an array whose positions are
//! fixed per kind:
//!
//! | kind     | fields                                      |
//! |----------|---------------------------------------------|
//! | `block`  | `[type, key, data, children]`               |
//! | `entity` | `[type, key, mutability, data, children]`   |
//! | `inline` | `[styles, text]`                            |
//!
//! `key` is whatever the producer stored there and is never read. `data`
//! may be `null` or omitted entirely when no later field follows, in which
//! case it decodes to an empty map.
//!
//! # Example
//!
//! ```
//! use richdok_ast::schema::decode_ast;
//! use serde_json::json;
//!
//! let ast = decode_ast(&json!([
//!     ["block", ["unstyled", "k1", {}, [
//!         ["inline", [["BOLD"], "Hello"]]
//!     ]]]
//! ])).unwrap();
//! assert_eq!(ast.len(), 1);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::block::{BlockNode, EntityNode, Mutability};
use crate::error::{Result, SchemaError};
use crate::inline::{InlineNode, StyleSet};
use crate::node::{Data, Node, NodeKind};

/// Field positions of a block node
pub mod block {
    pub const TYPE: usize = 0;
    pub const KEY: usize = 1;
    pub const DATA: usize = 2;
    pub const CHILDREN: usize = 3;
}

/// Field positions of an entity node
pub mod entity {
    pub const TYPE: usize = 0;
    pub const KEY: usize = 1;
    pub const MUTABILITY: usize = 2;
    pub const DATA: usize = 3;
    pub const CHILDREN: usize = 4;
}

/// Field positions of an inline node
pub mod inline {
    pub const STYLES: usize = 0;
    pub const TEXT: usize = 1;
}

/// Decode a whole AST (a JSON array of nodes)
pub fn decode_ast(value: &Value) -> Result<Vec<Node>> {
    let nodes = value.as_array().ok_or_else(|| SchemaError::NotAnArray {
        found: json_type(value).to_string(),
    })?;
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| decode_at(node, format!("[{}]", i)))
        .collect()
}

/// Decode a single node
pub fn decode_node(value: &Value) -> Result<Node> {
    decode_at(value, "$".to_string())
}

/// Encode a node into its positional wire form
pub fn encode_node(node: &Node) -> Value {
    match node {
        Node::Block(b) => Value::Array(vec![
            Value::from(NodeKind::Block.as_str()),
            Value::Array(vec![
                Value::from(b.block_type.clone()),
                Value::Null,
                Value::Object(b.data.clone()),
                Value::Array(b.children.iter().map(encode_node).collect()),
            ]),
        ]),
        Node::Entity(e) => Value::Array(vec![
            Value::from(NodeKind::Entity.as_str()),
            Value::Array(vec![
                Value::from(e.entity_type.clone()),
                Value::Null,
                Value::from(e.mutability.as_str()),
                Value::Object(e.data.clone()),
                Value::Array(e.children.iter().map(encode_node).collect()),
            ]),
        ]),
        Node::Inline(i) => Value::Array(vec![
            Value::from(NodeKind::Inline.as_str()),
            Value::Array(vec![
                Value::Array(i.styles.iter().map(Value::from).collect()),
                Value::from(i.text.clone()),
            ]),
        ]),
    }
}

/// Encode a whole AST
pub fn encode_ast(nodes: &[Node]) -> Value {
    Value::Array(nodes.iter().map(encode_node).collect())
}

fn decode_at(value: &Value, path: String) -> Result<Node> {
    let (tag, fields) = match value.as_array().map(Vec::as_slice) {
        Some([Value::String(tag), Value::Array(fields)]) => (tag.as_str(), fields),
        _ => return Err(SchemaError::NotANode { path }),
    };

    let kind = NodeKind::from_tag(tag).ok_or_else(|| SchemaError::UnknownKind {
        path: path.clone(),
        tag: tag.to_string(),
    })?;
    let fields = Fields {
        kind,
        path: &path,
        values: fields,
    };

    match kind {
        NodeKind::Block => Ok(Node::Block(BlockNode {
            block_type: fields.string(block::TYPE, "type")?,
            data: fields.data(block::DATA)?,
            children: fields.children(block::CHILDREN)?,
        })),
        NodeKind::Entity => Ok(Node::Entity(EntityNode {
            entity_type: fields.string(entity::TYPE, "type")?,
            mutability: fields.mutability(entity::MUTABILITY)?,
            data: fields.data(entity::DATA)?,
            children: fields.children(entity::CHILDREN)?,
        })),
        NodeKind::Inline => Ok(Node::Inline(InlineNode {
            styles: fields.styles(inline::STYLES)?,
            text: fields.string(inline::TEXT, "text")?,
        })),
    }
}

/// Positional accessor over the fields array of one node
struct Fields<'a> {
    kind: NodeKind,
    path: &'a str,
    values: &'a [Value],
}

impl<'a> Fields<'a> {
    fn required(&self, index: usize, field: &'static str) -> Result<&'a Value> {
        self.values
            .get(index)
            .ok_or_else(|| SchemaError::MissingField {
                path: self.path.to_string(),
                kind: self.kind,
                field,
            })
    }

    fn invalid(&self, field: &'static str, expected: &'static str) -> SchemaError {
        SchemaError::InvalidField {
            path: self.path.to_string(),
            kind: self.kind,
            field,
            expected,
        }
    }

    fn string(&self, index: usize, field: &'static str) -> Result<String> {
        self.required(index, field)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.invalid(field, "a string"))
    }

    fn data(&self, index: usize) -> Result<Data> {
        match self.values.get(index) {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(_) => Err(self.invalid("data", "an object")),
        }
    }

    fn mutability(&self, index: usize) -> Result<Mutability> {
        self.required(index, "mutability")?
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| self.invalid("mutability", "MUTABLE, IMMUTABLE or SEGMENTED"))
    }

    fn styles(&self, index: usize) -> Result<StyleSet> {
        let styles = self
            .required(index, "styles")?
            .as_array()
            .ok_or_else(|| self.invalid("styles", "an array of strings"))?;
        styles
            .iter()
            .map(|s| {
                s.as_str()
                    .ok_or_else(|| self.invalid("styles", "an array of strings"))
            })
            .collect()
    }

    fn children(&self, index: usize) -> Result<Vec<Node>> {
        let children = self
            .required(index, "children")?
            .as_array()
            .ok_or_else(|| self.invalid("children", "an array of nodes"))?;
        children
            .iter()
            .enumerate()
            .map(|(i, child)| decode_at(child, format!("{}.children[{}]", self.path, i)))
            .collect()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        encode_node(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_node(&value).map_err(serde::de::Error::custom)
    }
}
