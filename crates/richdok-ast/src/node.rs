//! The AST node enum
//!
//! Every node is exactly one of three kinds. Dispatch over a node is a
//! `match` on [`Node`], so there is no way to reach the compiler with a kind
//! it does not know about.

use std::fmt;

use serde_json::{Map, Value};

use crate::block::{BlockNode, EntityNode, Mutability};
use crate::inline::InlineNode;

/// Arbitrary JSON data attached to blocks and entities
pub type Data = Map<String, Value>;

/// A node of the document AST
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A block; becomes a content block of its own
    Block(BlockNode),
    /// An entity; annotates the text of its children
    Entity(EntityNode),
    /// A text leaf
    Inline(InlineNode),
}

/// The kind tag of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Block,
    Entity,
    Inline,
}

impl NodeKind {
    /// Wire tag of this kind
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Block => "block",
            NodeKind::Entity => "entity",
            NodeKind::Inline => "inline",
        }
    }

    /// Look up a kind from its wire tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "block" => Some(NodeKind::Block),
            "entity" => Some(NodeKind::Entity),
            "inline" => Some(NodeKind::Inline),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    /// Create an empty block node
    pub fn block(block_type: impl Into<String>) -> Self {
        Node::Block(BlockNode::new(block_type))
    }

    /// Create an entity node with no children
    pub fn entity(entity_type: impl Into<String>, mutability: Mutability) -> Self {
        Node::Entity(EntityNode::new(entity_type, mutability))
    }

    /// Create an inline node with the given styles
    pub fn inline<I, S>(styles: I, text: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Node::Inline(InlineNode {
            styles: styles.into_iter().collect(),
            text: text.into(),
        })
    }

    /// Create an unstyled inline node
    pub fn text(text: impl Into<String>) -> Self {
        Node::Inline(InlineNode::new(text))
    }

    /// The kind tag of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Block(_) => NodeKind::Block,
            Node::Entity(_) => NodeKind::Entity,
            Node::Inline(_) => NodeKind::Inline,
        }
    }

    /// Child nodes (always empty for inline leaves)
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Block(block) => &block.children,
            Node::Entity(entity) => &entity.children,
            Node::Inline(_) => &[],
        }
    }

    /// Append a child. Inline leaves cannot have children and are returned unchanged.
    pub fn with_child(mut self, child: Node) -> Self {
        match &mut self {
            Node::Block(block) => block.children.push(child),
            Node::Entity(entity) => entity.children.push(child),
            Node::Inline(_) => {}
        }
        self
    }

    /// Append several children
    pub fn with_children(self, children: impl IntoIterator<Item = Node>) -> Self {
        children.into_iter().fold(self, Node::with_child)
    }

    /// Set a data entry on a block or entity node
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        match &mut self {
            Node::Block(block) => {
                block.data.insert(key.into(), value.into());
            }
            Node::Entity(entity) => {
                entity.data.insert(key.into(), value.into());
            }
            Node::Inline(_) => {}
        }
        self
    }

    /// Number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Node::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(Node::block("unstyled").kind(), NodeKind::Block);
        assert_eq!(Node::entity("LINK", Mutability::Mutable).kind(), NodeKind::Entity);
        assert_eq!(Node::text("x").kind(), NodeKind::Inline);
        assert_eq!(NodeKind::from_tag("entity"), Some(NodeKind::Entity));
        assert_eq!(NodeKind::from_tag("Block"), None);
    }

    #[test]
    fn test_builders() {
        let node = Node::block("unstyled")
            .with_data("align", "center")
            .with_child(Node::inline(["BOLD"], "hi"))
            .with_child(Node::entity("LINK", Mutability::Mutable).with_child(Node::text("go")));

        assert_eq!(node.children().len(), 2);
        assert_eq!(node.node_count(), 4);
        if let Node::Block(block) = &node {
            assert_eq!(block.data.get("align"), Some(&Value::from("center")));
        } else {
            panic!("Expected block node");
        }
    }

    #[test]
    fn test_inline_ignores_children() {
        let node = Node::text("leaf").with_child(Node::text("x"));
        assert!(node.children().is_empty());
    }
}
