//! Block and entity nodes
//!
//! Block nodes become content blocks of the compiled document. Entity nodes
//! wrap a span of text and annotate it with a registered entity (a link, a
//! mention, an image).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::node::{Data, Node};

/// A block-level node (paragraph, header, list item, ...)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockNode {
    /// Block type, e.g. `unstyled`, `header-one`, `unordered-list-item`
    pub block_type: String,
    /// Arbitrary block data
    pub data: Data,
    /// Child nodes; nested blocks become their own content blocks
    pub children: Vec<Node>,
}

/// Mutability of an entity, as understood by the rich-text editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mutability {
    /// Text may be edited freely; the entity stays attached
    #[default]
    Mutable,
    /// Text cannot be altered without removing the entity
    Immutable,
    /// Text is removed word by word together with the entity
    Segmented,
}

impl Mutability {
    /// Wire name of this mutability
    pub fn as_str(self) -> &'static str {
        match self {
            Mutability::Mutable => "MUTABLE",
            Mutability::Immutable => "IMMUTABLE",
            Mutability::Segmented => "SEGMENTED",
        }
    }
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mutability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MUTABLE" => Ok(Mutability::Mutable),
            "IMMUTABLE" => Ok(Mutability::Immutable),
            "SEGMENTED" => Ok(Mutability::Segmented),
            other => Err(format!("unknown mutability '{}'", other)),
        }
    }
}

/// An entity node wrapping a span of text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityNode {
    /// Entity type, e.g. `LINK`, `IMAGE`
    pub entity_type: String,
    /// Entity mutability
    pub mutability: Mutability,
    /// Entity payload (e.g. `{"url": ...}`)
    pub data: Data,
    /// Child nodes whose text is annotated with this entity
    pub children: Vec<Node>,
}

impl BlockNode {
    /// Create an empty block of the given type
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            data: Data::new(),
            children: Vec::new(),
        }
    }
}

impl EntityNode {
    /// Create an entity node with no data and no children
    pub fn new(entity_type: impl Into<String>, mutability: Mutability) -> Self {
        Self {
            entity_type: entity_type.into(),
            mutability,
            data: Data::new(),
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutability_round_trip_names() {
        for m in [
            Mutability::Mutable,
            Mutability::Immutable,
            Mutability::Segmented,
        ] {
            assert_eq!(m.as_str().parse::<Mutability>(), Ok(m));
        }
    }

    #[test]
    fn test_mutability_rejects_lowercase() {
        assert!("mutable".parse::<Mutability>().is_err());
    }

    #[test]
    fn test_mutability_serde() {
        let json = serde_json::to_string(&Mutability::Immutable).unwrap();
        assert_eq!(json, r#""IMMUTABLE""#);
    }

    #[test]
    fn test_block_new_is_empty() {
        let block = BlockNode::new("header-one");
        assert_eq!(block.block_type, "header-one");
        assert!(block.children.is_empty());
        assert!(block.data.is_empty());
    }
}
