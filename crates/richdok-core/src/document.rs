//! Compiled document
//!
//! The output of a compilation: blocks in document order plus the table of
//! entities their characters refer to.

use serde::{Deserialize, Serialize};

use crate::content::ContentBlock;
use crate::keys::{BlockKey, KeyGenerator};
use crate::registry::{EntityId, EntityInstance, EntityMap};

/// Ordered blocks and the entity table they reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledDocument {
    pub blocks: Vec<ContentBlock>,
    pub entities: EntityMap,
}

impl CompiledDocument {
    /// The canonical empty document: one empty block, no entities
    pub fn empty(keys: &mut dyn KeyGenerator, block_type: &str) -> Self {
        Self {
            blocks: vec![ContentBlock::empty(keys.next_key(), block_type)],
            entities: EntityMap::new(),
        }
    }

    /// Number of blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn first_block(&self) -> Option<&ContentBlock> {
        self.blocks.first()
    }

    pub fn last_block(&self) -> Option<&ContentBlock> {
        self.blocks.last()
    }

    /// Find a block by key
    pub fn block_for_key(&self, key: &BlockKey) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| &b.key == key)
    }

    /// Look up an entity by id
    pub fn entity(&self, id: EntityId) -> Option<&EntityInstance> {
        self.entities.get(&id)
    }

    /// Block texts joined with `delimiter`
    pub fn plain_text(&self, delimiter: &str) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    /// Block texts joined with newlines
    pub fn plain_text_default(&self) -> String {
        self.plain_text("\n")
    }

    /// Whether any block has text
    pub fn has_text(&self) -> bool {
        self.blocks.iter().any(|b| !b.text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SequentialKeys;

    fn doc_with_texts(texts: &[&str]) -> CompiledDocument {
        let mut keys = SequentialKeys::default();
        CompiledDocument {
            blocks: texts
                .iter()
                .map(|t| ContentBlock {
                    text: t.to_string(),
                    ..ContentBlock::empty(keys.next_key(), "unstyled")
                })
                .collect(),
            entities: EntityMap::new(),
        }
    }

    #[test]
    fn test_empty_document() {
        let doc = CompiledDocument::empty(&mut SequentialKeys::default(), "unstyled");
        assert_eq!(doc.block_count(), 1);
        assert!(!doc.has_text());
        assert!(doc.entities.is_empty());
        assert_eq!(doc.first_block(), doc.last_block());
        assert_eq!(doc.first_block().unwrap().block_type, "unstyled");
    }

    #[test]
    fn test_plain_text() {
        let doc = doc_with_texts(&["one", "", "three"]);
        assert_eq!(doc.plain_text_default(), "one\n\nthree");
        assert_eq!(doc.plain_text(" | "), "one |  | three");
        assert!(doc.has_text());
    }

    #[test]
    fn test_block_for_key() {
        let doc = doc_with_texts(&["a", "b"]);
        let block = doc.block_for_key(&BlockKey::new("b1")).unwrap();
        assert_eq!(block.text, "b");
        assert!(doc.block_for_key(&BlockKey::new("zz")).is_none());
        assert!(doc.entity(EntityId(0)).is_none());
    }
}
