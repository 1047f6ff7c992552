//! Content model: character metadata and content blocks
//!
//! A [`ContentBlock`] stores its text together with one
//! [`CharacterMetadata`] per character. Characters are Unicode scalar
//! values; `character_list.len() == text.chars().count()` holds for every
//! block the compiler produces.

use richdok_ast::{Data, StyleSet};
use serde::{Deserialize, Serialize};

use crate::keys::BlockKey;
use crate::registry::EntityId;

/// Styles and entity attached to a single character
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterMetadata {
    pub style: StyleSet,
    pub entity: Option<EntityId>,
}

impl CharacterMetadata {
    pub fn new(style: StyleSet, entity: Option<EntityId>) -> Self {
        Self { style, entity }
    }

    pub fn has_style(&self, style: &str) -> bool {
        self.style.contains(style)
    }
}

/// A compiled block of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub key: BlockKey,
    pub text: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub character_list: Vec<CharacterMetadata>,
    pub depth: usize,
    pub data: Data,
}

impl ContentBlock {
    /// An empty block of the given type at depth 0
    pub fn empty(key: BlockKey, block_type: impl Into<String>) -> Self {
        Self {
            key,
            text: String::new(),
            block_type: block_type.into(),
            character_list: Vec::new(),
            depth: 0,
            data: Data::new(),
        }
    }

    /// Number of characters in the block
    pub fn length(&self) -> usize {
        self.character_list.len()
    }

    /// Styles of the character at `offset`
    pub fn style_at(&self, offset: usize) -> Option<&StyleSet> {
        self.character_list.get(offset).map(|c| &c.style)
    }

    /// Entity of the character at `offset`
    pub fn entity_at(&self, offset: usize) -> Option<EntityId> {
        self.character_list.get(offset).and_then(|c| c.entity)
    }

    /// Maximal runs `(start, end)` of characters carrying `style`
    pub fn find_style_ranges(&self, style: &str) -> Vec<(usize, usize)> {
        find_ranges(&self.character_list, |c| c.has_style(style).then_some(()))
            .into_iter()
            .map(|(start, end, _)| (start, end))
            .collect()
    }

    /// Maximal runs `(start, end, id)` of characters sharing one entity
    pub fn find_entity_ranges(&self) -> Vec<(usize, usize, EntityId)> {
        find_ranges(&self.character_list, |c| c.entity)
    }

    /// Distinct styles used in the block, in first-use order
    pub fn styles(&self) -> StyleSet {
        self.character_list
            .iter()
            .flat_map(|c| c.style.iter())
            .collect()
    }
}

/// Group adjacent characters that map to the same `Some(value)`
fn find_ranges<T, F>(chars: &[CharacterMetadata], mut value_of: F) -> Vec<(usize, usize, T)>
where
    T: PartialEq + Copy,
    F: FnMut(&CharacterMetadata) -> Option<T>,
{
    let mut ranges = Vec::new();
    let mut current: Option<(usize, T)> = None;

    for (i, c) in chars.iter().enumerate() {
        let value = value_of(c);
        match (current, value) {
            (Some((_, open)), Some(v)) if open == v => {}
            (Some((start, open)), next) => {
                ranges.push((start, i, open));
                current = next.map(|v| (i, v));
            }
            (None, next) => current = next.map(|v| (i, v)),
        }
    }
    if let Some((start, open)) = current {
        ranges.push((start, chars.len(), open));
    }
    ranges
}
