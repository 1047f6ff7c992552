//! Raw export
//!
//! Converts a [`CompiledDocument`] into the range-based JSON form a
//! rich-text editor loads its state from: per-block style and entity
//! ranges instead of per-character metadata, and an entity map keyed by
//! the entity id as a string.
//!
//! Offsets and lengths count characters (Unicode scalar values), the same
//! unit as `ContentBlock::character_list`.

use std::collections::BTreeMap;

use richdok_ast::{Data, Mutability};
use serde::{Deserialize, Serialize};

use crate::content::ContentBlock;
use crate::document::CompiledDocument;

/// A style applied to `length` characters starting at `offset`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: String,
}

/// An entity covering `length` characters starting at `offset`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntityRange {
    pub offset: usize,
    pub length: usize,
    /// Key into [`RawDocument::entity_map`]
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    pub key: String,
    pub text: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub depth: usize,
    pub inline_style_ranges: Vec<RawStyleRange>,
    pub entity_ranges: Vec<RawEntityRange>,
    pub data: Data,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub mutability: Mutability,
    pub data: Data,
}

/// Range-based document, ready to be handed to an editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub blocks: Vec<RawBlock>,
    pub entity_map: BTreeMap<String, RawEntity>,
}

impl RawDocument {
    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&ContentBlock> for RawBlock {
    fn from(block: &ContentBlock) -> Self {
        let inline_style_ranges = block
            .styles()
            .iter()
            .flat_map(|style| {
                block
                    .find_style_ranges(style)
                    .into_iter()
                    .map(move |(start, end)| RawStyleRange {
                        offset: start,
                        length: end - start,
                        style: style.to_string(),
                    })
            })
            .collect();

        let entity_ranges = block
            .find_entity_ranges()
            .into_iter()
            .map(|(start, end, id)| RawEntityRange {
                offset: start,
                length: end - start,
                key: id.to_string(),
            })
            .collect();

        RawBlock {
            key: block.key.to_string(),
            text: block.text.clone(),
            block_type: block.block_type.clone(),
            depth: block.depth,
            inline_style_ranges,
            entity_ranges,
            data: block.data.clone(),
        }
    }
}

impl From<&CompiledDocument> for RawDocument {
    fn from(doc: &CompiledDocument) -> Self {
        RawDocument {
            blocks: doc.blocks.iter().map(RawBlock::from).collect(),
            entity_map: doc
                .entities
                .iter()
                .map(|(id, entity)| {
                    (
                        id.to_string(),
                        RawEntity {
                            entity_type: entity.entity_type.clone(),
                            mutability: entity.mutability,
                            data: entity.data.clone(),
                        },
                    )
                })
                .collect(),
        }
    }
}
