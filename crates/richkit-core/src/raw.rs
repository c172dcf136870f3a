//! Canonical document JSON
//!
//! The raw form is the interchange format between controlled callers and the
//! engine:
//!
//! ```json
//! {"blocks":[{"key":"a1b2c","text":"Hi","type":"unstyled","depth":0,
//!   "inlineStyleRanges":[{"offset":0,"length":2,"style":"BOLD"}],
//!   "entityRanges":[],"data":{}}],
//!  "entityMap":{}}
//! ```
//!
//! Parsing validates every structural invariant of [`Document`]; anything
//! inconsistent becomes a [`ParseError`] instead of a half-built document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

use crate::block::{Block, BlockType};
use crate::document::Document;
use crate::entity::{Entity, EntityKey, EntityMap, EntityType, Mutability};
use crate::error::{ParseError, ParseResult};
use crate::style::{CharacterMetadata, InlineStyle};
use crate::text::utf16_len;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
    #[serde(default)]
    pub entity_map: BTreeMap<String, RawEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default = "default_block_type")]
    pub block_type: String,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub inline_style_ranges: Vec<RawInlineStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<RawEntityRange>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

fn default_block_type() -> String {
    BlockType::Unstyled.as_str().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInlineStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: InlineStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: RawEntityKey,
}

/// Entity keys are numbers on the wire, but some producers quote them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntityKey {
    Number(u64),
    Text(String),
}

impl RawEntityKey {
    fn resolve(&self) -> ParseResult<EntityKey> {
        match self {
            Self::Number(n) => Ok(EntityKey(*n)),
            Self::Text(s) => s.parse(),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default = "default_mutability")]
    pub mutability: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

fn default_mutability() -> String {
    Mutability::Mutable.as_str().to_string()
}

impl Document {
    /// Parse canonical document JSON
    pub fn parse(raw: &str) -> ParseResult<Document> {
        let raw: RawDocument = serde_json::from_str(raw)?;
        Document::from_raw(raw)
    }

    /// Serialize to canonical document JSON
    pub fn to_json(&self) -> String {
        // Raw documents contain only strings, integers and JSON objects
        serde_json::to_string(&self.to_raw()).unwrap_or_else(|e| {
            tracing::error!(error = %e, "document serialization failed");
            String::from("{\"blocks\":[],\"entityMap\":{}}")
        })
    }

    /// Serialize to indented canonical document JSON
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.to_raw()).unwrap_or_else(|_| self.to_json())
    }

    pub fn from_raw(raw: RawDocument) -> ParseResult<Document> {
        let mut entity_map = EntityMap::new();
        for (key, entity) in raw.entity_map {
            let key: EntityKey = key.parse()?;
            let entity = Entity::new(
                entity.entity_type.parse::<EntityType>()?,
                entity.mutability.parse::<Mutability>()?,
                entity.data,
            );
            entity_map.insert_with_key(key, entity)?;
        }

        let mut seen = HashSet::new();
        let mut blocks = Vec::with_capacity(raw.blocks.len());
        let mut unkeyed = Vec::new();

        for raw_block in raw.blocks {
            let key = raw_block.key.clone().unwrap_or_default();
            let block = block_from_raw(key.clone(), raw_block, &entity_map)?;
            if key.is_empty() {
                unkeyed.push(blocks.len());
            } else if !seen.insert(key.clone()) {
                return Err(ParseError::DuplicateBlockKey { key });
            }
            blocks.push(block);
        }

        let mut doc = Document::from_parts(blocks, entity_map);
        for index in unkeyed {
            let key = doc.generate_block_key();
            if let Some(block) = doc.block_mut(index) {
                block.set_key(key);
            }
        }
        Ok(doc)
    }

    pub fn to_raw(&self) -> RawDocument {
        let blocks = self
            .blocks()
            .iter()
            .map(|block| RawBlock {
                key: Some(block.key().to_string()),
                text: block.text().to_string(),
                block_type: block.block_type().as_str().to_string(),
                depth: block.depth(),
                inline_style_ranges: block
                    .inline_style_ranges()
                    .into_iter()
                    .map(|range| RawInlineStyleRange {
                        offset: range.offset,
                        length: range.length,
                        style: range.style,
                    })
                    .collect(),
                entity_ranges: block
                    .entity_ranges()
                    .into_iter()
                    .map(|range| RawEntityRange {
                        offset: range.offset,
                        length: range.length,
                        key: RawEntityKey::Number(range.key.0),
                    })
                    .collect(),
                data: block.data().clone(),
            })
            .collect();

        let entity_map = self
            .entity_map()
            .iter()
            .map(|(key, entity)| {
                (
                    key.to_string(),
                    RawEntity {
                        entity_type: entity.entity_type.as_str().to_string(),
                        mutability: entity.mutability.as_str().to_string(),
                        data: entity.data.clone(),
                    },
                )
            })
            .collect();

        RawDocument { blocks, entity_map }
    }
}

fn block_from_raw(key: String, raw: RawBlock, entities: &EntityMap) -> ParseResult<Block> {
    let block_type =
        BlockType::from_name(&raw.block_type).ok_or_else(|| ParseError::UnknownBlockType {
            block: key.clone(),
            block_type: raw.block_type.clone(),
        })?;

    let text_len = utf16_len(&raw.text);
    let mut characters = vec![CharacterMetadata::plain(); text_len];

    let check_bounds = |offset: usize, length: usize| -> ParseResult<()> {
        match offset.checked_add(length) {
            Some(end) if end <= text_len => Ok(()),
            _ => Err(ParseError::RangeOutOfBounds {
                block: key.clone(),
                offset,
                length,
                text_len,
            }),
        }
    };

    for range in &raw.inline_style_ranges {
        check_bounds(range.offset, range.length)?;
        for meta in &mut characters[range.offset..range.offset + range.length] {
            meta.style.insert(range.style.clone());
        }
    }

    for range in &raw.entity_ranges {
        check_bounds(range.offset, range.length)?;
        let entity_key = range.key.resolve()?;
        if !entities.contains(entity_key) {
            return Err(ParseError::UnknownEntityKey {
                block: key.clone(),
                key: range.key.describe(),
            });
        }
        for (idx, meta) in characters[range.offset..range.offset + range.length]
            .iter_mut()
            .enumerate()
        {
            if meta.entity.is_some() {
                return Err(ParseError::OverlappingEntityRanges {
                    block: key.clone(),
                    offset: range.offset + idx,
                });
            }
            meta.entity = Some(entity_key);
        }
    }

    Ok(Block::from_parts(
        key,
        block_type,
        raw.text,
        characters,
        raw.depth,
        raw.data,
    ))
}
