//! Document snapshots
//!
//! A [`Document`] is an ordered list of blocks plus the entity registry they
//! reference. Documents are values: cloning one is cheap because blocks are
//! reference counted, and writing through [`Document::block_mut`] copies only
//! the block being changed. Every transformation therefore yields a new
//! snapshot while earlier snapshots stay untouched.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

use crate::block::Block;
use crate::entity::{Entity, EntityKey, EntityMap, EntityType, Mutability};
use crate::error::{DocumentError, Result};
use crate::text::utf16_len;

const KEY_ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";
const KEY_LEN: usize = 5;
const KEY_SPACE: u64 = 1 << (5 * KEY_LEN);

/// Immutable document snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    blocks: Vec<Arc<Block>>,
    entity_map: EntityMap,
}

impl Document {
    /// One empty `unstyled` block and no entities
    pub fn create_empty() -> Self {
        let mut doc = Self {
            blocks: Vec::new(),
            entity_map: EntityMap::new(),
        };
        let key = doc.generate_block_key();
        doc.blocks.push(Arc::new(Block::empty(key)));
        doc
    }

    /// Build a document from blocks with unique keys
    ///
    /// An empty list yields [`Document::create_empty`].
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        debug_assert_eq!(
            blocks.iter().map(Block::key).collect::<HashSet<_>>().len(),
            blocks.len(),
            "block keys must be unique"
        );
        Self::from_parts(blocks, EntityMap::new())
    }

    pub(crate) fn from_parts(blocks: Vec<Block>, entity_map: EntityMap) -> Self {
        if blocks.is_empty() {
            let mut doc = Self::create_empty();
            doc.entity_map = entity_map;
            return doc;
        }
        Self {
            blocks: blocks.into_iter().map(Arc::new).collect(),
            entity_map,
        }
    }

    pub fn blocks(&self) -> &[Arc<Block>] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn first_block(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn last_block(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.blocks.iter().position(|block| block.key() == key)
    }

    pub fn block_for_key(&self, key: &str) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|block| block.key() == key)
            .map(Arc::as_ref)
    }

    /// Block lookup that reports a missing key as an error
    pub fn get_block(&self, key: &str) -> Result<&Block> {
        self.block_for_key(key)
            .ok_or_else(|| DocumentError::BlockNotFound {
                key: key.to_string(),
            })
    }

    pub fn block_before(&self, key: &str) -> Option<&Block> {
        let index = self.index_of(key)?;
        index
            .checked_sub(1)
            .and_then(|prev| self.blocks.get(prev))
            .map(Arc::as_ref)
    }

    pub fn block_after(&self, key: &str) -> Option<&Block> {
        let index = self.index_of(key)?;
        self.blocks.get(index + 1).map(Arc::as_ref)
    }

    /// Blocks from `start_key` through `end_key`, inclusive
    pub fn blocks_in_range(&self, start_key: &str, end_key: &str) -> Vec<&Block> {
        match (self.index_of(start_key), self.index_of(end_key)) {
            (Some(start), Some(end)) if start <= end => {
                self.blocks[start..=end].iter().map(Arc::as_ref).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Writable access to one block, copying it if it is shared
    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index).map(Arc::make_mut)
    }

    /// Insert `block` at `index`; the key must not already be in use
    pub fn insert_block(&mut self, index: usize, block: Block) {
        debug_assert!(self.index_of(block.key()).is_none());
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, Arc::new(block));
    }

    pub fn entity_map(&self) -> &EntityMap {
        &self.entity_map
    }

    /// Append an entity, returning the updated document and the new key
    pub fn create_entity(
        &self,
        entity_type: EntityType,
        mutability: Mutability,
        data: Map<String, Value>,
    ) -> (Document, EntityKey) {
        let mut next = self.clone();
        let key = next.add_entity(Entity::new(entity_type, mutability, data));
        (next, key)
    }

    /// Append an entity to this document in place
    pub fn add_entity(&mut self, entity: Entity) -> EntityKey {
        self.entity_map.add(entity)
    }

    pub fn get_entity(&self, key: EntityKey) -> Result<&Entity> {
        self.entity_map.get(key)
    }

    /// Entity of the character at `offset` in the block at `index`
    pub fn entity_at(&self, index: usize, offset: usize) -> Option<&Entity> {
        let key = self.blocks.get(index)?.entity_at(offset)?;
        self.entity_map.get(key).ok()
    }

    /// Text of all blocks joined by newlines
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Total length in UTF-16 units, excluding block separators
    pub fn text_len(&self) -> usize {
        self.blocks.iter().map(|block| utf16_len(block.text())).sum()
    }

    /// A block key not used by any block in this document
    ///
    /// Keys are derived from the document itself so that actions remain pure:
    /// the same document always yields the same key.
    pub fn generate_block_key(&self) -> String {
        let used: HashSet<&str> = self.blocks.iter().map(|block| block.key()).collect();
        let mut seed = (self.blocks.len() as u64) + self.entity_map.next_key().0 * 7919;
        loop {
            let key = encode_key(seed);
            if !used.contains(key.as_str()) {
                return key;
            }
            seed += 1;
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::create_empty()
    }
}

/// Spread sequential seeds over the key space so keys do not look sequential
fn encode_key(seed: u64) -> String {
    let mut n = seed.wrapping_mul(0x9E37_79B9).wrapping_add(0x2545_F491) % KEY_SPACE;
    let mut key = [0u8; KEY_LEN];
    for slot in key.iter_mut().rev() {
        *slot = KEY_ALPHABET[(n % 32) as usize];
        n /= 32;
    }
    key.iter().map(|b| *b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;

    #[test]
    fn test_create_empty() {
        let doc = Document::create_empty();
        assert_eq!(doc.block_count(), 1);
        let block = doc.first_block();
        assert_eq!(block.block_type(), BlockType::Unstyled);
        assert!(block.is_empty());
        assert!(block.inline_style_ranges().is_empty());
        assert!(doc.entity_map().is_empty());
    }

    #[test]
    fn test_generated_keys_are_unique_and_stable() {
        let doc = Document::from_blocks(vec![
            Block::new("a", BlockType::Unstyled, "one"),
            Block::new("b", BlockType::Unstyled, "two"),
        ]);
        let key = doc.generate_block_key();
        assert_eq!(key.len(), 5);
        assert_eq!(key, doc.generate_block_key());
        assert!(doc.index_of(&key).is_none());
    }

    #[test]
    fn test_generated_key_skips_used_keys() {
        let probe = Document::from_blocks(vec![Block::new("x", BlockType::Unstyled, "")]);
        let taken = probe.generate_block_key();
        let doc = Document::from_blocks(vec![Block::new(taken.clone(), BlockType::Unstyled, "")]);
        assert_ne!(doc.generate_block_key(), taken);
    }

    #[test]
    fn test_create_entity_leaves_original_untouched() {
        let doc = Document::create_empty();
        let (next, key) = doc.create_entity(EntityType::Link, Mutability::Mutable, Map::new());
        assert_eq!(key, EntityKey(0));
        assert!(doc.get_entity(key).is_err());
        assert_eq!(next.get_entity(key).unwrap().entity_type, EntityType::Link);
    }

    #[test]
    fn test_block_mut_copies_shared_blocks() {
        let doc = Document::from_blocks(vec![Block::new("a", BlockType::Unstyled, "text")]);
        let mut edited = doc.clone();
        edited
            .block_mut(0)
            .unwrap()
            .set_block_type(BlockType::HeaderOne);
        assert_eq!(doc.first_block().block_type(), BlockType::Unstyled);
        assert_eq!(edited.first_block().block_type(), BlockType::HeaderOne);
    }

    #[test]
    fn test_neighbours_and_ranges() {
        let doc = Document::from_blocks(vec![
            Block::new("a", BlockType::Unstyled, "one"),
            Block::new("b", BlockType::Unstyled, "two"),
            Block::new("c", BlockType::Unstyled, "three"),
        ]);
        assert_eq!(doc.block_before("b").map(Block::key), Some("a"));
        assert_eq!(doc.block_after("c").map(Block::key), None);
        assert_eq!(doc.blocks_in_range("a", "b").len(), 2);
        assert!(doc.blocks_in_range("c", "a").is_empty());
        assert_eq!(doc.plain_text(), "one\ntwo\nthree");
        assert!(doc.get_block("zz").is_err());
    }
}
