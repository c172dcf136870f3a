//! Content blocks
//!
//! A block is one paragraph, list item, heading or atomic unit. Text is kept
//! as a `String` alongside one [`CharacterMetadata`] per UTF-16 unit; style
//! and entity ranges are derived from that list on demand, always as maximal
//! runs, so two blocks with the same visible formatting compare equal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::entity::EntityKey;
use crate::style::{CharacterMetadata, InlineStyle, InlineStyleSet};
use crate::text::{utf16_len, utf16_to_byte};

/// Data key holding a block's text alignment
pub const TEXT_ALIGN_KEY: &str = "textAlign";

/// Placeholder text of atomic blocks
pub const ATOMIC_PLACEHOLDER: &str = " ";

/// Block type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    #[default]
    Unstyled,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    UnorderedListItem,
    OrderedListItem,
    Blockquote,
    CodeBlock,
    /// Non-text unit (image) carried by one placeholder character
    Atomic,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unstyled => "unstyled",
            Self::HeaderOne => "header-one",
            Self::HeaderTwo => "header-two",
            Self::HeaderThree => "header-three",
            Self::HeaderFour => "header-four",
            Self::HeaderFive => "header-five",
            Self::HeaderSix => "header-six",
            Self::UnorderedListItem => "unordered-list-item",
            Self::OrderedListItem => "ordered-list-item",
            Self::Blockquote => "blockquote",
            Self::CodeBlock => "code-block",
            Self::Atomic => "atomic",
        }
    }

    /// Look up a type by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        let block_type = match name {
            "unstyled" => Self::Unstyled,
            "header-one" => Self::HeaderOne,
            "header-two" => Self::HeaderTwo,
            "header-three" => Self::HeaderThree,
            "header-four" => Self::HeaderFour,
            "header-five" => Self::HeaderFive,
            "header-six" => Self::HeaderSix,
            "unordered-list-item" => Self::UnorderedListItem,
            "ordered-list-item" => Self::OrderedListItem,
            "blockquote" => Self::Blockquote,
            "code-block" => Self::CodeBlock,
            "atomic" => Self::Atomic,
            _ => return None,
        };
        Some(block_type)
    }

    /// Heading types in level order, `unstyled` first
    pub fn heading_options() -> [BlockType; 7] {
        [
            Self::Unstyled,
            Self::HeaderOne,
            Self::HeaderTwo,
            Self::HeaderThree,
            Self::HeaderFour,
            Self::HeaderFive,
            Self::HeaderSix,
        ]
    }

    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            Self::HeaderOne
                | Self::HeaderTwo
                | Self::HeaderThree
                | Self::HeaderFour
                | Self::HeaderFive
                | Self::HeaderSix
        )
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Horizontal alignment stored under `data.textAlign`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl FromStr for TextAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown text alignment: {other}")),
        }
    }
}

/// Inline style range in wire form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: InlineStyle,
}

/// Entity range in wire form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: EntityKey,
}

/// One block of a document
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    key: String,
    block_type: BlockType,
    text: String,
    characters: Vec<CharacterMetadata>,
    depth: u32,
    data: BTreeMap<String, String>,
}

impl Block {
    /// Create a block of `block_type` with unstyled text
    pub fn new(key: impl Into<String>, block_type: BlockType, text: impl Into<String>) -> Self {
        let text = text.into();
        let characters = vec![CharacterMetadata::plain(); utf16_len(&text)];
        Self {
            key: key.into(),
            block_type,
            text,
            characters,
            depth: 0,
            data: BTreeMap::new(),
        }
    }

    /// Empty `unstyled` block
    pub fn empty(key: impl Into<String>) -> Self {
        Self::new(key, BlockType::Unstyled, "")
    }

    /// Atomic block whose placeholder character references `entity`
    pub fn atomic(key: impl Into<String>, entity: EntityKey) -> Self {
        let mut block = Self::new(key, BlockType::Atomic, ATOMIC_PLACEHOLDER);
        for meta in &mut block.characters {
            meta.entity = Some(entity);
        }
        block
    }

    pub(crate) fn from_parts(
        key: String,
        block_type: BlockType,
        text: String,
        characters: Vec<CharacterMetadata>,
        depth: u32,
        data: BTreeMap<String, String>,
    ) -> Self {
        debug_assert_eq!(characters.len(), utf16_len(&text));
        Self {
            key,
            block_type,
            text,
            characters,
            depth,
            data,
        }
    }

    pub(crate) fn set_key(&mut self, key: String) {
        self.key = key;
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in UTF-16 units
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    pub fn characters(&self) -> &[CharacterMetadata] {
        &self.characters
    }

    /// Alignment from `data.textAlign`, ignoring unknown values
    pub fn text_align(&self) -> Option<TextAlign> {
        self.data
            .get(TEXT_ALIGN_KEY)
            .and_then(|value| value.parse().ok())
    }

    /// Styles at `offset`; empty past the end of the block
    pub fn style_at(&self, offset: usize) -> InlineStyleSet {
        self.characters
            .get(offset)
            .map(|meta| meta.style.clone())
            .unwrap_or_default()
    }

    /// Entity at `offset`, if any
    pub fn entity_at(&self, offset: usize) -> Option<EntityKey> {
        self.characters.get(offset).and_then(|meta| meta.entity)
    }

    /// Canonical style ranges, ordered by offset then style name
    pub fn inline_style_ranges(&self) -> Vec<InlineStyleRange> {
        let styles: InlineStyleSet = self
            .characters
            .iter()
            .flat_map(|meta| meta.style.iter().cloned())
            .collect();

        let mut ranges = Vec::new();
        for style in styles {
            let mut start = None;
            for (idx, meta) in self.characters.iter().enumerate() {
                match (meta.has_style(&style), start) {
                    (true, None) => start = Some(idx),
                    (false, Some(s)) => {
                        ranges.push(InlineStyleRange {
                            offset: s,
                            length: idx - s,
                            style: style.clone(),
                        });
                        start = None;
                    }
                    _ => {}
                }
            }
            if let Some(s) = start {
                ranges.push(InlineStyleRange {
                    offset: s,
                    length: self.characters.len() - s,
                    style: style.clone(),
                });
            }
        }

        ranges.sort_by(|a, b| {
            a.offset
                .cmp(&b.offset)
                .then_with(|| a.style.as_str().cmp(b.style.as_str()))
        });
        ranges
    }

    /// Canonical entity ranges, ordered by offset
    pub fn entity_ranges(&self) -> Vec<EntityRange> {
        self.find_entity_ranges(|_| true)
            .into_iter()
            .map(|(range, key)| EntityRange {
                offset: range.start,
                length: range.end - range.start,
                key,
            })
            .collect()
    }

    /// Maximal runs of characters sharing one entity key accepted by `filter`
    pub fn find_entity_ranges<F>(&self, mut filter: F) -> Vec<(Range<usize>, EntityKey)>
    where
        F: FnMut(EntityKey) -> bool,
    {
        let mut runs = Vec::new();
        let mut current: Option<(usize, EntityKey)> = None;

        for (idx, meta) in self.characters.iter().enumerate() {
            let accepted = meta.entity.filter(|key| filter(*key));
            match (current, accepted) {
                (Some((_, open)), Some(key)) if open == key => {}
                (Some((start, open)), next) => {
                    runs.push((start..idx, open));
                    current = next.map(|key| (idx, key));
                }
                (None, next) => current = next.map(|key| (idx, key)),
            }
        }
        if let Some((start, key)) = current {
            runs.push((start..self.characters.len(), key));
        }
        runs
    }

    pub fn set_block_type(&mut self, block_type: BlockType) {
        self.block_type = block_type;
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.set_data(TEXT_ALIGN_KEY, align.as_str());
    }

    /// Add or remove `style` on every character in `range`
    pub fn apply_style(&mut self, range: Range<usize>, style: &InlineStyle, add: bool) {
        let end = range.end.min(self.characters.len());
        let start = range.start.min(end);
        for meta in &mut self.characters[start..end] {
            if add {
                meta.style.insert(style.clone());
            } else {
                meta.style.remove(style);
            }
        }
    }

    /// Set the entity of every character in `range`
    pub fn apply_entity(&mut self, range: Range<usize>, entity: Option<EntityKey>) {
        self.replace_entities(range, |_| true, entity);
    }

    /// Clear entity references in `range` for which `matches` holds
    pub fn clear_entities<F>(&mut self, range: Range<usize>, matches: F)
    where
        F: FnMut(EntityKey) -> bool,
    {
        self.replace_entities(range, matches, None);
    }

    fn replace_entities<F>(&mut self, range: Range<usize>, mut matches: F, entity: Option<EntityKey>)
    where
        F: FnMut(EntityKey) -> bool,
    {
        let end = range.end.min(self.characters.len());
        let start = range.start.min(end);
        for meta in &mut self.characters[start..end] {
            if meta.entity.is_none_or(&mut matches) {
                meta.entity = entity;
            }
        }
    }

    /// Split at a UTF-16 offset, keeping the head in `self`
    ///
    /// The tail block takes `tail_key`, the same type, depth and data.
    pub fn split_off(&mut self, offset: usize, tail_key: impl Into<String>) -> Block {
        let (byte_idx, offset) = utf16_to_byte(&self.text, offset);
        let tail_text = self.text.split_off(byte_idx);
        let tail_chars = self.characters.split_off(offset);
        Block {
            key: tail_key.into(),
            block_type: self.block_type,
            text: tail_text,
            characters: tail_chars,
            depth: self.depth,
            data: self.data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(text: &str, styles: &[(Range<usize>, InlineStyle)]) -> Block {
        let mut block = Block::new("b1", BlockType::Unstyled, text);
        for (range, style) in styles {
            block.apply_style(range.clone(), style, true);
        }
        block
    }

    #[test]
    fn test_new_block_is_plain() {
        let block = Block::new("k", BlockType::HeaderTwo, "Hi there");
        assert_eq!(block.len(), 8);
        assert!(block.inline_style_ranges().is_empty());
        assert!(block.entity_ranges().is_empty());
        assert_eq!(block.block_type(), BlockType::HeaderTwo);
    }

    #[test]
    fn test_style_ranges_are_maximal_runs() {
        let block = styled(
            "Hello world",
            &[
                (0..3, InlineStyle::Bold),
                (3..5, InlineStyle::Bold),
                (6..11, InlineStyle::Italic),
                (0..2, InlineStyle::Underline),
            ],
        );
        let ranges = block.inline_style_ranges();
        assert_eq!(
            ranges,
            vec![
                InlineStyleRange {
                    offset: 0,
                    length: 5,
                    style: InlineStyle::Bold
                },
                InlineStyleRange {
                    offset: 0,
                    length: 2,
                    style: InlineStyle::Underline
                },
                InlineStyleRange {
                    offset: 6,
                    length: 5,
                    style: InlineStyle::Italic
                },
            ]
        );
    }

    #[test]
    fn test_remove_style_splits_run() {
        let mut block = styled("abcdef", &[(0..6, InlineStyle::Bold)]);
        block.apply_style(2..4, &InlineStyle::Bold, false);
        let ranges: Vec<_> = block
            .inline_style_ranges()
            .into_iter()
            .map(|r| (r.offset, r.length))
            .collect();
        assert_eq!(ranges, vec![(0, 2), (4, 2)]);
    }

    #[test]
    fn test_entity_runs_split_on_key_change() {
        let mut block = Block::new("k", BlockType::Unstyled, "linklink");
        block.apply_entity(0..4, Some(EntityKey(0)));
        block.apply_entity(4..8, Some(EntityKey(1)));
        let ranges = block.entity_ranges();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].key, EntityKey(0));
        assert_eq!((ranges[1].offset, ranges[1].length), (4, 4));
    }

    #[test]
    fn test_clear_entities_respects_filter() {
        let mut block = Block::new("k", BlockType::Unstyled, "abcd");
        block.apply_entity(0..2, Some(EntityKey(0)));
        block.apply_entity(2..4, Some(EntityKey(1)));
        block.clear_entities(0..4, |key| key == EntityKey(1));
        assert_eq!(block.entity_at(0), Some(EntityKey(0)));
        assert_eq!(block.entity_at(3), None);
    }

    #[test]
    fn test_split_off_keeps_metadata() {
        let mut block = styled("Hello", &[(0..5, InlineStyle::Bold)]);
        block.set_text_align(TextAlign::Center);
        let tail = block.split_off(2, "tail");
        assert_eq!(block.text(), "He");
        assert_eq!(tail.text(), "llo");
        assert_eq!(tail.key(), "tail");
        assert_eq!(tail.len(), 3);
        assert!(tail.style_at(0).contains(&InlineStyle::Bold));
        assert_eq!(tail.text_align(), Some(TextAlign::Center));
    }

    #[test]
    fn test_atomic_block() {
        let block = Block::atomic("img", EntityKey(4));
        assert_eq!(block.block_type(), BlockType::Atomic);
        assert_eq!(block.text(), ATOMIC_PLACEHOLDER);
        assert_eq!(
            block.entity_ranges(),
            vec![EntityRange {
                offset: 0,
                length: 1,
                key: EntityKey(4)
            }]
        );
    }

    #[test]
    fn test_block_type_names() {
        for block_type in BlockType::heading_options() {
            assert_eq!(BlockType::from_name(block_type.as_str()), Some(block_type));
        }
        assert_eq!(
            BlockType::from_name("ordered-list-item"),
            Some(BlockType::OrderedListItem)
        );
        assert_eq!(BlockType::from_name("table"), None);
    }
}
