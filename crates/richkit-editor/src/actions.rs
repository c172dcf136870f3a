//! Toolbar actions
//!
//! Every action takes the current document and selection and returns a new
//! document. Preconditions that do not hold are not errors: the input document
//! is returned unchanged and the skip is logged at debug level.

use std::fmt;
use std::ops::RangeInclusive;

use richkit_core::{
    Block, BlockType, Document, Entity, EntityType, InlineStyle, InlineStyleSet, Selection,
    SelectionRange, TextAlign,
};

fn skipped(action: &str, reason: &str, doc: &Document) -> Document {
    tracing::debug!(action, reason, "precondition not met, document unchanged");
    doc.clone()
}

/// Blocks an action touches
///
/// A selection spanning several blocks whose end sits at offset 0 does not
/// touch its last block.
fn touched_blocks(range: &SelectionRange) -> RangeInclusive<usize> {
    let end = if range.end_index > range.start_index && range.end_offset == 0 {
        range.end_index - 1
    } else {
        range.end_index
    };
    range.start_index..=end
}

/// Position of the first selected character, if the selection covers any
fn first_selected_char(doc: &Document, range: &SelectionRange) -> Option<(usize, usize)> {
    (range.start_index..=range.end_index).find_map(|index| {
        let block = &doc.blocks()[index];
        let covered = range.range_in_block(index, block.len());
        (!covered.is_empty()).then_some((index, covered.start))
    })
}

/// Last character of the closest non-empty block at or before `index`
fn last_char_before(doc: &Document, index: usize) -> Option<(usize, usize)> {
    (0..=index)
        .rev()
        .find(|i| !doc.blocks()[*i].is_empty())
        .map(|i| (i, doc.blocks()[i].len() - 1))
}

/// Character whose state the toolbar reflects
///
/// For a cursor this is the character before it, or the first character of
/// the block when the cursor is at offset 0. Empty blocks look upward.
fn sampled_char(doc: &Document, range: &SelectionRange) -> Option<(usize, usize)> {
    let block = &doc.blocks()[range.start_index];
    if !range.is_collapsed() {
        if let Some(position) = first_selected_char(doc, range) {
            return Some(position);
        }
    }
    if range.start_offset > 0 {
        Some((range.start_index, range.start_offset - 1))
    } else if !block.is_empty() {
        Some((range.start_index, 0))
    } else {
        range
            .start_index
            .checked_sub(1)
            .and_then(|prev| last_char_before(doc, prev))
    }
}

/// Add `style` to the selected text, or remove it when the first selected
/// character already carries it
pub fn toggle_inline_style(doc: &Document, selection: &Selection, style: &InlineStyle) -> Document {
    let Some(range) = selection.resolve(doc) else {
        return skipped("toggle_inline_style", "selection outside document", doc);
    };
    if range.is_collapsed() {
        return skipped("toggle_inline_style", "selection collapsed", doc);
    }
    let Some((index, offset)) = first_selected_char(doc, &range) else {
        return skipped("toggle_inline_style", "selection covers no characters", doc);
    };
    let add = !doc.blocks()[index].style_at(offset).contains(style);

    let mut next = doc.clone();
    for index in range.start_index..=range.end_index {
        let len = next.blocks()[index].len();
        let covered = range.range_in_block(index, len);
        if covered.is_empty() {
            continue;
        }
        if let Some(block) = next.block_mut(index) {
            block.apply_style(covered, style, add);
        }
    }
    next
}

/// Set `block_type` on every touched block, or reset them to `unstyled` when
/// the start block already has it
pub fn toggle_block_type(doc: &Document, selection: &Selection, block_type: BlockType) -> Document {
    let Some(range) = selection.resolve(doc) else {
        return skipped("toggle_block_type", "selection outside document", doc);
    };
    let touched = touched_blocks(&range);
    if touched
        .clone()
        .any(|index| doc.blocks()[index].block_type() == BlockType::Atomic)
    {
        return skipped("toggle_block_type", "selection touches an atomic block", doc);
    }

    let target = if doc.blocks()[range.start_index].block_type() == block_type {
        BlockType::Unstyled
    } else {
        block_type
    };

    let mut next = doc.clone();
    for index in touched {
        if let Some(block) = next.block_mut(index) {
            block.set_block_type(target);
        }
    }
    next
}

pub fn toggle_unordered_list(doc: &Document, selection: &Selection) -> Document {
    toggle_block_type(doc, selection, BlockType::UnorderedListItem)
}

pub fn toggle_ordered_list(doc: &Document, selection: &Selection) -> Document {
    toggle_block_type(doc, selection, BlockType::OrderedListItem)
}

/// Heading picker; picking the current heading again resets to `unstyled`
pub fn set_heading(doc: &Document, selection: &Selection, heading: BlockType) -> Document {
    toggle_block_type(doc, selection, heading)
}

/// Store `align` in the data of every touched block
pub fn set_text_align(doc: &Document, selection: &Selection, align: TextAlign) -> Document {
    let Some(range) = selection.resolve(doc) else {
        return skipped("set_text_align", "selection outside document", doc);
    };
    let mut next = doc.clone();
    for index in touched_blocks(&range) {
        if let Some(block) = next.block_mut(index) {
            block.set_text_align(align);
        }
    }
    next
}

/// Link the selected text to `url`
///
/// Atomic blocks inside the selection keep their own entity.
pub fn add_link(doc: &Document, selection: &Selection, url: &str) -> Document {
    if url.is_empty() {
        return skipped("add_link", "empty url", doc);
    }
    let Some(range) = selection.resolve(doc) else {
        return skipped("add_link", "selection outside document", doc);
    };
    if range.is_collapsed() {
        return skipped("add_link", "selection collapsed", doc);
    }

    let targets: Vec<_> = (range.start_index..=range.end_index)
        .filter_map(|index| {
            let block = &doc.blocks()[index];
            let covered = range.range_in_block(index, block.len());
            (!covered.is_empty() && block.block_type() != BlockType::Atomic)
                .then_some((index, covered))
        })
        .collect();
    if targets.is_empty() {
        return skipped("add_link", "selection covers no text", doc);
    }

    let mut next = doc.clone();
    let key = next.add_entity(Entity::link(url));
    for (index, covered) in targets {
        if let Some(block) = next.block_mut(index) {
            block.apply_entity(covered, Some(key));
        }
    }
    tracing::debug!(entity = %key, url, "link added");
    next
}

/// Detach link entities from the selected text
///
/// The entities stay in the registry; image references are left alone.
pub fn remove_link(doc: &Document, selection: &Selection) -> Document {
    let Some(range) = selection.resolve(doc) else {
        return skipped("remove_link", "selection outside document", doc);
    };
    if range.is_collapsed() {
        return skipped("remove_link", "selection collapsed", doc);
    }

    let mut next = doc.clone();
    for index in range.start_index..=range.end_index {
        let len = doc.blocks()[index].len();
        let covered = range.range_in_block(index, len);
        if covered.is_empty() {
            continue;
        }
        if let Some(block) = next.block_mut(index) {
            block.clear_entities(covered, |key| {
                doc.get_entity(key)
                    .is_ok_and(|entity| entity.entity_type == EntityType::Link)
            });
        }
    }
    next
}

/// Insert an atomic image block at the selection end
///
/// At a block boundary the image becomes a sibling of that block. Inside a
/// block the text is split and the image goes between the two halves; the
/// head keeps the original key. Selected text is not removed.
pub fn insert_image(doc: &Document, selection: &Selection, src: &str) -> Document {
    let (index, offset) = match selection.resolve(doc) {
        Some(range) => (range.end_index, range.end_offset),
        None => {
            tracing::debug!("selection outside document, inserting image at the end");
            let last = doc.block_count() - 1;
            (last, doc.blocks()[last].len())
        }
    };

    let mut next = doc.clone();
    let entity = next.add_entity(Entity::image(src));
    let block_len = next.blocks()[index].len();

    if block_len == 0 || offset >= block_len {
        let key = next.generate_block_key();
        next.insert_block(index + 1, Block::atomic(key, entity));
    } else if offset == 0 {
        let key = next.generate_block_key();
        next.insert_block(index, Block::atomic(key, entity));
    } else {
        let atomic_key = next.generate_block_key();
        next.insert_block(index + 1, Block::atomic(atomic_key, entity));
        let tail_key = next.generate_block_key();
        let tail = match next.block_mut(index) {
            Some(head) => head.split_off(offset, tail_key),
            None => return skipped("insert_image", "block vanished", doc),
        };
        next.insert_block(index + 2, tail);
    }
    next
}

/// Inline styles the toolbar shows as active
pub fn current_inline_style(doc: &Document, selection: &Selection) -> InlineStyleSet {
    selection
        .resolve(doc)
        .and_then(|range| sampled_char(doc, &range))
        .map(|(index, offset)| doc.blocks()[index].style_at(offset))
        .unwrap_or_default()
}

/// Whether the character the toolbar samples is part of a link
pub fn is_link_active(doc: &Document, selection: &Selection) -> bool {
    selection
        .resolve(doc)
        .and_then(|range| sampled_char(doc, &range))
        .and_then(|(index, offset)| doc.entity_at(index, offset))
        .is_some_and(|entity| entity.entity_type == EntityType::Link)
}

/// What the toolbar reports for the start block
///
/// An explicit alignment takes precedence over the block type, so a centered
/// heading reports `Align(Center)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    Align(TextAlign),
    Type(BlockType),
}

impl BlockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Align(align) => align.as_str(),
            Self::Type(block_type) => block_type.as_str(),
        }
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn current_block_type(doc: &Document, selection: &Selection) -> BlockState {
    let block = selection
        .resolve(doc)
        .map(|range| doc.blocks()[range.start_index].as_ref())
        .unwrap_or_else(|| doc.first_block());
    match block.text_align() {
        Some(align) => BlockState::Align(align),
        None => BlockState::Type(block.block_type()),
    }
}
