//! Selection state
//!
//! The selection is owned by the editing surface and handed to every action
//! next to the document. A document never stores one.

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Anchor/focus selection, offsets in UTF-16 units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub anchor_key: String,
    pub anchor_offset: usize,
    pub focus_key: String,
    pub focus_offset: usize,
}

/// Selection resolved against a document, in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start_index: usize,
    pub start_offset: usize,
    pub end_index: usize,
    pub end_offset: usize,
}

impl Selection {
    pub fn new(
        anchor_key: impl Into<String>,
        anchor_offset: usize,
        focus_key: impl Into<String>,
        focus_offset: usize,
    ) -> Self {
        Self {
            anchor_key: anchor_key.into(),
            anchor_offset,
            focus_key: focus_key.into(),
            focus_offset,
        }
    }

    /// Cursor at `offset` in block `key`
    pub fn collapsed(key: impl Into<String>, offset: usize) -> Self {
        let key = key.into();
        Self::new(key.clone(), offset, key, offset)
    }

    /// Selection covering `start..end` of a single block
    pub fn within(key: impl Into<String>, start: usize, end: usize) -> Self {
        let key = key.into();
        Self::new(key.clone(), start, key, end)
    }

    /// Cursor at the start of the first block
    pub fn at_start(doc: &Document) -> Self {
        Self::collapsed(doc.first_block().key(), 0)
    }

    /// Cursor at the end of the last block
    pub fn at_end(doc: &Document) -> Self {
        let last = doc.last_block();
        Self::collapsed(last.key(), last.len())
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    /// Resolve block keys to indices and order the endpoints
    ///
    /// Offsets are clamped to their block length. Returns `None` when either
    /// key is not part of `doc`.
    pub fn resolve(&self, doc: &Document) -> Option<SelectionRange> {
        let anchor_index = doc.index_of(&self.anchor_key)?;
        let focus_index = doc.index_of(&self.focus_key)?;
        let anchor_offset = self.anchor_offset.min(doc.blocks()[anchor_index].len());
        let focus_offset = self.focus_offset.min(doc.blocks()[focus_index].len());

        let anchor = (anchor_index, anchor_offset);
        let focus = (focus_index, focus_offset);
        let (start, end) = if anchor <= focus {
            (anchor, focus)
        } else {
            (focus, anchor)
        };

        Some(SelectionRange {
            start_index: start.0,
            start_offset: start.1,
            end_index: end.0,
            end_offset: end.1,
        })
    }

    /// Whether the anchor sits after the focus in `doc`
    pub fn is_backward(&self, doc: &Document) -> bool {
        match (doc.index_of(&self.anchor_key), doc.index_of(&self.focus_key)) {
            (Some(a), Some(f)) => (a, self.anchor_offset) > (f, self.focus_offset),
            _ => false,
        }
    }
}

impl SelectionRange {
    pub fn is_collapsed(&self) -> bool {
        self.start_index == self.end_index && self.start_offset == self.end_offset
    }

    /// Character range covered inside the block at `index`
    pub fn range_in_block(&self, index: usize, block_len: usize) -> std::ops::Range<usize> {
        let start = if index == self.start_index {
            self.start_offset
        } else {
            0
        };
        let end = if index == self.end_index {
            self.end_offset
        } else {
            block_len
        };
        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, BlockType};

    fn two_blocks() -> Document {
        Document::from_blocks(vec![
            Block::new("a", BlockType::Unstyled, "Hello"),
            Block::new("b", BlockType::Unstyled, "World"),
        ])
    }

    #[test]
    fn test_collapsed() {
        assert!(Selection::collapsed("a", 3).is_collapsed());
        assert!(!Selection::within("a", 1, 3).is_collapsed());
    }

    #[test]
    fn test_resolve_orders_backward_selection() {
        let doc = two_blocks();
        let sel = Selection::new("b", 2, "a", 4);
        assert!(sel.is_backward(&doc));
        let range = sel.resolve(&doc).unwrap();
        assert_eq!(
            range,
            SelectionRange {
                start_index: 0,
                start_offset: 4,
                end_index: 1,
                end_offset: 2
            }
        );
        assert_eq!(range.range_in_block(0, 5), 4..5);
        assert_eq!(range.range_in_block(1, 5), 0..2);
    }

    #[test]
    fn test_resolve_clamps_offsets_and_rejects_unknown_keys() {
        let doc = two_blocks();
        let range = Selection::within("a", 2, 40).resolve(&doc).unwrap();
        assert_eq!(range.end_offset, 5);
        assert!(Selection::collapsed("zz", 0).resolve(&doc).is_none());
    }

    #[test]
    fn test_at_end() {
        let doc = two_blocks();
        assert_eq!(Selection::at_end(&doc), Selection::collapsed("b", 5));
    }
}
