//! Decorator resolution
//!
//! Computes which character runs the editing surface must render as a link
//! or an image instead of plain text. Resolution is a pure function of the
//! document and is recomputed after every edit; nothing is cached between
//! calls because each action replaces the document wholesale.

use crate::document::Document;
use crate::entity::{EntityKey, EntityType};

/// A run of characters rendered through an entity-specific component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratorSpan {
    pub block_key: String,
    /// Start offset in UTF-16 units, inclusive
    pub start: usize,
    /// End offset in UTF-16 units, exclusive
    pub end: usize,
    pub entity_key: EntityKey,
    pub entity_type: EntityType,
}

/// Entity types that have a decorator, in resolution order
pub const DECORATED_TYPES: [EntityType; 2] = [EntityType::Link, EntityType::Image];

/// Spans for every decorated entity type, ordered by block then start offset
pub fn resolve_decorations(doc: &Document) -> Vec<DecoratorSpan> {
    let mut spans: Vec<DecoratorSpan> = Vec::new();
    for (index, _) in doc.blocks().iter().enumerate() {
        let mut block_spans: Vec<DecoratorSpan> = DECORATED_TYPES
            .iter()
            .flat_map(|entity_type| spans_in_block(doc, index, *entity_type))
            .collect();
        block_spans.sort_by_key(|span| span.start);
        spans.extend(block_spans);
    }
    spans
}

/// Spans whose entity has type `entity_type`
pub fn resolve_decorations_for(doc: &Document, entity_type: EntityType) -> Vec<DecoratorSpan> {
    (0..doc.block_count())
        .flat_map(|index| spans_in_block(doc, index, entity_type))
        .collect()
}

fn spans_in_block(doc: &Document, index: usize, entity_type: EntityType) -> Vec<DecoratorSpan> {
    let block = &doc.blocks()[index];
    block
        .find_entity_ranges(|key| match doc.get_entity(key) {
            Ok(entity) => entity.entity_type == entity_type,
            Err(err) => {
                debug_assert!(false, "dangling entity reference: {err}");
                tracing::error!(block = block.key(), error = %err, "dangling entity reference");
                false
            }
        })
        .into_iter()
        .map(|(range, entity_key)| DecoratorSpan {
            block_key: block.key().to_string(),
            start: range.start,
            end: range.end,
            entity_key,
            entity_type,
        })
        .collect()
}
