//! # Richkit Core
//!
//! Document model for the Richkit rich-text editor.
//! Provides immutable document snapshots, the entity registry,
//! selection resolution, the canonical JSON form and decorator resolution.

pub mod block;
pub mod decorators;
pub mod document;
pub mod entity;
pub mod error;
pub mod raw;
pub mod selection;
pub mod style;
pub mod text;

pub use block::{
    Block, BlockType, EntityRange, InlineStyleRange, TextAlign, ATOMIC_PLACEHOLDER, TEXT_ALIGN_KEY,
};

pub use decorators::{resolve_decorations, resolve_decorations_for, DecoratorSpan};

pub use document::Document;

pub use entity::{Entity, EntityKey, EntityMap, EntityType, Mutability, MAX_ENTITY_KEY};

pub use error::{DocumentError, ParseError, ParseResult, Result};

pub use raw::RawDocument;

pub use selection::{Selection, SelectionRange};

pub use style::{CharacterMetadata, InlineStyle, InlineStyleSet};
