//! Error handling for Richkit documents
//!
//! Provides the error types for the document layer:
//! - Parse errors (malformed or structurally inconsistent document JSON)
//! - Document errors (entity dereference failures)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Document parse error type
///
/// Raised when an external document value cannot be turned into a
/// [`Document`](crate::Document). Callers recover locally by falling back
/// to an empty document.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The input is not valid JSON or does not have the raw document shape
    #[error("Malformed document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Two blocks share the same key
    #[error("Duplicate block key: {key}")]
    DuplicateBlockKey {
        /// The repeated block key.
        key: String,
    },

    /// A block declares a type this engine does not know
    #[error("Unknown block type '{block_type}' in block {block}")]
    UnknownBlockType {
        /// The block key.
        block: String,
        /// The unrecognized type name.
        block_type: String,
    },

    /// A style or entity range reaches past the end of its block
    #[error("Range {offset}+{length} exceeds length {text_len} of block {block}")]
    RangeOutOfBounds {
        /// The block key.
        block: String,
        /// Range start in UTF-16 units.
        offset: usize,
        /// Range length in UTF-16 units.
        length: usize,
        /// Block text length in UTF-16 units.
        text_len: usize,
    },

    /// Two entity ranges in one block cover the same character
    #[error("Overlapping entity ranges in block {block} at offset {offset}")]
    OverlappingEntityRanges {
        /// The block key.
        block: String,
        /// First overlapping offset.
        offset: usize,
    },

    /// An entity range points at a key missing from the entity map
    #[error("Block {block} references unknown entity {key}")]
    UnknownEntityKey {
        /// The block key.
        block: String,
        /// The dangling entity key.
        key: String,
    },

    /// An entity map key is not a non-negative integer
    #[error("Invalid entity key: {0}")]
    InvalidEntityKey(String),

    /// Two entity map keys name the same entity
    #[error("Duplicate entity key: {0}")]
    DuplicateEntityKey(u64),

    /// An entity declares a type this engine does not know
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// An entity declares an unknown mutability
    #[error("Unknown entity mutability: {0}")]
    UnknownMutability(String),
}

/// Document error type
///
/// Represents failures when dereferencing data inside a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Entity key is absent from the registry
    #[error("Entity {key} not found")]
    EntityNotFound {
        /// The missing entity key.
        key: u64,
    },

    /// Block key is absent from the document
    #[error("Block {key} not found")]
    BlockNotFound {
        /// The missing block key.
        key: String,
    },
}

/// Result type for parsing
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type for document lookups
pub type Result<T> = std::result::Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::DuplicateBlockKey {
            key: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Duplicate block key: abc");

        let err = ParseError::RangeOutOfBounds {
            block: "a1".to_string(),
            offset: 3,
            length: 5,
            text_len: 4,
        };
        assert_eq!(err.to_string(), "Range 3+5 exceeds length 4 of block a1");

        let err = ParseError::UnknownEntityType("MENTION".to_string());
        assert_eq!(err.to_string(), "Unknown entity type: MENTION");
    }

    #[test]
    fn test_document_error_display() {
        let err = DocumentError::EntityNotFound { key: 7 };
        assert_eq!(err.to_string(), "Entity 7 not found");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ParseError = json_err.into();
        assert!(matches!(err, ParseError::Json(_)));
    }
}
