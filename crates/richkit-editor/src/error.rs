//! Error types for the editor crate.
//!
//! Document transformations never fail; a skipped precondition returns the
//! input document unchanged. These errors cover the side-effecting edges:
//! document files, export and print sinks, image reads and saving.

use richkit_core::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during editor operations.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The exported file could not be delivered.
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// A print surface step failed.
    #[error("Print failed during {stage}: {reason}")]
    PrintFailed { stage: PrintStage, reason: String },

    /// An image file could not be read.
    #[error("Failed to read image {path}: {reason}")]
    ImageRead { path: PathBuf, reason: String },

    /// The file is not an image format the editor can embed.
    #[error("Unsupported image format: {0}")]
    UnsupportedImage(String),

    /// The save handler reported a failure.
    #[error("Save failed: {0}")]
    SaveFailed(String),

    /// A document value could not be parsed.
    #[error("Document error: {0}")]
    Parse(#[from] ParseError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Step of the print sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintStage {
    Open,
    Write,
    Print,
    Close,
}

impl std::fmt::Display for PrintStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Write => write!(f, "write"),
            Self::Print => write!(f, "print"),
            Self::Close => write!(f, "close"),
        }
    }
}

/// Result type alias for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_error_display() {
        let err = EditorError::ExportFailed("disk full".to_string());
        assert_eq!(err.to_string(), "Export failed: disk full");

        let err = EditorError::PrintFailed {
            stage: PrintStage::Write,
            reason: "closed".to_string(),
        };
        assert_eq!(err.to_string(), "Print failed during write: closed");

        let err = EditorError::UnsupportedImage("text/plain".to_string());
        assert_eq!(err.to_string(), "Unsupported image format: text/plain");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let ed_err: EditorError = io_err.into();
        assert!(matches!(ed_err, EditorError::Io(_)));

        let parse_err = ParseError::InvalidEntityKey("x".to_string());
        let ed_err: EditorError = parse_err.into();
        assert!(matches!(ed_err, EditorError::Parse(_)));
    }
}
