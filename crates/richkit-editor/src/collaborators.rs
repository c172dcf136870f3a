//! Async collaborators owned by the host
//!
//! Reading an image, saving the document and writing the clipboard all leave
//! the engine. They are fire-and-forget from the editor's point of view: the
//! host awaits them and feeds the result back as a command or a message.

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;

use crate::error::{EditorError, EditorResult};

/// Build a `data:` URI from raw bytes
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Turns an image file into a data URI the editor can embed
#[async_trait]
pub trait ImageReader: Send + Sync {
    async fn read_data_uri(&self, path: &Path) -> EditorResult<String>;
}

/// Reads images from the local file system
#[derive(Debug, Clone, Default)]
pub struct FsImageReader {
    max_bytes: Option<u64>,
}

impl FsImageReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject files larger than `max_bytes`
    pub fn with_limit(max_bytes: u64) -> Self {
        Self {
            max_bytes: Some(max_bytes),
        }
    }
}

#[async_trait]
impl ImageReader for FsImageReader {
    async fn read_data_uri(&self, path: &Path) -> EditorResult<String> {
        let read_error = |reason: String| EditorError::ImageRead {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(limit) = self.max_bytes {
            let size = tokio::fs::metadata(path)
                .await
                .map_err(|e| read_error(e.to_string()))?
                .len();
            if size > limit {
                return Err(read_error(format!("{size} bytes exceeds limit of {limit}")));
            }
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| read_error(e.to_string()))?;
        let format = image::guess_format(&bytes)
            .map_err(|_| EditorError::UnsupportedImage(path.display().to_string()))?;

        tracing::debug!(path = %path.display(), format = ?format, bytes = bytes.len(), "image read");
        Ok(data_uri(format.to_mime_type(), &bytes))
    }
}

/// Result of a save, shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed(String),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }

    /// User-facing message
    pub fn message(&self) -> String {
        match self {
            Self::Saved => "Content saved successfully!".to_string(),
            Self::Failed(reason) => format!("Failed to save content: {reason}"),
        }
    }
}

/// Persists document JSON somewhere outside the editor
#[async_trait]
pub trait SaveHandler: Send + Sync {
    async fn save(&self, document_json: String) -> EditorResult<()>;
}

/// Writes plain text to the system clipboard
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    async fn write_text(&self, text: String) -> EditorResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri("image/png", b"\0\0\0"), "data:image/png;base64,AAAA");
    }

    #[tokio::test]
    async fn test_fs_reader_detects_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.bin");
        tokio::fs::write(&path, PNG_HEADER).await.unwrap();

        let uri = FsImageReader::new().read_data_uri(&path).await.unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_fs_reader_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, "just text").await.unwrap();

        let result = FsImageReader::new().read_data_uri(&path).await;
        assert!(matches!(result, Err(EditorError::UnsupportedImage(_))));
    }

    #[tokio::test]
    async fn test_fs_reader_enforces_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        tokio::fs::write(&path, PNG_HEADER).await.unwrap();

        let result = FsImageReader::with_limit(4).read_data_uri(&path).await;
        assert!(matches!(result, Err(EditorError::ImageRead { .. })));
    }

    #[test]
    fn test_save_outcome_message() {
        assert_eq!(SaveOutcome::Saved.message(), "Content saved successfully!");
        assert!(!SaveOutcome::Failed("offline".into()).is_saved());
    }
}
