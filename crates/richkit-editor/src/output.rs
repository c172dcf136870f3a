//! Export and print side effects
//!
//! The serializers in [`crate::html`] only build strings. Delivering them is
//! the job of an [`ExportSink`] or a [`PrintSurface`] supplied by the host.

use std::fs;
use std::path::{Path, PathBuf};

use richkit_core::Document;
use richkit_settings::{ExportSettings, PrintSettings};
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult, PrintStage};
use crate::html::{to_export_html, to_print_html_with};

pub const EXPORT_FILE_NAME: &str = "document.doc";
pub const EXPORT_MIME_TYPE: &str = "application/msword";

/// A file ready to hand to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: String,
    pub content: String,
}

impl ExportedFile {
    /// Word export of `doc` under the default name
    pub fn word(doc: &Document) -> Self {
        Self {
            file_name: EXPORT_FILE_NAME.to_string(),
            mime_type: EXPORT_MIME_TYPE.to_string(),
            content: to_export_html(doc),
        }
    }

    /// Word export of `doc` named according to `settings`
    pub fn word_with(doc: &Document, settings: &ExportSettings) -> Self {
        Self {
            file_name: settings.file_name.clone(),
            mime_type: settings.mime_type.clone(),
            content: to_export_html(doc),
        }
    }
}

/// Receives exported files
pub trait ExportSink {
    fn deliver(&mut self, file: &ExportedFile) -> EditorResult<()>;
}

/// Writes exported files into a directory
#[derive(Debug, Clone)]
pub struct DirectoryExportSink {
    dir: PathBuf,
    last_written: Option<PathBuf>,
}

impl DirectoryExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_written: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the most recently delivered file
    pub fn last_written(&self) -> Option<&Path> {
        self.last_written.as_deref()
    }
}

impl ExportSink for DirectoryExportSink {
    fn deliver(&mut self, file: &ExportedFile) -> EditorResult<()> {
        // Only the final path component is honoured
        let name = Path::new(&file.file_name).file_name().ok_or_else(|| {
            EditorError::ExportFailed(format!("invalid file name: {}", file.file_name))
        })?;
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, &file.content)
            .map_err(|e| EditorError::ExportFailed(format!("{}: {}", path.display(), e)))?;
        tracing::info!(path = %path.display(), bytes = file.content.len(), "document exported");
        self.last_written = Some(path);
        Ok(())
    }
}

/// Build the Word export of `doc` and hand it to `sink`
pub fn export_document(doc: &Document, sink: &mut dyn ExportSink) -> EditorResult<ExportedFile> {
    let file = ExportedFile::word(doc);
    sink.deliver(&file)?;
    Ok(file)
}

/// A printable window or device
///
/// [`print_document`] drives the steps in order: open, write, print, close.
pub trait PrintSurface {
    fn open(&mut self) -> EditorResult<()>;
    fn write(&mut self, html: &str) -> EditorResult<()>;
    fn print(&mut self) -> EditorResult<()>;
    fn close(&mut self) -> EditorResult<()>;
}

/// Print `doc` with the default print settings
pub fn print_document(doc: &Document, surface: &mut dyn PrintSurface) -> EditorResult<()> {
    print_document_with(doc, &PrintSettings::default(), surface)
}

/// Print `doc`; the surface is closed even when writing or printing fails
pub fn print_document_with(
    doc: &Document,
    settings: &PrintSettings,
    surface: &mut dyn PrintSurface,
) -> EditorResult<()> {
    let html = to_print_html_with(doc, settings);
    surface.open()?;
    let outcome = surface.write(&html).and_then(|()| surface.print());
    let closed = surface.close();
    outcome.and(closed)
}

/// Print surface that "prints" by writing the page to a file
#[derive(Debug)]
pub struct FilePrintSurface {
    path: PathBuf,
    page: Option<String>,
}

impl FilePrintSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            page: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn page_mut(&mut self, stage: PrintStage) -> EditorResult<&mut String> {
        self.page.as_mut().ok_or(EditorError::PrintFailed {
            stage,
            reason: "surface is not open".to_string(),
        })
    }
}

impl PrintSurface for FilePrintSurface {
    fn open(&mut self) -> EditorResult<()> {
        if self.page.is_some() {
            return Err(EditorError::PrintFailed {
                stage: PrintStage::Open,
                reason: "surface already open".to_string(),
            });
        }
        self.page = Some(String::new());
        Ok(())
    }

    fn write(&mut self, html: &str) -> EditorResult<()> {
        self.page_mut(PrintStage::Write)?.push_str(html);
        Ok(())
    }

    fn print(&mut self) -> EditorResult<()> {
        let page = self.page_mut(PrintStage::Print)?.clone();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, page).map_err(|e| EditorError::PrintFailed {
            stage: PrintStage::Print,
            reason: e.to_string(),
        })?;
        tracing::info!(path = %self.path.display(), "print page written");
        Ok(())
    }

    fn close(&mut self) -> EditorResult<()> {
        self.page = None;
        Ok(())
    }
}
