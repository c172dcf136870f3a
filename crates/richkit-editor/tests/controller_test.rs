use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use richkit_core::{BlockType, Document, InlineStyle, Selection};
use richkit_editor::{
    ClipboardWriter, DirectoryExportSink, EditorController, EditorError, EditorProps,
    EditorResult, FilePrintSurface, ImageReader, SaveHandler, ToolbarCommand,
};
use richkit_settings::Config;

const HELLO: &str = r#"{"blocks":[{"key":"h","text":"Hello","type":"unstyled"}],"entityMap":{}}"#;

#[derive(Default)]
struct MemoryStore {
    saved: Mutex<Vec<String>>,
    offline: bool,
}

#[async_trait]
impl SaveHandler for MemoryStore {
    async fn save(&self, document_json: String) -> EditorResult<()> {
        if self.offline {
            return Err(EditorError::SaveFailed("offline".to_string()));
        }
        self.saved.lock().unwrap().push(document_json);
        Ok(())
    }
}

#[async_trait]
impl ClipboardWriter for MemoryStore {
    async fn write_text(&self, text: String) -> EditorResult<()> {
        self.saved.lock().unwrap().push(text);
        Ok(())
    }
}

struct FixedImage;

#[async_trait]
impl ImageReader for FixedImage {
    async fn read_data_uri(&self, _path: &Path) -> EditorResult<String> {
        Ok("data:image/png;base64,AAA".to_string())
    }
}

fn editable() -> EditorController {
    EditorController::new(EditorProps::new().with_initial_content(HELLO))
}

#[test]
fn test_controlled_editor_flushes_on_fullscreen_only() {
    let flushed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&flushed);
    let mut editor = EditorController::new(
        EditorProps::new()
            .with_value(HELLO)
            .with_on_change(move |json: String| sink.lock().unwrap().push(json)),
    );

    editor.set_selection(Selection::within("h", 0, 5));
    editor.dispatch(ToolbarCommand::ToggleInlineStyle(InlineStyle::Italic));
    assert!(flushed.lock().unwrap().is_empty());

    editor.dispatch(ToolbarCommand::ToggleFullscreen);
    editor.dispatch(ToolbarCommand::ToggleFullscreen);
    let flushed = flushed.lock().unwrap();
    assert_eq!(flushed.len(), 2);
    let doc = Document::parse(&flushed[0]).unwrap();
    assert!(doc.first_block().style_at(0).contains(&InlineStyle::Italic));
}

#[test]
fn test_read_only_editor_still_prints_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = EditorController::new(EditorProps::new().with_value(HELLO));
    assert!(editor.is_read_only());
    assert!(editor.render_toolbar().is_none());

    let mut sink = DirectoryExportSink::new(dir.path().join("out"));
    let file = editor.export(&mut sink).unwrap();
    let written = std::fs::read_to_string(sink.last_written().unwrap()).unwrap();
    assert_eq!(written, file.content);
    assert!(sink.last_written().unwrap().ends_with("document.doc"));

    let mut surface = FilePrintSurface::new(dir.path().join("print/page.html"));
    editor.print(&mut surface).unwrap();
    let page = std::fs::read_to_string(surface.path()).unwrap();
    assert!(page.contains("<p style=\"\">Hello</p>"));
}

#[test]
fn test_open_document_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    std::fs::write(&path, HELLO).unwrap();

    let editor = EditorController::open(&path, &Config::default()).unwrap();
    assert!(!editor.is_read_only());
    assert_eq!(editor.document().first_block().text(), "Hello");
    assert_eq!(editor.selection(), &Selection::collapsed("h", 0));

    std::fs::write(&path, "{\"blocks\":").unwrap();
    assert!(matches!(
        EditorController::open(&path, &Config::default()),
        Err(EditorError::Parse(_))
    ));
    assert!(matches!(
        EditorController::open(&dir.path().join("missing.json"), &Config::default()),
        Err(EditorError::Io(_))
    ));
}

#[test]
fn test_widget_changes_ignored_when_read_only() {
    let mut editor = EditorController::new(EditorProps::new().with_value(HELLO));
    editor.on_widget_change(Document::create_empty(), Selection::collapsed("h", 3));
    assert_eq!(editor.document().first_block().text(), "Hello");
    assert_eq!(editor.selection(), &Selection::collapsed("h", 3));
}

#[test]
fn test_heading_command_uses_toggle() {
    let mut editor = editable();
    editor.set_selection(Selection::collapsed("h", 1));
    editor.dispatch(ToolbarCommand::SetHeading(BlockType::HeaderFour));
    assert_eq!(editor.document().first_block().block_type(), BlockType::HeaderFour);
    editor.dispatch(ToolbarCommand::SetHeading(BlockType::HeaderFour));
    assert_eq!(editor.document().first_block().block_type(), BlockType::Unstyled);
}

#[tokio::test]
async fn test_insert_image_from_reader() {
    let mut editor = editable();
    editor.set_selection(Selection::collapsed("h", 5));
    assert!(editor
        .insert_image_from(&FixedImage, Path::new("ignored.png"))
        .await
        .unwrap());
    assert_eq!(editor.document().block_count(), 2);
    assert!(editor.print_html().contains("<img src=\"data:image/png;base64,AAA\""));
}

#[tokio::test]
async fn test_save_reports_outcome() {
    let editor = editable();
    let store = MemoryStore::default();
    let outcome = editor.save_with(&store).await;
    assert_eq!(outcome.message(), "Content saved successfully!");
    assert_eq!(store.saved.lock().unwrap()[0], editor.to_json());

    let offline = MemoryStore {
        offline: true,
        ..MemoryStore::default()
    };
    let outcome = editor.save_with(&offline).await;
    assert!(!outcome.is_saved());
    assert!(outcome.message().starts_with("Failed to save content:"));
}

#[tokio::test]
async fn test_copy_plain_text() {
    let editor = editable();
    let clipboard = MemoryStore::default();
    editor.copy_plain_text(&clipboard).await.unwrap();
    assert_eq!(clipboard.saved.lock().unwrap().as_slice(), ["Hello".to_string()]);
}
