//! Editor controller
//!
//! Reconciles the document being edited with the value supplied by the host.
//! The host either controls the editor (passes `value`, optionally with an
//! `on_change` callback) or leaves it uncontrolled (`initial_content` only).
//! A controlled value without a callback makes the editor read-only.
//!
//! Edits stay inside the controller. The current document reaches
//! `on_change` only when fullscreen is toggled, or when the host asks for it
//! through [`EditorController::to_json`] or a [`SaveHandler`].

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use richkit_core::{BlockType, Document, InlineStyle, Selection, TextAlign};
use richkit_settings::{Config, ExportSettings, PrintSettings};

use crate::actions;
use crate::collaborators::{ClipboardWriter, ImageReader, SaveHandler, SaveOutcome};
use crate::error::EditorResult;
use crate::html::to_print_html_with;
use crate::output::{print_document_with, ExportSink, ExportedFile, PrintSurface};
use crate::toolbar::{
    parse_toolbar, toolbar_items, ButtonId, ToolbarCommand, ToolbarConfig, ToolbarItem,
    ToolbarRenderer, ToolbarState,
};

/// Receives the document JSON
pub type ChangeCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Host-supplied editor properties
#[derive(Default)]
pub struct EditorProps {
    /// Controlled document JSON; empty means uncontrolled
    pub value: String,
    pub on_change: Option<ChangeCallback>,
    /// Document JSON used when `value` is empty
    pub initial_content: String,
    /// Toolbar button ids; `None` keeps the configured default
    pub toolbar_buttons: Option<Vec<String>>,
    /// Custom toolbar replacing the default one
    pub renderer: Option<Box<dyn ToolbarRenderer>>,
}

impl EditorProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    pub fn with_initial_content(mut self, content: impl Into<String>) -> Self {
        self.initial_content = content.into();
        self
    }

    pub fn with_toolbar_buttons<I, S>(mut self, buttons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.toolbar_buttons = Some(buttons.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_renderer(mut self, renderer: impl ToolbarRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }
}

impl fmt::Debug for EditorProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorProps")
            .field("value", &self.value)
            .field("on_change", &self.on_change.is_some())
            .field("initial_content", &self.initial_content)
            .field("toolbar_buttons", &self.toolbar_buttons)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

/// Whether edits are accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Editable,
    ReadOnly,
}

impl EditMode {
    fn from_props(props: &EditorProps) -> Self {
        if !props.value.is_empty() && props.on_change.is_none() {
            Self::ReadOnly
        } else {
            Self::Editable
        }
    }
}

/// Result of a dispatched toolbar command
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// State changed
    Applied,
    /// Read-only editor; nothing changed
    Ignored,
    /// Print page for the host's print surface
    Print(String),
    /// File for the host's export sink
    Export(ExportedFile),
}

fn parse_or_empty(raw: &str, source: &str) -> Document {
    Document::parse(raw).unwrap_or_else(|err| {
        tracing::warn!(source, error = %err, "unreadable document, starting empty");
        Document::create_empty()
    })
}

fn initial_document(props: &EditorProps) -> Document {
    if !props.value.is_empty() {
        parse_or_empty(&props.value, "value")
    } else if !props.initial_content.is_empty() {
        parse_or_empty(&props.initial_content, "initial_content")
    } else {
        Document::create_empty()
    }
}

/// State machine behind one editor instance
pub struct EditorController {
    document: Document,
    selection: Selection,
    mode: EditMode,
    last_value: String,
    on_change: Option<ChangeCallback>,
    buttons: Vec<ButtonId>,
    toolbar: ToolbarState,
    renderer: Option<Box<dyn ToolbarRenderer>>,
    export_settings: ExportSettings,
    print_settings: PrintSettings,
}

impl EditorController {
    pub fn new(props: EditorProps) -> Self {
        Self::with_config(props, &Config::default())
    }

    /// Controller whose toolbar, export and print defaults come from `config`
    pub fn with_config(props: EditorProps, config: &Config) -> Self {
        let document = initial_document(&props);
        let selection = Selection::at_start(&document);
        let buttons = match &props.toolbar_buttons {
            Some(ids) => parse_toolbar(ids),
            None => parse_toolbar(&config.toolbar.buttons),
        };
        Self {
            mode: EditMode::from_props(&props),
            last_value: props.value,
            on_change: props.on_change,
            renderer: props.renderer,
            document,
            selection,
            buttons,
            toolbar: ToolbarState::default(),
            export_settings: config.export.clone(),
            print_settings: config.print.clone(),
        }
    }

    /// Editable controller over the document stored at `path`
    ///
    /// Unlike host properties, an unreadable or malformed file is an error.
    pub fn open(path: &Path, config: &Config) -> EditorResult<Self> {
        let raw = fs::read_to_string(path)?;
        let document = Document::parse(&raw)?;
        tracing::debug!(
            path = %path.display(),
            blocks = document.block_count(),
            "document opened"
        );
        let mut controller = Self::with_config(EditorProps::new(), config);
        controller.selection = Selection::at_start(&document);
        controller.document = document;
        Ok(controller)
    }

    /// Apply new host properties
    ///
    /// A changed, non-empty `value` replaces the document and moves the cursor
    /// to the start. An unparseable value is logged and the current document
    /// is kept.
    pub fn update_props(&mut self, props: EditorProps) {
        self.mode = EditMode::from_props(&props);
        self.on_change = props.on_change;
        if let Some(ids) = &props.toolbar_buttons {
            self.buttons = parse_toolbar(ids);
        }
        if props.renderer.is_some() {
            self.renderer = props.renderer;
        }

        if props.value.is_empty() || props.value == self.last_value {
            return;
        }
        match Document::parse(&props.value) {
            Ok(document) => {
                self.selection = Selection::at_start(&document);
                self.document = document;
            }
            Err(err) => {
                tracing::error!(error = %err, "invalid editor value format");
            }
        }
        self.last_value = props.value;
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == EditMode::ReadOnly
    }

    pub fn is_fullscreen(&self) -> bool {
        self.toolbar.fullscreen
    }

    pub fn buttons(&self) -> &[ButtonId] {
        &self.buttons
    }

    pub fn toolbar_state(&self) -> &ToolbarState {
        &self.toolbar
    }

    /// Canonical JSON of the current document
    pub fn to_json(&self) -> String {
        self.document.to_json()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Edit event from the editing surface
    pub fn on_widget_change(&mut self, document: Document, selection: Selection) {
        self.selection = selection;
        if self.is_read_only() {
            tracing::debug!("read-only editor, ignoring document change");
            return;
        }
        self.document = document;
    }

    /// Replace the document wholesale
    pub fn set_document(&mut self, document: Document) -> bool {
        if self.is_read_only() {
            tracing::debug!("read-only editor, ignoring set_document");
            return false;
        }
        self.document = document;
        true
    }

    fn apply<F>(&mut self, action: &'static str, f: F) -> bool
    where
        F: FnOnce(&Document, &Selection) -> Document,
    {
        if self.is_read_only() {
            tracing::debug!(action, "read-only editor, ignoring action");
            return false;
        }
        self.document = f(&self.document, &self.selection);
        true
    }

    pub fn toggle_inline_style(&mut self, style: &InlineStyle) -> bool {
        self.apply("toggle_inline_style", |doc, sel| {
            actions::toggle_inline_style(doc, sel, style)
        })
    }

    pub fn toggle_block_type(&mut self, block_type: BlockType) -> bool {
        self.apply("toggle_block_type", |doc, sel| {
            actions::toggle_block_type(doc, sel, block_type)
        })
    }

    pub fn set_heading(&mut self, heading: BlockType) -> bool {
        self.apply("set_heading", |doc, sel| actions::set_heading(doc, sel, heading))
    }

    pub fn toggle_unordered_list(&mut self) -> bool {
        self.apply("toggle_unordered_list", actions::toggle_unordered_list)
    }

    pub fn toggle_ordered_list(&mut self) -> bool {
        self.apply("toggle_ordered_list", actions::toggle_ordered_list)
    }

    pub fn set_text_align(&mut self, align: TextAlign) -> bool {
        self.apply("set_text_align", |doc, sel| {
            actions::set_text_align(doc, sel, align)
        })
    }

    pub fn add_link(&mut self, url: &str) -> bool {
        self.apply("add_link", |doc, sel| actions::add_link(doc, sel, url))
    }

    pub fn remove_link(&mut self) -> bool {
        self.apply("remove_link", actions::remove_link)
    }

    pub fn insert_image(&mut self, src: &str) -> bool {
        self.apply("insert_image", |doc, sel| actions::insert_image(doc, sel, src))
    }

    /// Read `path` with `reader` and insert it as an image
    pub async fn insert_image_from(
        &mut self,
        reader: &dyn ImageReader,
        path: &Path,
    ) -> EditorResult<bool> {
        let src = reader.read_data_uri(path).await?;
        Ok(self.insert_image(&src))
    }

    pub fn show_link_input(&mut self, show: bool) {
        self.toolbar.show_link_input = show;
    }

    pub fn set_link_url(&mut self, url: impl Into<String>) {
        self.toolbar.link_url = url.into();
    }

    /// Apply the pending link URL and close the link input
    pub fn submit_link(&mut self) -> bool {
        let url = std::mem::take(&mut self.toolbar.link_url);
        self.toolbar.show_link_input = false;
        self.add_link(&url)
    }

    /// Flip fullscreen and hand the current document to `on_change`
    pub fn toggle_fullscreen(&mut self) {
        self.toolbar.fullscreen = !self.toolbar.fullscreen;
        if let Some(on_change) = &self.on_change {
            on_change(self.document.to_json());
        }
    }

    pub fn print_html(&self) -> String {
        to_print_html_with(&self.document, &self.print_settings)
    }

    pub fn export_file(&self) -> ExportedFile {
        ExportedFile::word_with(&self.document, &self.export_settings)
    }

    /// Print through `surface`; available in read-only mode
    pub fn print(&self, surface: &mut dyn PrintSurface) -> EditorResult<()> {
        print_document_with(&self.document, &self.print_settings, surface)
    }

    /// Export through `sink`; available in read-only mode
    pub fn export(&self, sink: &mut dyn ExportSink) -> EditorResult<ExportedFile> {
        let file = self.export_file();
        sink.deliver(&file)?;
        Ok(file)
    }

    /// Hand the document JSON to `handler`
    pub async fn save_with(&self, handler: &dyn SaveHandler) -> SaveOutcome {
        match handler.save(self.document.to_json()).await {
            Ok(()) => SaveOutcome::Saved,
            Err(err) => {
                tracing::error!(error = %err, "saving content failed");
                SaveOutcome::Failed(err.to_string())
            }
        }
    }

    /// Copy the plain text of the document to `clipboard`
    pub async fn copy_plain_text(&self, clipboard: &dyn ClipboardWriter) -> EditorResult<()> {
        clipboard.write_text(self.document.plain_text()).await
    }

    pub fn toolbar_config(&self) -> ToolbarConfig {
        ToolbarConfig::build(&self.document, &self.selection, &self.toolbar)
    }

    /// Button states of the default toolbar; empty when read-only
    pub fn toolbar_items(&self) -> Vec<ToolbarItem> {
        if self.is_read_only() {
            return Vec::new();
        }
        toolbar_items(
            &self.document,
            &self.selection,
            &self.buttons,
            self.toolbar.fullscreen,
        )
    }

    /// Run the custom renderer and dispatch its commands
    ///
    /// Returns `None` when the editor is read-only or has no custom renderer.
    pub fn render_toolbar(&mut self) -> Option<Vec<DispatchOutcome>> {
        if self.is_read_only() {
            return None;
        }
        let mut renderer = self.renderer.take()?;
        let config = self.toolbar_config();
        let commands = renderer.render(&self.document, &config);
        self.renderer = Some(renderer);
        Some(commands.into_iter().map(|cmd| self.dispatch(cmd)).collect())
    }

    /// Apply one toolbar command
    pub fn dispatch(&mut self, command: ToolbarCommand) -> DispatchOutcome {
        let applied = match command {
            ToolbarCommand::ToggleInlineStyle(style) => self.toggle_inline_style(&style),
            ToolbarCommand::SetTextAlign(align) => self.set_text_align(align),
            ToolbarCommand::SetHeading(heading) => self.set_heading(heading),
            ToolbarCommand::ToggleUnorderedList => self.toggle_unordered_list(),
            ToolbarCommand::ToggleOrderedList => self.toggle_ordered_list(),
            ToolbarCommand::ShowLinkInput(show) => {
                self.show_link_input(show);
                true
            }
            ToolbarCommand::SetLinkUrl(url) => {
                self.set_link_url(url);
                true
            }
            ToolbarCommand::SubmitLink => self.submit_link(),
            ToolbarCommand::RemoveLink => self.remove_link(),
            ToolbarCommand::InsertImage(src) => self.insert_image(&src),
            ToolbarCommand::ToggleFullscreen => {
                self.toggle_fullscreen();
                true
            }
            ToolbarCommand::Print => return DispatchOutcome::Print(self.print_html()),
            ToolbarCommand::Export => return DispatchOutcome::Export(self.export_file()),
            ToolbarCommand::SetDocument(document) => self.set_document(document),
        };
        if applied {
            DispatchOutcome::Applied
        } else {
            DispatchOutcome::Ignored
        }
    }
}
