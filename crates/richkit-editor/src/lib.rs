//! # Richkit Editor
//!
//! Editing engine built on top of `richkit-core`.
//!
//! ## Components
//!
//! ### Actions
//! - Pure `(document, selection, args) -> document` transformations
//! - Inline style and block type toggles, alignment, links and images
//! - Toolbar state queries: current inline style, block state, active link
//!
//! ### Serializers
//! - Paragraph-per-block HTML for printing and Word export
//!
//! ### Output
//! - [`ExportSink`] and [`PrintSurface`] deliver serialized documents
//!
//! ### Toolbar
//! - Button ids, heading options and the descriptor handed to custom renderers
//!
//! ### Controller
//! - [`EditorController`] reconciles the host's value with the document being edited
//!
//! ## Usage
//!
//! ```rust,ignore
//! use richkit_editor::{EditorController, EditorProps};
//! use richkit_core::{BlockType, Selection};
//!
//! let mut editor = EditorController::new(EditorProps::new().with_initial_content(json));
//! editor.set_selection(Selection::collapsed("a1b2c", 0));
//! editor.toggle_block_type(BlockType::HeaderOne);
//! let page = editor.print_html();
//! ```

pub mod actions;
pub mod collaborators;
pub mod controller;
pub mod error;
pub mod html;
pub mod output;
pub mod toolbar;

pub use actions::{
    add_link, current_block_type, current_inline_style, insert_image, is_link_active,
    remove_link, set_heading, set_text_align, toggle_block_type, toggle_inline_style,
    toggle_ordered_list, toggle_unordered_list, BlockState,
};
pub use collaborators::{
    data_uri, ClipboardWriter, FsImageReader, ImageReader, SaveHandler, SaveOutcome,
};
pub use controller::{ChangeCallback, DispatchOutcome, EditMode, EditorController, EditorProps};
pub use error::{EditorError, EditorResult, PrintStage};
pub use html::{
    blocks_to_html, escape_html, escape_url, to_export_html, to_print_html, to_print_html_with,
};
pub use output::{
    export_document, print_document, print_document_with, DirectoryExportSink, ExportSink,
    ExportedFile, FilePrintSurface, PrintSurface, EXPORT_FILE_NAME, EXPORT_MIME_TYPE,
};
pub use toolbar::{
    default_toolbar, heading_options, parse_toolbar, toolbar_items, ActionDescriptor, ButtonId,
    HeadingDescriptor, HeadingOption, LinkDescriptor, ToolbarCommand, ToolbarConfig, ToolbarItem,
    ToolbarRenderer, ToolbarState,
};
