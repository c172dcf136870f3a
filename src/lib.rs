//! # Richkit
//!
//! Embeddable rich-text document engine with:
//! - Immutable block documents with per-character styles and entities
//! - Toolbar actions: inline styles, headings, lists, alignment, links, images
//! - Print view and Word-compatible HTML export
//! - A controller that reconciles host-supplied values with the edited document
//!
//! ## Architecture
//!
//! Richkit is organized as a workspace with multiple crates:
//!
//! 1. **richkit-core** - Document model, entities, selection, JSON form, decorators
//! 2. **richkit-editor** - Actions, HTML serializers, toolbar model, controller
//! 3. **richkit-settings** - Configuration and file persistence
//! 4. **richkit** - This crate: re-exports, logging setup and the `richkit` binary

pub use richkit_core::{
    resolve_decorations, resolve_decorations_for, Block, BlockType, DecoratorSpan, Document,
    DocumentError, Entity, EntityKey, EntityMap, EntityType, InlineStyle, InlineStyleSet,
    Mutability, ParseError, Selection, TextAlign,
};

pub use richkit_editor::{
    BlockState, ButtonId, DirectoryExportSink, DispatchOutcome, EditorController, EditorError,
    EditorProps, EditorResult, ExportSink, ExportedFile, FilePrintSurface, FsImageReader,
    ImageReader, PrintSurface, ToolbarCommand, ToolbarConfig, ToolbarRenderer,
};

pub use richkit_settings::{
    default_config_path, Config, ExportSettings, LogFormat, LoggingSettings, PrintSettings,
    SettingsError, ToolbarSettings,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging from the logging section of the configuration
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr so command output on stdout stays machine-readable.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)?,
    };

    match settings.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(settings.with_target)
                .with_level(true)
                .with_line_number(true)
                .pretty();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(settings.with_target)
                .json();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
