//! Richkit Settings Crate
//!
//! Handles application configuration: toolbar defaults, export and print
//! settings, and logging, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, Config, ExportSettings, LogFormat, LoggingSettings, PrintSettings,
    ToolbarSettings, DEFAULT_TOOLBAR_BUTTONS,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
