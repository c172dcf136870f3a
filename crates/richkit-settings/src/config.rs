//! Configuration and settings management for Richkit
//!
//! Provides configuration file handling, settings management, and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Toolbar defaults (which buttons, in which order)
//! - Export settings (file name, MIME type, output directory)
//! - Print settings (page title and stylesheet values)
//! - Logging (filter level, output format)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Application directory name under the platform config directory
pub const APP_DIR_NAME: &str = "richkit";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Toolbar button ids shown when the host does not pass its own list
pub const DEFAULT_TOOLBAR_BUTTONS: [&str; 14] = [
    "HEADING",
    "BOLD",
    "ITALIC",
    "UNDERLINE",
    "LINK",
    "LEFT",
    "CENTER",
    "RIGHT",
    "EXPORT_WORD",
    "IMAGE",
    "UNORDERED_LIST",
    "ORDERED_LIST",
    "FULLSCREEN",
    "PRINT",
];

/// Toolbar settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolbarSettings {
    /// Button ids in display order; unknown ids are skipped by the editor
    pub buttons: Vec<String>,
}

impl Default for ToolbarSettings {
    fn default() -> Self {
        Self {
            buttons: DEFAULT_TOOLBAR_BUTTONS.iter().map(|id| id.to_string()).collect(),
        }
    }
}

/// Word export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Name of the downloaded file
    pub file_name: String,
    /// MIME type reported with the file
    pub mime_type: String,
    /// Directory the command-line host writes exports to
    pub output_directory: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: "document.doc".to_string(),
            mime_type: "application/msword".to_string(),
            output_directory: dirs::document_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Print view settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintSettings {
    /// Title of the print window
    pub title: String,
    /// CSS font family of the body
    pub font_family: String,
    /// CSS line height of the body
    pub line_height: f64,
    /// Body margin in pixels
    pub margin_px: u32,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            title: "Print Document".to_string(),
            font_family: "Arial, sans-serif".to_string(),
            line_height: 1.6,
            margin_px: 20,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human readable output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Output format
    #[serde(default)]
    pub format: LogFormat,
    /// Include the event target in output
    #[serde(default = "default_true")]
    pub with_target: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            with_target: true,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Toolbar defaults
    #[serde(default)]
    pub toolbar: ToolbarSettings,
    /// Export settings
    #[serde(default)]
    pub export: ExportSettings,
    /// Print settings
    #[serde(default)]
    pub print: PrintSettings,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )
            .into()),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load config from `path` when it exists, otherwise return defaults
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        // Validate export settings
        if self.export.file_name.trim().is_empty() {
            return Err(ConfigError::EmptyValue("export.file_name".to_string()).into());
        }

        if self.export.mime_type.trim().is_empty() {
            return Err(ConfigError::EmptyValue("export.mime_type".to_string()).into());
        }

        // Validate print settings
        if self.print.line_height.is_nan() || self.print.line_height <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "print.line_height".to_string(),
                value: self.print.line_height.to_string(),
            }
            .into());
        }

        if self.print.font_family.contains(['<', '>', '{', '}', ';']) {
            return Err(SettingsError::InvalidSetting {
                key: "print.font_family".to_string(),
                reason: "must be a plain CSS font list".to_string(),
            });
        }

        // Validate logging settings
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::EmptyValue("logging.level".to_string()).into());
        }

        Ok(())
    }
}

/// Platform config file location, e.g. `~/.config/richkit/config.toml`
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| {
        SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
    })?;
    path.push(APP_DIR_NAME);
    path.push(CONFIG_FILE_NAME);
    Ok(path)
}
