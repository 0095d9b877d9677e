//! Shell configuration, loaded from an optional JSON file.

use std::fs;
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use tabula::combobox::ComboboxConfig;
use tabula::dataview::DataViewConfig;

use crate::error::ShellError;

/// Terminal size the shell lays its document out for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Screen {
    pub width: i32,
    pub height: i32,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            width: 100,
            height: 30,
        }
    }
}

/// Everything the shell reads from `config.json`.
///
/// Every field is optional in the file; missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`
    pub log_level: String,
    /// Platform string for shortcut conventions (`"MacIntel"`, `"Win32"`).
    /// Falls back to the build target.
    pub platform: Option<String>,
    pub screen: Screen,
    pub products: DataViewConfig,
    pub status_filter: ComboboxConfig,
    pub actions: ComboboxConfig,
    pub palette: ComboboxConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            log_level: "debug".to_string(),
            platform: None,
            screen: Screen::default(),
            products: DataViewConfig::new()
                .page_size(5)
                .filter_path("name")
                .filter_path("sku")
                .filter_path("category.name")
                .filter_path("status")
                .filter_path("supplier.name"),
            status_filter: ComboboxConfig::select().placeholder("Any status"),
            actions: ComboboxConfig::dropdown_menu().placeholder("Actions"),
            palette: ComboboxConfig::search_palette(),
        }
    }
}

impl ShellConfig {
    /// Parse a configuration document.
    pub fn from_json(json: &str) -> Result<Self, ShellError> {
        serde_json::from_str(json).map_err(|e| ShellError::json("shell config", e))
    }

    /// Load a configuration file that must exist.
    pub fn load(path: &Path) -> Result<Self, ShellError> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| ShellError::json(path.display().to_string(), e))
    }

    /// Load a configuration file, or the defaults when there is none.
    pub fn load_or_default(path: &Path) -> Result<Self, ShellError> {
        if !path.exists() {
            log::info!("[config] {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Log level, `debug` when the configured name is not recognised.
    pub fn level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Debug)
    }
}
