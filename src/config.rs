//! User configuration, read once at launch.
//!
//! Every field has a default so a partial (or absent) `config.json` is
//! always usable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::model::StorageLocation;

/// Drags whose width or height do not exceed this are treated as clicks.
pub const DEFAULT_SELECTION_THRESHOLD: f64 = 5.0;

pub const DEFAULT_CAPTURE_HOTKEY: &str = "control+shift+KeyA";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub selection: SelectionStyle,
    pub quick_access: QuickAccessStyle,
    pub storage_location: StorageLocation,
    /// Global shortcut in `global-hotkey` syntax, e.g. `control+shift+KeyA`.
    pub capture_hotkey: String,
    /// Tesseract language code(s), e.g. `eng` or `eng+deu`.
    pub ocr_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            selection: SelectionStyle::default(),
            quick_access: QuickAccessStyle::default(),
            storage_location: StorageLocation::Default,
            capture_hotkey: DEFAULT_CAPTURE_HOTKEY.to_string(),
            ocr_language: "eng".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionStyle {
    pub min_selection_size: f64,
    /// Alpha of the black mask drawn outside the selection.
    pub dim_alpha: f64,
    pub handle_size: f64,
    pub border_width: f64,
    pub badge_font_size: f64,
    pub readout_font_size: f64,
    pub show_crosshair: bool,
    pub show_info_panel: bool,
}

impl Default for SelectionStyle {
    fn default() -> Self {
        SelectionStyle {
            min_selection_size: DEFAULT_SELECTION_THRESHOLD,
            dim_alpha: 0.45,
            handle_size: 8.0,
            border_width: 1.5,
            badge_font_size: 12.0,
            readout_font_size: 11.0,
            show_crosshair: true,
            show_info_panel: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickAccessStyle {
    pub card_width: f64,
    pub thumbnail_height: f64,
    pub button_height: f64,
    pub padding: f64,
    pub spacing: f64,
    /// Gap between the card and the capture it is anchored to.
    pub margin: f64,
    pub font_size: f64,
}

impl Default for QuickAccessStyle {
    fn default() -> Self {
        QuickAccessStyle {
            card_width: 300.0,
            thumbnail_height: 168.0,
            button_height: 40.0,
            padding: 10.0,
            spacing: 6.0,
            margin: 16.0,
            font_size: 11.0,
        }
    }
}

impl Config {
    /// `<config_dir>/quickshot/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quickshot").join("config.json"))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the config at `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Config::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load the user config, falling back to defaults when it is unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Config::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("ignoring config at {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let s = &self.selection;
        if !(0.0..=1.0).contains(&s.dim_alpha) {
            return Err(Error::InvalidConfig(format!(
                "selection.dim_alpha must be within 0..=1, got {}",
                s.dim_alpha
            )));
        }
        if s.min_selection_size < 0.0 {
            return Err(Error::InvalidConfig(
                "selection.min_selection_size must not be negative".into(),
            ));
        }
        let q = &self.quick_access;
        if q.card_width <= q.padding * 2.0 {
            return Err(Error::InvalidConfig(
                "quick_access.card_width must leave room inside the padding".into(),
            ));
        }
        Ok(())
    }
}
