//! Deck configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Configuration is
//! layered: stock defaults are overridden by the user's `config.toml`, which
//! is in turn overridden by command-line flags.
//!
//! ```text
//! stock defaults  →  <config-dir>/config.toml  →  --max-chars / --per-slide / --mode
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [layout]
//! aspect_ratio = [16, 9]    # width:height of the slide
//!
//! [presentation]
//! mode = "char-budget"      # or "fixed-count"
//! items_per_slide = 1       # used by fixed-count
//! max_chars = 200           # used by char-budget
//!
//! [presentation.slide]
//! background = "#000000"
//! font_face = "Arial"
//! font_size = 40
//! color = "#ffffff"
//! align = "center"          # left | center | right
//! valign = "middle"         # top | middle | bottom
//! title_italic = true
//!
//! [subtitle]
//! max_chars = 40
//!
//! [subtitle.slide]
//! background = "#00ff00"
//! font_face = "Arial"
//! font_size = 32
//! color = "#ffffff"
//! align = "center"
//! valign = "bottom"
//! title_italic = true
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::pack::{PackConfig, PackMode, SlideStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Deck configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckConfig {
    /// Slide geometry shared by both styles.
    pub layout: LayoutConfig,
    /// Packing and look of full-verse presentation slides.
    pub presentation: PresentationConfig,
    /// Packing and look of caption-style subtitle slides.
    pub subtitle: SubtitleConfig,
}

impl DeckConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.aspect_ratio[0] == 0 || self.layout.aspect_ratio[1] == 0 {
            return Err(ConfigError::Validation(
                "layout.aspect_ratio values must be non-zero".into(),
            ));
        }
        if self.presentation.items_per_slide == 0 {
            return Err(ConfigError::Validation(
                "presentation.items_per_slide must be at least 1".into(),
            ));
        }
        if self.presentation.max_chars == 0 {
            return Err(ConfigError::Validation(
                "presentation.max_chars must be at least 1".into(),
            ));
        }
        if self.subtitle.max_chars == 0 {
            return Err(ConfigError::Validation(
                "subtitle.max_chars must be at least 1".into(),
            ));
        }
        self.presentation.slide.validate("presentation.slide")?;
        self.subtitle.slide.validate("subtitle.slide")?;
        Ok(())
    }

    /// Packing parameters for one run in the given style.
    pub fn pack_config(&self, style: SlideStyle) -> PackConfig {
        match style {
            SlideStyle::Presentation => PackConfig {
                mode: self.presentation.mode,
                items_per_group: self.presentation.items_per_slide,
                max_chars_per_group: self.presentation.max_chars,
                style,
            },
            SlideStyle::Subtitle => PackConfig::subtitle(self.subtitle.max_chars),
        }
    }

    /// Slide look for the given style.
    pub fn theme(&self, style: SlideStyle) -> &SlideTheme {
        match style {
            SlideStyle::Presentation => &self.presentation.slide,
            SlideStyle::Subtitle => &self.subtitle.slide,
        }
    }
}

/// Slide geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Aspect ratio as `[width, height]`, e.g. `[16, 9]` or `[4, 3]`.
    pub aspect_ratio: [u32; 2],
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: [16, 9],
        }
    }
}

/// Presentation packing and slide look.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresentationConfig {
    pub mode: PackMode,
    /// Items per slide in `fixed-count` mode.
    pub items_per_slide: usize,
    /// Soft character budget per slide in `char-budget` mode.
    pub max_chars: usize,
    pub slide: SlideTheme,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            mode: PackMode::CharBudget,
            items_per_slide: 1,
            max_chars: 200,
            slide: SlideTheme::default_presentation(),
        }
    }
}

/// Subtitle wrapping and slide look.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubtitleConfig {
    /// Maximum characters per caption fragment.
    pub max_chars: usize,
    pub slide: SlideTheme,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            max_chars: 40,
            slide: SlideTheme::default_subtitle(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Visual settings applied to every slide of one style.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideTheme {
    /// Background color (`#rgb` or `#rrggbb`).
    pub background: String,
    pub font_face: String,
    /// Font size in points.
    pub font_size: u32,
    /// Text color (`#rgb` or `#rrggbb`).
    pub color: String,
    pub align: HAlign,
    pub valign: VAlign,
    /// Render section titles in italics.
    pub title_italic: bool,
}

impl SlideTheme {
    pub fn default_presentation() -> Self {
        Self {
            background: "#000000".to_string(),
            font_face: "Arial".to_string(),
            font_size: 40,
            color: "#ffffff".to_string(),
            align: HAlign::Center,
            valign: VAlign::Middle,
            title_italic: true,
        }
    }

    pub fn default_subtitle() -> Self {
        Self {
            background: "#00ff00".to_string(),
            font_face: "Arial".to_string(),
            font_size: 32,
            color: "#ffffff".to_string(),
            align: HAlign::Center,
            valign: VAlign::Bottom,
            title_italic: true,
        }
    }

    fn validate(&self, section: &str) -> Result<(), ConfigError> {
        if self.font_size == 0 {
            return Err(ConfigError::Validation(format!(
                "{section}.font_size must be non-zero"
            )));
        }
        if self.font_face.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{section}.font_face must not be empty"
            )));
        }
        for (key, value) in [("background", &self.background), ("color", &self.color)] {
            if !is_hex_color(value) {
                return Err(ConfigError::Validation(format!(
                    "{section}.{key} must be a hex color like #ffffff, got {value:?}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for SlideTheme {
    fn default() -> Self {
        Self::default_presentation()
    }
}

fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}

/// Command-line overrides, applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mode: Option<PackMode>,
    pub items_per_slide: Option<usize>,
    pub max_chars: Option<usize>,
}

impl Overrides {
    /// Render the overrides as a sparse TOML overlay for `style`.
    ///
    /// Returns `None` when no flag was given. `--mode` and `--per-slide`
    /// only exist for presentation slides and are rejected for subtitles.
    pub fn to_value(&self, style: SlideStyle) -> Result<Option<toml::Value>, ConfigError> {
        if style == SlideStyle::Subtitle {
            let presentation_only = [
                ("--mode", self.mode.is_some()),
                ("--per-slide", self.items_per_slide.is_some()),
            ];
            if let Some((flag, _)) = presentation_only.into_iter().find(|&(_, given)| given) {
                return Err(ConfigError::Validation(format!(
                    "{flag} applies to presentation slides only, not subtitle"
                )));
            }
        }

        let mut section = toml::Table::new();
        if let Some(mode) = self.mode {
            section.insert("mode".into(), toml::Value::try_from(mode)?);
        }
        if let Some(n) = self.items_per_slide {
            section.insert("items_per_slide".into(), toml_count("--per-slide", n)?);
        }
        if let Some(n) = self.max_chars {
            section.insert("max_chars".into(), toml_count("--max-chars", n)?);
        }
        if section.is_empty() {
            return Ok(None);
        }
        let mut root = toml::Table::new();
        root.insert(style.name().into(), toml::Value::Table(section));
        Ok(Some(toml::Value::Table(root)))
    }
}

fn toml_count(flag: &str, n: usize) -> Result<toml::Value, ConfigError> {
    i64::try_from(n)
        .map(toml::Value::Integer)
        .map_err(|_| ConfigError::Validation(format!("{flag} is too large: {n}")))
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(DeckConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    log::debug!("loaded config overlay from {}", config_path.display());
    Ok(Some(value))
}

/// Apply overlays in order onto `base`, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = Option<toml::Value>>,
) -> Result<DeckConfig, ConfigError> {
    let merged = overlays.into_iter().flatten().fold(base, merge_toml);
    let config: DeckConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<DeckConfig, ConfigError> {
    load_config_with(dir, &Overrides::default(), SlideStyle::Presentation)
}

/// Load config from `dir`, then apply command-line overrides for `style`.
pub fn load_config_with(
    dir: &Path,
    overrides: &Overrides,
    style: SlideStyle,
) -> Result<DeckConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let file = load_raw_config(dir)?;
    let flags = overrides.to_value(style)?;
    resolve_config(base, [file, flags])
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# verse-deck configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags (--mode, --per-slide, --max-chars) override these
# values for a single run. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[layout]
# Slide aspect ratio as [width, height]. Common choices: [16, 9], [4, 3].
aspect_ratio = [16, 9]

# ---------------------------------------------------------------------------
# Presentation slides (full verse text, grouped)
# ---------------------------------------------------------------------------
[presentation]
# "char-budget": fill each slide until the next verse would exceed max_chars.
# "fixed-count": put exactly items_per_slide verses/titles on each slide.
mode = "char-budget"

# Verses and titles per slide in fixed-count mode.
items_per_slide = 1

# Soft character budget per slide in char-budget mode. A verse longer than
# the budget gets a slide of its own and is never split.
max_chars = 200

[presentation.slide]
background = "#000000"
font_face = "Arial"
font_size = 40
color = "#ffffff"
align = "center"          # left | center | right
valign = "middle"         # top | middle | bottom
title_italic = true

# ---------------------------------------------------------------------------
# Subtitle slides (one caption fragment per slide)
# ---------------------------------------------------------------------------
[subtitle]
# Maximum characters per caption. Lines break between words only.
max_chars = 40

[subtitle.slide]
background = "#00ff00"    # chroma-key green for video overlays
font_face = "Arial"
font_size = 32
color = "#ffffff"
align = "center"
valign = "bottom"
title_italic = true
"##
}
