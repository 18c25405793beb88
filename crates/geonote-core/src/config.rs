//! Notebook configuration.
//!
//! The configuration is a plain JSON document with camelCase keys. Every
//! section and field has a default, so partial documents are accepted.

use crate::properties::MeasurementUnit;
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// RGBA8 color that serializes as a `#RRGGBB` or `#RRGGBBAA` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Format as a lowercase hex string, omitting alpha when opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Convert to a peniko color with an extra opacity multiplier.
    pub fn with_opacity(&self, opacity: f64) -> Color {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Color::from_rgba8(self.r, self.g, self.b, alpha)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl Serialize for SerializableColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SerializableColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color: {s}")))
    }
}

/// Page geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotebookSection {
    pub grid_size: f64,
    pub page_width: f64,
    pub page_height: f64,
    pub corner_radius: f64,
    pub default_page_count: usize,
    pub max_pages: usize,
    pub measurement_unit: MeasurementUnit,
}

impl Default for NotebookSection {
    fn default() -> Self {
        Self {
            grid_size: 25.0,
            page_width: 800.0,
            page_height: 1000.0,
            corner_radius: 15.0,
            default_page_count: 2,
            max_pages: 10,
            measurement_unit: MeasurementUnit::Centimeters,
        }
    }
}

/// Visibility toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplaySection {
    pub show_dots: bool,
    pub show_grid: bool,
    pub show_angle_measurements: bool,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            show_dots: true,
            show_grid: true,
            show_angle_measurements: true,
        }
    }
}

/// Palette for the background and committed items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorSection {
    pub grid_lines: SerializableColor,
    pub margin_line: SerializableColor,
    pub border: SerializableColor,
    pub background: SerializableColor,
    pub stroke: SerializableColor,
    pub angle: SerializableColor,
}

impl Default for ColorSection {
    fn default() -> Self {
        Self {
            grid_lines: SerializableColor::rgb(0xE2, 0xE8, 0xF0),
            margin_line: SerializableColor::rgb(0xFF, 0x99, 0x99),
            border: SerializableColor::black(),
            background: SerializableColor::white(),
            stroke: SerializableColor::black(),
            angle: SerializableColor::black(),
        }
    }
}

/// Line widths for the notebook background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineSection {
    pub grid_line_width: f64,
    pub grid_line_blur: f64,
    pub margin_line_width: f64,
    pub margin_line_blur: f64,
    pub border_width: f64,
}

impl Default for LineSection {
    fn default() -> Self {
        Self {
            grid_line_width: 0.8,
            grid_line_blur: 0.8,
            margin_line_width: 1.5,
            margin_line_blur: 1.2,
            border_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PenSettings {
    pub width: f64,
    pub color: SerializableColor,
    pub opacity: f64,
}

impl Default for PenSettings {
    fn default() -> Self {
        Self {
            width: 2.0,
            color: SerializableColor::rgb(0x00, 0x62, 0xFF),
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EraserSettings {
    pub radius: f64,
    pub opacity: f64,
}

impl Default for EraserSettings {
    fn default() -> Self {
        Self {
            radius: 20.0,
            opacity: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PointSettings {
    pub radius: f64,
    pub color: SerializableColor,
}

impl Default for PointSettings {
    fn default() -> Self {
        Self {
            radius: 4.0,
            color: SerializableColor::black(),
        }
    }
}

/// Per-tool settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolSettings {
    pub pen: PenSettings,
    pub eraser: EraserSettings,
    pub point: PointSettings,
}

/// Full notebook configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotebookConfig {
    pub notebook: NotebookSection,
    pub display: DisplaySection,
    pub colors: ColorSection,
    pub lines: LineSection,
    pub tools: ToolSettings,
}

impl NotebookConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load configuration from a file, falling back to defaults.
    ///
    /// A missing file is silent; an unreadable or invalid one is logged.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("Ignoring configuration at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Check values that would make the notebook unusable.
    pub fn validate(&self) -> ConfigResult<()> {
        fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("expected a positive number, got {value}"),
                })
            }
        }

        positive("notebook.gridSize", self.notebook.grid_size)?;
        positive("notebook.pageWidth", self.notebook.page_width)?;
        positive("notebook.pageHeight", self.notebook.page_height)?;
        if self.notebook.max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notebook.maxPages",
                reason: "must allow at least one page".to_string(),
            });
        }
        if self.tools.eraser.radius.is_nan() || self.tools.eraser.radius < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "tools.eraser.radius",
                reason: format!("expected a non-negative number, got {}", self.tools.eraser.radius),
            });
        }
        Ok(())
    }

    /// Page count to start with, clamped to the allowed range.
    pub fn initial_page_count(&self) -> usize {
        self.notebook.default_page_count.clamp(1, self.notebook.max_pages.max(1))
    }
}
