//! Editor configuration supplied by the host page.
//!
//! The host passes a JSON object (for example from a `data-` attribute or a
//! saved preference). Missing keys take their defaults, so `{}` is valid.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;
use tracing::info;

use crate::consts::DEFAULT_FONT_SIZE;
use crate::doc::Style;
use crate::error::EditorError;

/// Initial drawing style and canvas options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Stroke color for new shapes.
    pub stroke_color: String,
    /// Stroke width for new shapes; clamped to the selectable range.
    pub stroke_width: f64,
    /// Fill for new closed shapes.
    pub fill: Option<String>,
    /// Font size for new text shapes.
    pub font_size: f64,
    /// Whether the background grid starts visible.
    pub show_grid: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            stroke_color: "#3B82F6".to_owned(),
            stroke_width: 2.0,
            fill: None,
            font_size: DEFAULT_FONT_SIZE,
            show_grid: true,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON configuration object.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Config`] if `json` is not a valid config object.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config: Self = serde_json::from_str(json)?;
        info!(
            stroke_color = %config.stroke_color,
            stroke_width = config.stroke_width,
            show_grid = config.show_grid,
            "editor config loaded"
        );
        Ok(config)
    }

    /// The style new shapes start with.
    #[must_use]
    pub fn style(&self) -> Style {
        Style {
            color: self.stroke_color.clone(),
            stroke_width: Style::clamp_stroke_width(self.stroke_width),
            fill: self.fill.clone(),
            font_size: if self.font_size > 0.0 { self.font_size } else { DEFAULT_FONT_SIZE },
        }
    }
}
