use crate::error::FlattenError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry and styling constants used by the per-type renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub default_stroke_width: f32,
    pub default_font_size: f32,
    /// Opacity for highlights that carry none of their own.
    pub highlight_opacity: f32,
    pub arrow_head_radius: f32,
    pub note_marker_size: f32,
    pub stamp_border_width: f32,
    pub stamp_max_font_size: f32,
    /// Fraction of the font size the baseline sits below the box top.
    pub text_ascent_ratio: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_stroke_width: 2.0,
            default_font_size: 16.0,
            highlight_opacity: 0.4,
            arrow_head_radius: 4.0,
            note_marker_size: 10.0,
            stamp_border_width: 3.0,
            stamp_max_font_size: 18.0,
            text_ascent_ratio: 0.8,
        }
    }
}

/// Settings for the raster resource embedder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbedConfig {
    /// Payloads larger than this are rejected before decoding.
    pub max_payload_bytes: usize,
    /// Whether non-PNG payloads are accepted as pass-through JPEG streams.
    pub allow_compressed: bool,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: 32 * 1024 * 1024,
            allow_compressed: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlattenConfig {
    pub render: RenderConfig,
    pub embed: EmbedConfig,
}

impl FlattenConfig {
    pub fn from_json_str(json: &str) -> Result<Self, FlattenError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, FlattenError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
