//! Watermark configuration types.
//!
//! Controls the brand mark overlaid on every relayed image: the on-disk
//! logo asset, its size relative to the source image, rotation, opacity,
//! and the text fallback used when the logo cannot be loaded.
//!
//! All fields are optional in YAML; defaults come from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ACCENT_COLOR, DEFAULT_BRAND_TEXT, DEFAULT_FONT_SCALE, DEFAULT_LOGO_PATH,
    DEFAULT_WATERMARK_OPACITY, DEFAULT_WATERMARK_ROTATION, DEFAULT_WATERMARK_SCALE,
};

fn default_logo_path() -> String {
    DEFAULT_LOGO_PATH.to_string()
}

fn default_scale() -> f32 {
    DEFAULT_WATERMARK_SCALE
}

fn default_rotation() -> f32 {
    DEFAULT_WATERMARK_ROTATION
}

fn default_opacity() -> f32 {
    DEFAULT_WATERMARK_OPACITY
}

fn default_brand_text() -> String {
    DEFAULT_BRAND_TEXT.to_string()
}

fn default_accent_color() -> String {
    DEFAULT_ACCENT_COLOR.to_string()
}

fn default_font_scale() -> f32 {
    DEFAULT_FONT_SCALE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Path to the logo asset. Absence triggers the text fallback,
    /// never a hard failure.
    #[serde(default = "default_logo_path")]
    pub logo_path: String,

    /// Watermark width as a fraction of the source image width
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// Rotation in degrees (clockwise positive)
    #[serde(default = "default_rotation")]
    pub rotation_degrees: f32,

    /// Opacity applied at composite time (0.0 to 1.0)
    #[serde(default = "default_opacity")]
    pub opacity: f32,

    /// Literal text rendered by the fallback watermark
    #[serde(default = "default_brand_text")]
    pub brand_text: String,

    /// Hex color for the fallback text (#RGB or #RRGGBB)
    #[serde(default = "default_accent_color")]
    pub accent_color: String,

    /// Fallback font size as a fraction of the source image width
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            logo_path: default_logo_path(),
            scale: default_scale(),
            rotation_degrees: default_rotation(),
            opacity: default_opacity(),
            brand_text: default_brand_text(),
            accent_color: default_accent_color(),
            font_scale: default_font_scale(),
        }
    }
}
