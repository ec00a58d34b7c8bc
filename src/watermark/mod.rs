//! Watermark module: the brand mark applied to every relayed image.
//!
//! The pipeline is inspect -> build -> composite:
//!
//! - [`inspector`] reads the source's pixel dimensions (degrade-not-fail).
//! - [`builder`] produces the mark, preferring the on-disk logo asset and
//!   falling back to synthesized brand text when the logo is unavailable.
//! - [`compositor`] overlays the mark centered and re-encodes the result
//!   in the source's format family.
//!
//! [`raster`] holds the shared pixel primitives and [`text_renderer`] the
//! glyph rasterization for the fallback path.

pub mod builder;
pub mod compositor;
pub mod inspector;
pub mod raster;
pub mod text_renderer;

pub use builder::{build_watermark, WatermarkAsset};
pub use compositor::{composite, format_for_content_type};
pub use inspector::inspect_dimensions;
pub use text_renderer::{measure_text, parse_hex_color, render_text, Color, TextRenderOptions};
