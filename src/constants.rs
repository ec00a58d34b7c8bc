// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Server defaults
// =============================================================================

/// Default maximum concurrent requests
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 1000;

/// Default number of worker threads
pub const DEFAULT_THREADS: usize = 4;

// =============================================================================
// Source fetch defaults
// =============================================================================

/// Default upstream fetch timeout in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default maximum source image body size (20 MB)
pub const DEFAULT_MAX_SOURCE_BYTES: usize = 20 * 1024 * 1024;

/// Content type used when the upstream omits one
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

// =============================================================================
// Watermark defaults
// =============================================================================

/// Watermark width as a fraction of the source image width
pub const DEFAULT_WATERMARK_SCALE: f32 = 0.4;

/// Watermark rotation in degrees (negative tilts up to the right)
pub const DEFAULT_WATERMARK_ROTATION: f32 = -12.0;

/// Watermark opacity applied at composite time
pub const DEFAULT_WATERMARK_OPACITY: f32 = 0.3;

/// Brand text rendered when the logo asset is unavailable
pub const DEFAULT_BRAND_TEXT: &str = "BRANDEX";

/// Accent color for the text fallback watermark
pub const DEFAULT_ACCENT_COLOR: &str = "#FF3366";

/// Fallback font size as a fraction of the source image width
pub const DEFAULT_FONT_SCALE: f32 = 0.15;

/// Default on-disk logo asset path, relative to the working directory
pub const DEFAULT_LOGO_PATH: &str = "assets/logo.png";

// =============================================================================
// Metadata inspection defaults
// =============================================================================

/// Substitute width when source dimensions cannot be determined
pub const FALLBACK_SOURCE_WIDTH: u32 = 800;

/// Substitute height when source dimensions cannot be determined
pub const FALLBACK_SOURCE_HEIGHT: u32 = 600;
