// Configuration module

use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod fetch;
pub mod server;
pub mod watermark;

pub use fetch::FetchConfig;
pub use server::ServerConfig;
pub use watermark::WatermarkConfig;

use crate::watermark::parse_hex_color;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub watermark: WatermarkConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let config: Config =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse YAML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.address.is_empty() {
            return Err("Server address cannot be empty".to_string());
        }

        if self.server.max_concurrent_requests == 0 {
            return Err("max_concurrent_requests must be greater than 0".to_string());
        }

        let wm = &self.watermark;
        if !(wm.scale > 0.0 && wm.scale <= 1.0) {
            return Err(format!(
                "Watermark scale must be in (0, 1], got {}",
                wm.scale
            ));
        }

        if !(0.0..=1.0).contains(&wm.opacity) {
            return Err(format!(
                "Watermark opacity must be in [0, 1], got {}",
                wm.opacity
            ));
        }

        if wm.brand_text.trim().is_empty() {
            return Err("Watermark brand_text cannot be empty".to_string());
        }

        if !(wm.font_scale > 0.0 && wm.font_scale <= 1.0) {
            return Err(format!(
                "Watermark font_scale must be in (0, 1], got {}",
                wm.font_scale
            ));
        }

        parse_hex_color(&wm.accent_color)
            .map_err(|e| format!("Invalid watermark accent_color: {}", e))?;

        if self.fetch.timeout_secs == 0 {
            return Err("Fetch timeout_secs must be greater than 0".to_string());
        }

        if self.fetch.max_source_bytes == 0 {
            return Err("Fetch max_source_bytes must be greater than 0".to_string());
        }

        Ok(())
    }
}
