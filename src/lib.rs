// Markgate image watermarking relay library

pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod proxy;
pub mod watermark;
