//! Source fetch configuration types.
//!
//! Bounds on the upstream image fetch: a request timeout and a cap on
//! how many body bytes are read into memory. The upstream the relay
//! fronts has no such bounds of its own, so both are enforced here.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_SOURCE_BYTES};

fn default_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_max_source_bytes() -> usize {
    DEFAULT_MAX_SOURCE_BYTES
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Upstream fetch timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum source body size in bytes (default: 20 MB)
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_source_bytes: default_max_source_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_source_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn test_fetch_config_deserialize_custom() {
        let yaml = r#"
timeout_secs: 5
max_source_bytes: 1048576
"#;
        let config: FetchConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_source_bytes, 1048576);
    }
}
