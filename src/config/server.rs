//! Server configuration types.
//!
//! Address and port bindings plus worker thread and concurrency limits.
//! Default values are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_THREADS};

fn default_max_concurrent_requests() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

fn default_threads() -> usize {
    DEFAULT_THREADS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Number of worker threads (default: 4)
    #[serde(default = "default_threads")]
    pub threads: usize,
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_deserialize_defaults() {
        let yaml = r#"
address: "127.0.0.1"
port: 8080
"#;
        let config: ServerConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.threads, DEFAULT_THREADS);
        assert_eq!(
            config.max_concurrent_requests,
            DEFAULT_MAX_CONCURRENT_REQUESTS
        );
    }

    #[test]
    fn test_server_config_deserialize_custom() {
        let yaml = r#"
address: "0.0.0.0"
port: 9090
threads: 8
max_concurrent_requests: 5000
"#;
        let config: ServerConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.threads, 8);
        assert_eq!(config.max_concurrent_requests, 5000);
    }
}
