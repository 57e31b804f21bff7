//! TOML file configuration structures.
//!
//! These structs directly map to the `rally-config.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    /// Match used by the `/scoreboard` routes that carry no match id.
    #[serde(default = "default_match_id")]
    pub default_match_id: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            default_match_id: default_match_id(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080)
}

fn default_match_id() -> i64 {
    1
}

/// Where match records live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `match_records` table, `DATABASE_URL` from the environment.
    #[default]
    Postgres,
    /// Process memory; records are lost on restart.
    Memory,
}

/// Storage configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Upper bound of the Postgres connection pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

/// Engine configuration section. Reloaded on SIGHUP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_auto_provision")]
    pub auto_provision: bool,
    #[serde(default)]
    pub serve_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_provision: default_auto_provision(),
            serve_seed: None,
        }
    }
}

fn default_auto_provision() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"
default_match_id = 7

[storage]
backend = "memory"

[engine]
auto_provision = false
serve_seed = 42
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.server.default_match_id, 7);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.max_connections, 10);
        assert!(!config.engine.auto_provision);
        assert_eq!(config.engine.serve_seed, Some(42));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.listen.port(), 8080);
        assert_eq!(config.server.default_match_id, 1);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.storage.max_connections, 10);
        assert!(config.engine.auto_provision);
        assert_eq!(config.engine.serve_seed, None);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[storage]\nbackend = \"sqlite\"\n");
        assert!(result.is_err());
    }
}
