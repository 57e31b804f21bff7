//! Configuration module for rally-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;
pub mod runtime;

use crate::config::file::{FileConfig, StorageConfig};
use crate::config::runtime::{EngineConfig, ServerConfig, SharedConfig};
use rally_sdk::objects::MatchId;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub engine: EngineConfig,
}

impl LoadedConfig {
    /// Convert into a SharedConfig with separate locks for each section.
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig::new(self.server, self.engine)
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        self.load_str(&config_content)
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn load_str(&self, content: &str) -> Result<LoadedConfig, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        self.validate(&file_config)?;
        Ok(build_loaded_config(file_config))
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.server.default_match_id < 0 {
            return Err(ConfigError::ValidationError(format!(
                "default_match_id must not be negative, got {}",
                config.server.default_match_id
            )));
        }
        if config.storage.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "storage.max_connections must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    LoadedConfig {
        server: ServerConfig {
            listen: file_config.server.listen,
            default_match_id: MatchId(file_config.server.default_match_id),
        },
        storage: file_config.storage,
        engine: EngineConfig {
            auto_provision: file_config.engine.auto_provision,
            serve_seed: file_config.engine.serve_seed,
        },
    }
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}
