//! Configuration types for Rallyboard.
//!
//! These types represent the validated runtime configuration. Loading and
//! parsing the TOML file is handled by the server crate.

mod config_store;

pub use config_store::ConfigStore;

use rally_sdk::objects::MatchId;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Server configuration (listen address, default match).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Match used by routes that do not name one.
    pub default_match_id: MatchId,
}

/// Rule-engine behaviour that can be changed at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// When `true`, set and point commands on a match that was never
    /// created start from a zero-state record instead of failing with
    /// `MatchNotFound`.
    pub auto_provision: bool,
    /// Seed for the initial-serve draw. `None` seeds from the OS.
    pub serve_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_provision: true,
            serve_seed: None,
        }
    }
}

/// Shared configuration state with separate locks for each section.
#[derive(Clone)]
pub struct SharedConfig {
    pub server: Arc<RwLock<ServerConfig>>,
    pub engine: ConfigStore<EngineConfig>,
}

impl SharedConfig {
    pub fn new(server: ServerConfig, engine: EngineConfig) -> Self {
        Self {
            server: Arc::new(RwLock::new(server)),
            engine: ConfigStore::new(engine),
        }
    }

    /// Match id used when a request does not name one.
    pub async fn default_match_id(&self) -> MatchId {
        self.server.read().await.default_match_id
    }
}
