//! Application state shared across all request handlers.

use crate::config::runtime::SharedConfig;
use rally_core::events::MatchEvent;
use rally_core::orchestrator::MatchEngine;
use rally_sdk::objects::MatchId;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the WebSocket fan-out channel.
pub const SCORE_BROADCAST_CAPACITY: usize = 256;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Match command surface.
    pub engine: Arc<MatchEngine>,
    /// Runtime configuration (the engine section can be reloaded via SIGHUP).
    pub config: SharedConfig,
    /// Fan-out of dispatched match events to WebSocket sessions.
    pub score_tx: broadcast::Sender<MatchEvent>,
}

impl AppState {
    pub fn new(
        engine: Arc<MatchEngine>,
        config: SharedConfig,
        score_tx: broadcast::Sender<MatchEvent>,
    ) -> Self {
        Self {
            engine,
            config,
            score_tx,
        }
    }

    /// Match id used by routes that do not name one.
    pub async fn default_match_id(&self) -> MatchId {
        self.config.default_match_id().await
    }
}
