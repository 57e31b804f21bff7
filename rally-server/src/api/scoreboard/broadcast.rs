//! Fan-out of dispatched match events to WebSocket sessions.

use async_trait::async_trait;
use rally_core::events::MatchEvent;
use rally_core::processors::{DispatchError, NotificationPort};
use tokio::sync::broadcast;

/// [`NotificationPort`] that forwards every event to a broadcast channel.
///
/// Each WebSocket session subscribes to the channel and filters by match id.
pub struct BroadcastPort {
    tx: broadcast::Sender<MatchEvent>,
}

impl BroadcastPort {
    pub fn new(tx: broadcast::Sender<MatchEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl NotificationPort for BroadcastPort {
    async fn publish(&self, event: MatchEvent) -> Result<(), DispatchError> {
        self.tx
            .send(event)
            .map(|_| ())
            .map_err(|_| DispatchError::NoSubscribers)
    }
}
