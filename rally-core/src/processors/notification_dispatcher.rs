//! NotificationDispatcher processor.
//!
//! The NotificationDispatcher is responsible for:
//! - Receiving `MatchEvent` from the queue in emission order
//! - Handing each event to the configured `NotificationPort`
//! - Logging delivery failures without stopping the loop
//!
//! Delivery is best-effort. A failed publish never affects the persisted
//! state that produced the event.

use crate::events::{MatchEvent, MatchEventReceiver};
use async_trait::async_trait;
use kanau::processor::Processor;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Errors that can occur while publishing a notification.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Nobody is listening for this match
    #[error("no subscribers")]
    NoSubscribers,

    /// The transport rejected the event
    #[error("transport error: {0}")]
    Transport(String),
}

/// Outbound side of match notifications (WebSocket fan-out, webhooks, ...).
#[async_trait]
pub trait NotificationPort: Send + Sync {
    async fn publish(&self, event: MatchEvent) -> Result<(), DispatchError>;
}

/// Drains the match event channel into a [`NotificationPort`].
///
/// The shutdown signal and event receiver are injected when calling
/// [`run()`](NotificationDispatcher::run).
pub struct NotificationDispatcher {
    port: Arc<dyn NotificationPort>,
}

impl NotificationDispatcher {
    pub fn new(port: Arc<dyn NotificationPort>) -> Self {
        Self { port }
    }

    /// Run until shutdown is signaled or every sender is dropped.
    pub async fn run(
        self,
        mut shutdown_rx: watch::Receiver<bool>,
        mut event_rx: MatchEventReceiver,
    ) {
        info!("NotificationDispatcher started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("NotificationDispatcher received shutdown signal");
                        break;
                    }
                }

                Some(event) = event_rx.recv() => {
                    let _ = self.process(event).await;
                }

                else => {
                    info!("MatchEvent channel closed");
                    break;
                }
            }
        }

        info!("NotificationDispatcher shutdown complete");
    }
}

impl Processor<MatchEvent> for NotificationDispatcher {
    type Output = ();
    type Error = DispatchError;

    async fn process(&self, event: MatchEvent) -> Result<(), DispatchError> {
        let match_id = event.match_id();
        debug!(match_id = %match_id, event = ?event, "Dispatching MatchEvent");
        match self.port.publish(event).await {
            Ok(()) => Ok(()),
            Err(DispatchError::NoSubscribers) => {
                debug!(match_id = %match_id, "No subscribers for MatchEvent");
                Err(DispatchError::NoSubscribers)
            }
            Err(e) => {
                warn!(match_id = %match_id, error = %e, "Failed to publish MatchEvent");
                Err(e)
            }
        }
    }
}
