//! Event channel factory and handles.

use super::types::MatchEvent;
use tokio::sync::mpsc;

/// Default buffer size for event channels.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for MatchEvent events.
pub type MatchEventSender = mpsc::Sender<MatchEvent>;
/// Receiver handle for MatchEvent events.
pub type MatchEventReceiver = mpsc::Receiver<MatchEvent>;

/// Create a new MatchEvent channel.
///
/// Returns a (sender, receiver) pair. The sender can be cloned freely; the
/// receiver belongs to the `NotificationDispatcher`.
pub fn match_event_channel() -> (MatchEventSender, MatchEventReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
