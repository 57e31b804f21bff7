//! Match notifications.
//!
//! The orchestrator emits a [`MatchEvent`] after every persisted command.
//! The `NotificationDispatcher` drains the channel and hands each event to
//! a `NotificationPort`, which fans it out to subscribers.
//!
//! # Event Flow
//!
//! 1. `MatchEngine` command persists a record, emits `MatchEvent`s
//! 2. `NotificationDispatcher` receives them, calls `NotificationPort::publish`
//!
//! Within one command, events are emitted in the order serve owner, set won,
//! match won, state changed.

pub mod channels;
pub mod types;

pub use channels::{DEFAULT_CHANNEL_BUFFER, MatchEventReceiver, MatchEventSender, match_event_channel};
pub use types::MatchEvent;
