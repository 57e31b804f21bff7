//! WebSocket message types for the live scoreboard stream.
//!
//! `GET /scoreboard/{match_id}/ws` upgrades to a WebSocket connection and
//! pushes [`WsServerMessage`] JSON frames.
//!
//! # Protocol
//!
//! 1. The server sends a [`WsServerMessage::ScoreUpdate`] with the current
//!    match state right after the upgrade.
//! 2. Every accepted command produces zero or more of `serve_assigned`,
//!    `set_won` and `match_won`, always followed by a `score_update`.
//! 3. The client may send [`WsClientMessage::RequestScore`] at any time to
//!    get a fresh `score_update`.
//! 4. The connection stays open across match resets; it is only closed by
//!    the client or on server shutdown.

use serde::{Deserialize, Serialize};

use super::scoreboard::MatchState;
use super::sides::Side;

/// Server-to-client WebSocket message.
///
/// ```json
/// {"type":"score_update","state":{ ... }}
/// {"type":"set_won","set":2,"side":"A"}
/// {"type":"serve_assigned","side":null}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsServerMessage {
    /// Full match state snapshot.
    ScoreUpdate { state: MatchState },
    /// The side that won the set that just ended.
    SetWon { set: u32, side: Side },
    /// The side that won the match.
    MatchWon { side: Side },
    /// Current serve owner after a serve draw or a set change.
    ServeAssigned { side: Option<Side> },
    /// A server-side error; the connection stays open.
    Error { code: u16, reason: String },
}

/// Client-to-server WebSocket message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsClientMessage {
    /// Ask for the current state to be sent again.
    RequestScore,
}

/// Application error codes carried by [`WsServerMessage::Error`].
pub struct WsErrorCode;

impl WsErrorCode {
    /// The state could not be loaded.
    pub const INTERNAL_ERROR: u16 = 1011;

    /// The client sent a frame the server does not understand.
    pub const BAD_MESSAGE: u16 = 4000;
}
