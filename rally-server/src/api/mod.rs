//! HTTP and WebSocket API.

pub mod scoreboard;
