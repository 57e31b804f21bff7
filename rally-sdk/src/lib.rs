//! Shared wire types for the Rallyboard scoreboard server, plus an optional
//! HTTP / WebSocket client behind the `client` feature.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

pub mod objects;

#[cfg(feature = "client")]
pub mod client;
