//! Runtime configuration re-exports.
//!
//! The validated config types live in `rally_core::config`; this module
//! re-exports them for the server.

pub use rally_core::config::{EngineConfig, ServerConfig, SharedConfig};
