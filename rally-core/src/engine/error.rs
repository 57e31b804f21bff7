use crate::store::StoreError;
use rally_sdk::objects::{MatchId, Side};
use thiserror::Error;

/// Errors returned by match commands.
///
/// Validation and terminal-state errors are raised before anything is
/// mutated; `Store` means the mutation was discarded.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The match was never created and auto-provisioning is disabled.
    #[error("match {0} does not exist")]
    MatchNotFound(MatchId),

    /// The match already has a final winner.
    #[error("match is over, side {winner} already won")]
    MatchTerminal { winner: Side },

    /// Malformed command input.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Persisting the new state failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
