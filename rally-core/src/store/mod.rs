//! Persistence port for match records.
//!
//! The orchestrator only sees [`MatchStore`]. Two backends ship with the
//! crate: [`PostgresMatchStore`] for deployments and [`MemoryMatchStore`]
//! for tests and single-process demos.

mod memory;
mod postgres;

pub use memory::MemoryMatchStore;
pub use postgres::PostgresMatchStore;

use crate::engine::MatchRecord;
use async_trait::async_trait;
use rally_sdk::objects::MatchId;
use thiserror::Error;

/// Errors that can occur while loading or saving a record.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data does not describe a valid record
    #[error("corrupt match record: {0}")]
    Corrupt(String),
}

/// Load / save of whole match records, keyed by match id.
///
/// `save` must write the record atomically: either the full new record is
/// visible afterwards or the previous one is.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Fetch a record. `Ok(None)` means the match was never saved.
    async fn load(&self, match_id: MatchId) -> Result<Option<MatchRecord>, StoreError>;

    /// Insert or overwrite a record.
    async fn save(&self, match_id: MatchId, record: &MatchRecord) -> Result<(), StoreError>;
}
