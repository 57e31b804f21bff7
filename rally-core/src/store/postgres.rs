use super::{MatchStore, StoreError};
use crate::engine::MatchRecord;
use crate::entities::match_records::{GetMatchRecordById, UpsertMatchRecord};
use crate::framework::DatabaseProcessor;
use async_trait::async_trait;
use kanau::processor::Processor;
use rally_sdk::objects::MatchId;
use sqlx::PgPool;
use tracing::debug;

/// Store backed by the `match_records` table.
#[derive(Debug, Clone)]
pub struct PostgresMatchStore {
    processor: DatabaseProcessor,
}

impl PostgresMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            processor: DatabaseProcessor { pool },
        }
    }
}

#[async_trait]
impl MatchStore for PostgresMatchStore {
    async fn load(&self, match_id: MatchId) -> Result<Option<MatchRecord>, StoreError> {
        let Some(row) = self
            .processor
            .process(GetMatchRecordById { match_id })
            .await?
        else {
            return Ok(None);
        };
        debug!(match_id = %match_id, updated_at = %row.updated_at, "Loaded match record");
        MatchRecord::try_from(row).map(Some)
    }

    async fn save(&self, match_id: MatchId, record: &MatchRecord) -> Result<(), StoreError> {
        self.processor
            .process(UpsertMatchRecord {
                match_id,
                record: record.clone(),
            })
            .await
    }
}
