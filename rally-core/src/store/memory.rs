use super::{MatchStore, StoreError};
use crate::engine::MatchRecord;
use async_trait::async_trait;
use rally_sdk::objects::MatchId;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store. Records are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryMatchStore {
    records: RwLock<HashMap<MatchId, MatchRecord>>,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for MemoryMatchStore {
    async fn load(&self, match_id: MatchId) -> Result<Option<MatchRecord>, StoreError> {
        Ok(self.records.read().await.get(&match_id).cloned())
    }

    async fn save(&self, match_id: MatchId, record: &MatchRecord) -> Result<(), StoreError> {
        self.records.write().await.insert(match_id, record.clone());
        Ok(())
    }
}
