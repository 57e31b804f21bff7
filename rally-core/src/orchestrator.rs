//! Match command surface.
//!
//! [`MatchEngine`] runs every mutating command as
//! load → mutate a working copy → save → notify, holding a per-match lock
//! for the whole sequence. Nothing is published unless the save succeeded,
//! so a failed save leaves the stored record and subscribers untouched.

use crate::config::{ConfigStore, EngineConfig};
use crate::engine::{
    self, EngineError, MatchRecord, MatchSetup, PointDelta, ServeAssignment, Transition,
};
use crate::events::{MatchEvent, MatchEventSender};
use crate::store::MatchStore;
use rally_sdk::objects::{CreateMatchRequest, FinishResponse, MatchId, Side};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use time::OffsetDateTime;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

/// Generator for initial-serve draws: seeded when `seed` is set, from the
/// OS otherwise.
pub fn serve_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Executes match commands against a [`MatchStore`] and emits
/// [`MatchEvent`]s for every persisted change.
pub struct MatchEngine {
    store: Arc<dyn MatchStore>,
    events: MatchEventSender,
    config: ConfigStore<EngineConfig>,
    locks: StdMutex<HashMap<MatchId, Arc<Mutex<()>>>>,
    rng: Mutex<StdRng>,
}

/// Exclusive hold on one match id.
///
/// On drop the id's lock entry is removed once no other command holds or
/// waits on it, so the lock table only tracks matches with commands in flight.
struct MatchGuard<'a> {
    locks: &'a StdMutex<HashMap<MatchId, Arc<Mutex<()>>>>,
    match_id: MatchId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for MatchGuard<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        self.guard.take();
        let idle = locks
            .get(&self.match_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            locks.remove(&self.match_id);
        }
    }
}

impl MatchEngine {
    pub fn new(
        store: Arc<dyn MatchStore>,
        events: MatchEventSender,
        config: ConfigStore<EngineConfig>,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            events,
            config,
            locks: StdMutex::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Replace the match with a fresh record built from `request`.
    ///
    /// Allowed in any state, including after the match was won.
    pub async fn create_or_reset(
        &self,
        match_id: MatchId,
        request: CreateMatchRequest,
    ) -> Result<MatchRecord, EngineError> {
        let setup = MatchSetup::try_from(request)?;
        let _guard = self.lock(match_id).await;

        let record = MatchRecord::new(setup, OffsetDateTime::now_utc());
        self.commit(match_id, &record, Vec::new()).await?;
        info!(
            match_id = %match_id,
            mode = ?record.mode,
            best_of = record.best_of,
            team_a = %record.team_a_name,
            team_b = %record.team_b_name,
            "Match created"
        );
        Ok(record)
    }

    /// (Re)start the clock of the current set.
    pub async fn start_set(&self, match_id: MatchId) -> Result<MatchRecord, EngineError> {
        let _guard = self.lock(match_id).await;
        let mut record = self.load_for_command(match_id).await?;
        record.ensure_in_progress()?;

        let clock = engine::history::start_set(&mut record, OffsetDateTime::now_utc());
        self.commit(match_id, &record, Vec::new()).await?;
        info!(match_id = %match_id, set = record.current_set, clock = ?clock, "Set clock started");
        Ok(record)
    }

    /// Score a point for `side`.
    pub async fn add_point(
        &self,
        match_id: MatchId,
        side: Side,
    ) -> Result<MatchRecord, EngineError> {
        self.change_point(match_id, side, PointDelta::Add).await
    }

    /// Take back a point from `side`.
    pub async fn remove_point(
        &self,
        match_id: MatchId,
        side: Side,
    ) -> Result<MatchRecord, EngineError> {
        self.change_point(match_id, side, PointDelta::Remove).await
    }

    async fn change_point(
        &self,
        match_id: MatchId,
        side: Side,
        delta: PointDelta,
    ) -> Result<MatchRecord, EngineError> {
        let _guard = self.lock(match_id).await;
        let mut record = self.load_for_command(match_id).await?;

        let transitions =
            engine::apply_point(&mut record, side, delta, OffsetDateTime::now_utc())?;
        for transition in &transitions {
            match transition {
                Transition::SetWon { set, side } => {
                    info!(match_id = %match_id, set, side = %side, "Set won");
                }
                Transition::MatchWon(side) => {
                    info!(match_id = %match_id, side = %side, "Match won");
                }
                Transition::ServeOwner(_) => {}
            }
        }
        self.commit(match_id, &record, transitions).await?;
        debug!(
            match_id = %match_id,
            side = %side,
            delta = ?delta,
            score_a = record.score_a,
            score_b = record.score_b,
            set = record.current_set,
            "Point applied"
        );
        Ok(record)
    }

    /// Draw the initial serve.
    ///
    /// Returns the record and whether the serve had already been drawn. A
    /// repeated draw changes nothing: no save, no notification.
    pub async fn assign_initial_serve(
        &self,
        match_id: MatchId,
    ) -> Result<(MatchRecord, bool), EngineError> {
        let _guard = self.lock(match_id).await;
        let mut record = self.load_for_command(match_id).await?;
        record.ensure_in_progress()?;

        let assignment = {
            let mut rng = self.rng.lock().await;
            engine::assign_initial_serve(&mut record, &mut *rng)
        };
        match assignment {
            ServeAssignment::AlreadyAssigned(side) => {
                debug!(match_id = %match_id, side = %side, "Initial serve already drawn");
                Ok((record, true))
            }
            ServeAssignment::Assigned(side) => {
                let transitions = vec![Transition::ServeOwner(record.serve_owner)];
                self.commit(match_id, &record, transitions).await?;
                info!(match_id = %match_id, side = %side, "Initial serve drawn");
                Ok((record, false))
            }
        }
    }

    /// End the match and store a fresh zero-state record in its place.
    pub async fn finish_and_reset(&self, match_id: MatchId) -> Result<FinishResponse, EngineError> {
        let _guard = self.lock(match_id).await;
        // Only read for the log line; a broken stored record is overwritten.
        let previous_winner = match self.store.load(match_id).await {
            Ok(record) => record.and_then(|record| record.final_winner),
            Err(e) => {
                warn!(match_id = %match_id, error = %e, "Failed to read match record before reset");
                None
            }
        };

        let record = MatchRecord::zero(OffsetDateTime::now_utc());
        self.commit(match_id, &record, Vec::new()).await?;
        info!(match_id = %match_id, winner = ?previous_winner, "Match finished and reset");
        Ok(FinishResponse {
            message: format!("match {match_id} finished and reset"),
        })
    }

    /// Stored record, or a zero-state record if the match was never saved.
    ///
    /// Does not take the match lock; the store returns whole records.
    pub async fn get_current_state(&self, match_id: MatchId) -> Result<MatchRecord, EngineError> {
        Ok(self
            .store
            .load(match_id)
            .await?
            .unwrap_or_else(|| MatchRecord::zero(OffsetDateTime::now_utc())))
    }

    // -- Private helpers ----------------------------------------------------

    async fn lock(&self, match_id: MatchId) -> MatchGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(match_id).or_default())
        };
        MatchGuard {
            locks: &self.locks,
            match_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    async fn load_for_command(&self, match_id: MatchId) -> Result<MatchRecord, EngineError> {
        if let Some(record) = self.store.load(match_id).await? {
            return Ok(record);
        }
        if self.config.read().await.auto_provision {
            debug!(match_id = %match_id, "Provisioning zero-state record");
            Ok(MatchRecord::zero(OffsetDateTime::now_utc()))
        } else {
            Err(EngineError::MatchNotFound(match_id))
        }
    }

    /// Persist `record`, then announce `transitions` and the new state.
    async fn commit(
        &self,
        match_id: MatchId,
        record: &MatchRecord,
        transitions: Vec<Transition>,
    ) -> Result<(), EngineError> {
        if let Err(e) = self.store.save(match_id, record).await {
            warn!(match_id = %match_id, error = %e, "Failed to save match record, change discarded");
            return Err(e.into());
        }
        for transition in transitions {
            self.emit(MatchEvent::from_transition(match_id, transition));
        }
        self.emit(MatchEvent::state_changed(match_id, record));
        Ok(())
    }

    fn emit(&self, event: MatchEvent) {
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(match_id = %event.match_id(), "MatchEvent channel full, dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                debug!(match_id = %event.match_id(), "MatchEvent channel closed");
            }
        }
    }
}
