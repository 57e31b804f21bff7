use async_trait::async_trait;
use rally_core::config::{ConfigStore, EngineConfig};
use rally_core::engine::{EngineError, MatchRecord};
use rally_core::events::{MatchEvent, MatchEventReceiver, match_event_channel};
use rally_core::orchestrator::{MatchEngine, serve_rng};
use rally_core::store::{MatchStore, MemoryMatchStore, StoreError};
use rally_sdk::objects::{CreateMatchRequest, MatchId, MatchMode, Side};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const MATCH: MatchId = MatchId(1);

fn singles() -> CreateMatchRequest {
    CreateMatchRequest {
        mode: MatchMode::Singles,
        best_of: 3,
        team_a_name: "Red".into(),
        team_b_name: "Blue".into(),
        team_a_players: smallvec::smallvec!["Kim".into()],
        team_b_players: smallvec::smallvec!["Lee".into()],
    }
}

fn engine_with(store: Arc<dyn MatchStore>, config: EngineConfig) -> (MatchEngine, MatchEventReceiver) {
    let (tx, rx) = match_event_channel();
    let engine = MatchEngine::new(store, tx, ConfigStore::new(config), serve_rng(Some(7)));
    (engine, rx)
}

fn engine() -> (MatchEngine, MatchEventReceiver) {
    engine_with(Arc::new(MemoryMatchStore::new()), EngineConfig::default())
}

fn drain(rx: &mut MatchEventReceiver) -> Vec<MatchEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

async fn score(engine: &MatchEngine, side: Side, points: u32) -> MatchRecord {
    let mut last = None;
    for _ in 0..points {
        last = Some(engine.add_point(MATCH, side).await.unwrap());
    }
    match last {
        Some(record) => record,
        None => engine.get_current_state(MATCH).await.unwrap(),
    }
}

/// Delegates to a memory store; saves fail while `fail_saves` is set.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryMatchStore,
    fail_saves: AtomicBool,
}

#[async_trait]
impl MatchStore for FlakyStore {
    async fn load(&self, match_id: MatchId) -> Result<Option<MatchRecord>, StoreError> {
        self.inner.load(match_id).await
    }

    async fn save(&self, match_id: MatchId, record: &MatchRecord) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.save(match_id, record).await
    }
}

#[tokio::test]
async fn test_create_starts_at_zero() {
    let (engine, mut rx) = engine();
    let record = engine.create_or_reset(MATCH, singles()).await.unwrap();

    assert_eq!(record.current_set, 1);
    assert_eq!((record.score_a, record.score_b), (0, 0));
    assert_eq!((record.set_wins_a, record.set_wins_b), (0, 0));
    assert_eq!(record.final_winner, None);
    assert_eq!(record.team_a_name, "Red");

    let events = drain(&mut rx);
    assert!(matches!(events.as_slice(), [MatchEvent::StateChanged { .. }]));
}

#[tokio::test]
async fn test_invalid_create_is_rejected_before_saving() {
    let (engine, mut rx) = engine();
    let mut request = singles();
    request.best_of = 4;

    let err = engine.create_or_reset(MATCH, request).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidCommand(_)));
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_set_point_changes_ends_and_announces_in_order() {
    let (engine, mut rx) = engine();
    engine.create_or_reset(MATCH, singles()).await.unwrap();
    let (served, _) = engine.assign_initial_serve(MATCH).await.unwrap();
    let initial = served.initial_serve_owner.unwrap();

    score(&engine, Side::A, 9).await;
    score(&engine, Side::B, 9).await;
    let at_ten_nine = score(&engine, Side::A, 1).await;
    assert_eq!((at_ten_nine.score_a, at_ten_nine.score_b), (10, 9));
    drain(&mut rx);

    let record = engine.add_point(MATCH, Side::A).await.unwrap();
    assert_eq!(record.set_wins_a, 1);
    assert_eq!(record.current_set, 2);
    assert_eq!((record.score_a, record.score_b), (0, 0));
    assert_eq!(record.team_a_name, "Blue");
    assert_eq!(record.team_b_name, "Red");
    assert_eq!(record.team_a_players.as_slice(), &["Lee"]);
    assert_eq!(record.serve_owner, Some(initial.opposite()));

    let set_one = &record.score_history[0].log;
    let last = set_one.last().unwrap();
    assert_eq!((last.score_a, last.score_b), (11, 9));
    assert_eq!(set_one.len(), 20);

    let events = drain(&mut rx);
    assert_eq!(events.len(), 3);
    assert_eq!(
        events[0],
        MatchEvent::ServeAssigned {
            match_id: MATCH,
            side: Some(initial.opposite()),
        }
    );
    assert_eq!(
        events[1],
        MatchEvent::SetWon {
            match_id: MATCH,
            set: 1,
            side: Side::A,
        }
    );
    assert!(matches!(events[2], MatchEvent::StateChanged { .. }));
}

#[tokio::test]
async fn test_match_ends_and_rejects_further_commands() {
    let (engine, mut rx) = engine();
    engine.create_or_reset(MATCH, singles()).await.unwrap();

    score(&engine, Side::A, 11).await;
    drain(&mut rx);
    let record = score(&engine, Side::A, 11).await;
    assert_eq!(record.final_winner, Some(Side::A));
    assert_eq!(record.set_wins_a, 2);
    assert_eq!(record.current_set, 2);
    assert_eq!(record.score_history.len(), 2);

    let events = drain(&mut rx);
    let tail: Vec<_> = events.iter().rev().take(3).rev().collect();
    assert!(matches!(tail[0], MatchEvent::SetWon { set: 2, side: Side::A, .. }));
    assert!(matches!(tail[1], MatchEvent::MatchWon { side: Side::A, .. }));
    assert!(matches!(tail[2], MatchEvent::StateChanged { .. }));

    let before = engine.get_current_state(MATCH).await.unwrap();
    for result in [
        engine.add_point(MATCH, Side::B).await,
        engine.remove_point(MATCH, Side::A).await,
        engine.start_set(MATCH).await,
    ] {
        assert!(matches!(
            result,
            Err(EngineError::MatchTerminal { winner: Side::A })
        ));
    }
    assert!(matches!(
        engine.assign_initial_serve(MATCH).await,
        Err(EngineError::MatchTerminal { .. })
    ));
    assert_eq!(engine.get_current_state(MATCH).await.unwrap(), before);
    assert!(drain(&mut rx).is_empty());

    let response = engine.finish_and_reset(MATCH).await.unwrap();
    assert!(response.message.contains("finished"));
    let fresh = engine.add_point(MATCH, Side::B).await.unwrap();
    assert_eq!(fresh.final_winner, None);
    assert_eq!((fresh.score_a, fresh.score_b), (0, 1));
    assert_eq!(fresh.current_set, 1);
}

#[tokio::test]
async fn test_remove_point_at_zero_is_not_an_error() {
    let (engine, _rx) = engine();
    engine.create_or_reset(MATCH, singles()).await.unwrap();
    score(&engine, Side::B, 2).await;

    let record = engine.remove_point(MATCH, Side::A).await.unwrap();
    assert_eq!((record.score_a, record.score_b), (0, 2));

    // The latest event of the set is dropped regardless of who scored it.
    assert_eq!(record.score_history[0].log.len(), 1);
}

#[tokio::test]
async fn test_serve_is_drawn_once() {
    let (engine, mut rx) = engine();
    engine.create_or_reset(MATCH, singles()).await.unwrap();
    drain(&mut rx);

    let (first, already) = engine.assign_initial_serve(MATCH).await.unwrap();
    assert!(!already);
    let owner = first.initial_serve_owner.unwrap();
    assert_eq!(first.serve_owner, Some(owner));
    assert_eq!(drain(&mut rx).len(), 2);

    let (second, already) = engine.assign_initial_serve(MATCH).await.unwrap();
    assert!(already);
    assert_eq!(second.initial_serve_owner, Some(owner));
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_start_set_restarts_clock() {
    let (engine, _rx) = engine();
    let created = engine.create_or_reset(MATCH, singles()).await.unwrap();
    let record = engine.start_set(MATCH).await.unwrap();

    assert_eq!(record.time_records.len(), 1);
    assert!(record.time_records[0].start >= created.time_records[0].start);
    assert_eq!(record.time_records[0].end, None);
}

#[tokio::test]
async fn test_failed_save_discards_the_change() {
    let store = Arc::new(FlakyStore::default());
    let (engine, mut rx) = engine_with(store.clone(), EngineConfig::default());
    engine.create_or_reset(MATCH, singles()).await.unwrap();
    score(&engine, Side::A, 3).await;
    drain(&mut rx);

    store.fail_saves.store(true, Ordering::SeqCst);
    let err = engine.add_point(MATCH, Side::A).await.unwrap_err();
    assert!(matches!(err, EngineError::Store(StoreError::Database(_))));
    assert!(drain(&mut rx).is_empty());

    let record = engine.get_current_state(MATCH).await.unwrap();
    assert_eq!(record.score_a, 3);
    assert_eq!(record.score_history[0].log.len(), 3);

    store.fail_saves.store(false, Ordering::SeqCst);
    let record = engine.add_point(MATCH, Side::A).await.unwrap();
    assert_eq!(record.score_a, 4);
}

#[tokio::test]
async fn test_missing_match_without_auto_provision() {
    let config = EngineConfig {
        auto_provision: false,
        serve_seed: None,
    };
    let (tx, _rx) = match_event_channel();
    let config = ConfigStore::new(config);
    let engine = MatchEngine::new(
        Arc::new(MemoryMatchStore::new()),
        tx,
        config.clone(),
        serve_rng(None),
    );

    assert!(matches!(
        engine.add_point(MATCH, Side::A).await,
        Err(EngineError::MatchNotFound(MATCH))
    ));
    assert!(matches!(
        engine.start_set(MATCH).await,
        Err(EngineError::MatchNotFound(MATCH))
    ));
    // Reads never fail on a missing match.
    assert_eq!(engine.get_current_state(MATCH).await.unwrap().current_set, 1);

    config
        .update(EngineConfig {
            auto_provision: true,
            serve_seed: None,
        })
        .await;
    let record = engine.add_point(MATCH, Side::A).await.unwrap();
    assert_eq!(record.score_a, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_points_are_serialized() {
    let (engine, _rx) = engine();
    let engine = Arc::new(engine);
    engine.create_or_reset(MATCH, singles()).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..20 {
        let engine = Arc::clone(&engine);
        let side = if i % 2 == 0 { Side::A } else { Side::B };
        handles.push(tokio::spawn(async move {
            engine.add_point(MATCH, side).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let record = engine.get_current_state(MATCH).await.unwrap();
    assert_eq!((record.score_a, record.score_b), (10, 10));
    let log = &record.score_history[0].log;
    assert_eq!(log.len(), 20);
    for (i, event) in log.iter().enumerate() {
        assert_eq!((event.score_a + event.score_b) as usize, i + 1);
    }
}

#[tokio::test]
async fn test_matches_are_independent() {
    let (engine, _rx) = engine();
    engine.create_or_reset(MatchId(1), singles()).await.unwrap();
    engine.create_or_reset(MatchId(2), singles()).await.unwrap();

    engine.add_point(MatchId(1), Side::A).await.unwrap();
    let other = engine.get_current_state(MatchId(2)).await.unwrap();
    assert_eq!((other.score_a, other.score_b), (0, 0));
}
