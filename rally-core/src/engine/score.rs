//! Point application.

use rally_sdk::objects::Side;
use time::OffsetDateTime;

use super::Transition;
use super::error::EngineError;
use super::history;
use super::lifecycle;
use super::record::MatchRecord;

/// A point increment (`+1`) or correction (`-1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointDelta {
    Add,
    Remove,
}

/// Apply one point change for `side`.
///
/// An added point is logged and may end the set. A removed point saturates
/// at zero, drops the latest logged event of the current set and never
/// reverts an already settled set.
pub fn apply_point(
    record: &mut MatchRecord,
    side: Side,
    delta: PointDelta,
    now: OffsetDateTime,
) -> Result<Vec<Transition>, EngineError> {
    record.ensure_in_progress()?;
    match delta {
        PointDelta::Add => {
            *record.score_mut(side) += 1;
            history::record_point(record, side, now);
            Ok(lifecycle::settle_set(record, now))
        }
        PointDelta::Remove => {
            let score = record.score_mut(side);
            *score = score.saturating_sub(1);
            history::pop_point(record);
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rally_sdk::objects::MatchMode;

    fn now() -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH
    }

    fn at_score(a: u32, b: u32) -> MatchRecord {
        let mut record = MatchRecord::zero(now());
        record.team_a_name = "Red".into();
        record.team_b_name = "Blue".into();
        record.team_a_players = smallvec::smallvec!["Kim".into()];
        record.team_b_players = smallvec::smallvec!["Lee".into()];
        record.score_a = a;
        record.score_b = b;
        record
    }

    #[test]
    fn test_point_at_ten_nine_wins_the_set() {
        let mut record = at_score(10, 9);
        let transitions = apply_point(&mut record, Side::A, PointDelta::Add, now()).unwrap();

        assert_eq!(record.set_wins_a, 1);
        assert_eq!(record.current_set, 2);
        assert_eq!((record.score_a, record.score_b), (0, 0));
        assert_eq!(record.team_a_name, "Blue");
        assert_eq!(record.team_b_name, "Red");
        assert_eq!(record.team_a_players.as_slice(), &["Lee"]);
        assert_eq!(record.team_b_players.as_slice(), &["Kim"]);

        let last = record.score_history[0].log.last().unwrap();
        assert_eq!((last.score_a, last.score_b), (11, 9));
        assert_eq!(record.score_history.len(), 2);
        assert_eq!(record.time_records.len(), 2);
        assert!(record.time_records[0].end.is_some());
        assert!(record.time_records[1].end.is_none());
        assert!(transitions.contains(&Transition::SetWon { set: 1, side: Side::A }));
    }

    #[test]
    fn test_doubles_pairs_swap_with_names() {
        let mut record = at_score(10, 3);
        record.mode = MatchMode::Doubles;
        record.team_a_players = smallvec::smallvec!["Kim".into(), "Park".into()];
        record.team_b_players = smallvec::smallvec!["Lee".into(), "Choi".into()];

        apply_point(&mut record, Side::A, PointDelta::Add, now()).unwrap();
        assert_eq!(record.team_a_name, "Blue");
        assert_eq!(record.team_a_players.as_slice(), &["Lee", "Choi"]);
        assert_eq!(record.team_b_players.as_slice(), &["Kim", "Park"]);
        assert_eq!((record.set_wins_a, record.set_wins_b), (1, 0));

        record.score_b = 10;
        apply_point(&mut record, Side::B, PointDelta::Add, now()).unwrap();
        assert_eq!(record.current_set, 3);
        assert_eq!(record.team_a_name, "Red");
        assert_eq!(record.team_a_players.as_slice(), &["Kim", "Park"]);
        assert_eq!(record.team_b_players.as_slice(), &["Lee", "Choi"]);
        assert_eq!((record.set_wins_a, record.set_wins_b), (1, 1));
    }

    #[test]
    fn test_remove_point_at_zero_is_harmless() {
        let mut record = at_score(0, 3);
        let transitions = apply_point(&mut record, Side::A, PointDelta::Remove, now()).unwrap();
        assert!(transitions.is_empty());
        assert_eq!((record.score_a, record.score_b), (0, 3));
    }

    #[test]
    fn test_remove_point_does_not_undo_set() {
        let mut record = at_score(10, 8);
        apply_point(&mut record, Side::A, PointDelta::Add, now()).unwrap();
        apply_point(&mut record, Side::A, PointDelta::Remove, now()).unwrap();

        assert_eq!(record.set_wins_a, 1);
        assert_eq!(record.current_set, 2);
        assert_eq!(record.score_history[0].log.len(), 1);
    }

    #[test]
    fn test_terminal_match_rejects_points() {
        let mut record = at_score(4, 4);
        record.final_winner = Some(Side::B);
        let before = record.clone();

        for delta in [PointDelta::Add, PointDelta::Remove] {
            let err = apply_point(&mut record, Side::A, delta, now()).unwrap_err();
            assert!(matches!(err, EngineError::MatchTerminal { winner: Side::B }));
        }
        assert_eq!(record, before);
    }

    fn side_strategy() -> impl Strategy<Value = Side> {
        prop_oneof![Just(Side::A), Just(Side::B)]
    }

    fn delta_strategy() -> impl Strategy<Value = PointDelta> {
        prop_oneof![3 => Just(PointDelta::Add), 1 => Just(PointDelta::Remove)]
    }

    proptest! {
        #[test]
        fn prop_record_stays_consistent(
            steps in proptest::collection::vec((side_strategy(), delta_strategy()), 0..300),
            best_of in prop_oneof![Just(1u32), Just(3), Just(5), Just(7)],
        ) {
            let mut record = at_score(0, 0);
            record.best_of = best_of;
            for (side, delta) in steps {
                let terminal_before = record.is_terminal();
                let before = record.clone();
                let result = apply_point(&mut record, side, delta, now());
                if terminal_before {
                    prop_assert!(result.is_err());
                    prop_assert_eq!(&record, &before);
                }

                let transitions = result.unwrap_or_default();
                for transition in &transitions {
                    if let Transition::SetWon { set, side: winner } = *transition {
                        prop_assert_eq!(winner, side);
                        let final_score = match side {
                            Side::A => (before.score_a + 1, before.score_b),
                            Side::B => (before.score_a, before.score_b + 1),
                        };
                        let last = record.score_history[set as usize - 1].log.last().unwrap();
                        prop_assert_eq!(last.scored_by, side);
                        prop_assert_eq!((last.score_a, last.score_b), final_score);
                    }
                }

                prop_assert_eq!(record.score_history.len() as u32, record.current_set);
                prop_assert_eq!(record.time_records.len() as u32, record.current_set);
                let wins = record.set_wins_a + record.set_wins_b;
                if record.is_terminal() {
                    prop_assert_eq!(wins, record.current_set);
                    let winner = record.final_winner.unwrap();
                    prop_assert_eq!(record.set_wins(winner), record.needed_wins());
                } else {
                    prop_assert_eq!(wins, record.current_set - 1);
                    prop_assert!(record.set_wins_a < record.needed_wins());
                    prop_assert!(record.set_wins_b < record.needed_wins());
                }
            }
        }
    }
}
