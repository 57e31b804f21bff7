//! Set-end detection, match completion and the change of ends.

use rally_sdk::objects::Side;
use time::OffsetDateTime;

use super::Transition;
use super::history;
use super::record::MatchRecord;
use super::serve::serve_owner_for_set;

/// Points needed to take a set.
pub const SET_POINT_TARGET: u32 = 11;
/// Lead required to take a set.
pub const MIN_LEAD: u32 = 2;
/// Guard clause kept next to the target; implied by it for valid scores.
const DEUCE_FLOOR: u32 = 10;

/// A set is over once one side has at least 11 points and leads by 2.
pub fn is_set_over(score_a: u32, score_b: u32) -> bool {
    let high = score_a.max(score_b);
    high >= SET_POINT_TARGET && score_a.abs_diff(score_b) >= MIN_LEAD && high >= DEUCE_FLOOR
}

/// Winner of the set at these scores, if it is over.
pub fn set_winner(score_a: u32, score_b: u32) -> Option<Side> {
    if !is_set_over(score_a, score_b) {
        return None;
    }
    Some(if score_a > score_b { Side::A } else { Side::B })
}

/// Close the current set if its score ends it.
///
/// Returns the transitions in notification order: serve owner, set winner,
/// then match winner when the set decided the match.
pub fn settle_set(record: &mut MatchRecord, now: OffsetDateTime) -> Vec<Transition> {
    let Some(winner) = set_winner(record.score_a, record.score_b) else {
        return Vec::new();
    };
    let finished_set = record.current_set;
    *record.set_wins_mut(winner) += 1;
    history::close_set(record, finished_set, now);

    let needed = record.needed_wins();
    let match_winner = [Side::A, Side::B]
        .into_iter()
        .find(|side| record.set_wins(*side) >= needed);

    match match_winner {
        Some(side) => record.final_winner = Some(side),
        None => advance_set(record, now),
    }

    let mut transitions = vec![
        Transition::ServeOwner(record.serve_owner),
        Transition::SetWon {
            set: finished_set,
            side: winner,
        },
    ];
    if let Some(side) = match_winner {
        transitions.push(Transition::MatchWon(side));
    }
    transitions
}

/// Move to the next set: reset scores, change ends, rotate serve.
///
/// Set wins stay with the physical side; only team identities move.
fn advance_set(record: &mut MatchRecord, now: OffsetDateTime) {
    record.current_set += 1;
    record.score_a = 0;
    record.score_b = 0;
    std::mem::swap(&mut record.team_a_name, &mut record.team_b_name);
    std::mem::swap(&mut record.team_a_players, &mut record.team_b_players);
    record.serve_owner = serve_owner_for_set(record.initial_serve_owner, record.current_set);
    history::open_set(record, record.current_set, now);
}
