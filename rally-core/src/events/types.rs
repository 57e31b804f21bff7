//! Event type definitions.

use crate::engine::{MatchRecord, Transition};
use rally_sdk::objects::{MatchId, Side};

/// Notification emitted after a command has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// Full state after a successful command.
    StateChanged {
        match_id: MatchId,
        record: Box<MatchRecord>,
    },
    /// A set was decided.
    SetWon {
        match_id: MatchId,
        set: u32,
        side: Side,
    },
    /// The match was decided.
    MatchWon { match_id: MatchId, side: Side },
    /// Serve owner of the set in play. `None` until the serve is drawn.
    ServeAssigned {
        match_id: MatchId,
        side: Option<Side>,
    },
}

impl MatchEvent {
    pub fn match_id(&self) -> MatchId {
        match self {
            MatchEvent::StateChanged { match_id, .. }
            | MatchEvent::SetWon { match_id, .. }
            | MatchEvent::MatchWon { match_id, .. }
            | MatchEvent::ServeAssigned { match_id, .. } => *match_id,
        }
    }

    /// Event announcing a rule transition.
    pub fn from_transition(match_id: MatchId, transition: Transition) -> Self {
        match transition {
            Transition::ServeOwner(side) => MatchEvent::ServeAssigned { match_id, side },
            Transition::SetWon { set, side } => MatchEvent::SetWon {
                match_id,
                set,
                side,
            },
            Transition::MatchWon(side) => MatchEvent::MatchWon { match_id, side },
        }
    }

    pub fn state_changed(match_id: MatchId, record: &MatchRecord) -> Self {
        MatchEvent::StateChanged {
            match_id,
            record: Box::new(record.clone()),
        }
    }
}
