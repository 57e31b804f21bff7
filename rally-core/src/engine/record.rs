//! The authoritative state of one match.

use compact_str::CompactString;
use rally_sdk::objects::{
    CreateMatchRequest, MatchId, MatchMode, MatchState, PlayerList, SetLog, Side, TimeRecord,
};
use time::OffsetDateTime;

use super::error::EngineError;

/// `bestOf` of a record that was never configured.
pub const DEFAULT_BEST_OF: u32 = 3;

/// Live state of one match.
///
/// Scores, set wins and serve belong to the physical sides A and B; team
/// names and players move between sides when ends are changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub mode: MatchMode,
    pub best_of: u32,
    pub team_a_name: CompactString,
    pub team_b_name: CompactString,
    pub team_a_players: PlayerList,
    pub team_b_players: PlayerList,
    pub score_a: u32,
    pub score_b: u32,
    pub set_wins_a: u32,
    pub set_wins_b: u32,
    pub current_set: u32,
    pub initial_serve_owner: Option<Side>,
    pub serve_owner: Option<Side>,
    pub final_winner: Option<Side>,
    /// One entry per set, ordered by set number.
    pub score_history: Vec<SetLog>,
    /// One entry per set, ordered by set number.
    pub time_records: Vec<TimeRecord>,
}

/// Validated parameters of a create / reset command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSetup {
    pub mode: MatchMode,
    pub best_of: u32,
    pub team_a_name: CompactString,
    pub team_b_name: CompactString,
    pub team_a_players: PlayerList,
    pub team_b_players: PlayerList,
}

impl TryFrom<CreateMatchRequest> for MatchSetup {
    type Error = EngineError;

    fn try_from(req: CreateMatchRequest) -> Result<Self, EngineError> {
        if req.best_of == 0 {
            return Err(EngineError::InvalidCommand(
                "bestOf must be positive".to_owned(),
            ));
        }
        if req.best_of % 2 == 0 {
            return Err(EngineError::InvalidCommand(format!(
                "bestOf must be odd, got {}",
                req.best_of
            )));
        }
        let expected = req.mode.players_per_team();
        for (label, players) in [
            ("teamAPlayers", &req.team_a_players),
            ("teamBPlayers", &req.team_b_players),
        ] {
            if players.len() != expected {
                return Err(EngineError::InvalidCommand(format!(
                    "{label} must list {expected} player(s) for {:?}, got {}",
                    req.mode,
                    players.len()
                )));
            }
        }
        Ok(Self {
            mode: req.mode,
            best_of: req.best_of,
            team_a_name: req.team_a_name,
            team_b_name: req.team_b_name,
            team_a_players: req.team_a_players,
            team_b_players: req.team_b_players,
        })
    }
}

impl MatchRecord {
    /// A fresh, unconfigured record: set 1, no teams, no serve.
    pub fn zero(now: OffsetDateTime) -> Self {
        Self {
            mode: MatchMode::Singles,
            best_of: DEFAULT_BEST_OF,
            team_a_name: CompactString::default(),
            team_b_name: CompactString::default(),
            team_a_players: PlayerList::new(),
            team_b_players: PlayerList::new(),
            score_a: 0,
            score_b: 0,
            set_wins_a: 0,
            set_wins_b: 0,
            current_set: 1,
            initial_serve_owner: None,
            serve_owner: None,
            final_winner: None,
            score_history: vec![SetLog::empty(1)],
            time_records: vec![TimeRecord {
                set: 1,
                start: now,
                end: None,
            }],
        }
    }

    /// A fresh record for a configured match.
    pub fn new(setup: MatchSetup, now: OffsetDateTime) -> Self {
        Self {
            mode: setup.mode,
            best_of: setup.best_of,
            team_a_name: setup.team_a_name,
            team_b_name: setup.team_b_name,
            team_a_players: setup.team_a_players,
            team_b_players: setup.team_b_players,
            ..Self::zero(now)
        }
    }

    /// Sets a side must win to take the match: ⌈bestOf / 2⌉.
    pub fn needed_wins(&self) -> u32 {
        self.best_of.div_ceil(2)
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::A => self.score_a,
            Side::B => self.score_b,
        }
    }

    pub(crate) fn score_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::A => &mut self.score_a,
            Side::B => &mut self.score_b,
        }
    }

    pub fn set_wins(&self, side: Side) -> u32 {
        match side {
            Side::A => self.set_wins_a,
            Side::B => self.set_wins_b,
        }
    }

    pub(crate) fn set_wins_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::A => &mut self.set_wins_a,
            Side::B => &mut self.set_wins_b,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.final_winner.is_some()
    }

    /// Fails with `MatchTerminal` once a final winner exists.
    pub fn ensure_in_progress(&self) -> Result<(), EngineError> {
        match self.final_winner {
            Some(winner) => Err(EngineError::MatchTerminal { winner }),
            None => Ok(()),
        }
    }

    /// Wire representation of this record.
    pub fn to_state(&self, match_id: MatchId) -> MatchState {
        MatchState {
            match_id,
            mode: self.mode,
            best_of: self.best_of,
            team_a_name: self.team_a_name.clone(),
            team_b_name: self.team_b_name.clone(),
            team_a_players: self.team_a_players.clone(),
            team_b_players: self.team_b_players.clone(),
            score_a: self.score_a,
            score_b: self.score_b,
            set_wins_a: self.set_wins_a,
            set_wins_b: self.set_wins_b,
            current_set: self.current_set,
            initial_serve_owner: self.initial_serve_owner,
            serve_owner: self.serve_owner,
            final_winner: self.final_winner,
            score_history: self.score_history.clone(),
            time_records: self.time_records.clone(),
        }
    }
}
