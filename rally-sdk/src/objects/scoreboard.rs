//! Scoreboard request and response types.
//!
//! Field names follow the camelCase layout scoreboard displays already
//! consume (`teamAName`, `setWinsA`, ...).

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::sides::{MatchId, MatchMode, PlayerList, Side};

/// Request body for creating (or resetting) a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub mode: MatchMode,
    pub best_of: u32,
    pub team_a_name: CompactString,
    pub team_b_name: CompactString,
    pub team_a_players: PlayerList,
    pub team_b_players: PlayerList,
}

/// A single scored point as recorded in the per-set log.
///
/// `score_a` / `score_b` are the scores right after the point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointEvent {
    pub scored_by: Side,
    pub score_a: u32,
    pub score_b: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Point log of one set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetLog {
    pub set: u32,
    pub log: Vec<PointEvent>,
}

impl SetLog {
    pub fn empty(set: u32) -> Self {
        Self {
            set,
            log: Vec::new(),
        }
    }
}

/// Clock of one set. `end` is absent while the set is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRecord {
    pub set: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
}

/// Full match state as returned by every scoreboard endpoint and pushed
/// over the WebSocket stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    pub match_id: MatchId,
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
    pub score_history: Vec<SetLog>,
    pub time_records: Vec<TimeRecord>,
}

/// Response of the random-serve endpoint.
///
/// `already_assigned` is `true` when the initial serve had been decided
/// before and the call changed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServeResponse {
    pub already_assigned: bool,
    #[serde(flatten)]
    pub state: MatchState,
}

/// Response of the finish-game endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_camel_case() {
        let body = r#"{
            "mode": "singles",
            "bestOf": 3,
            "teamAName": "Red",
            "teamBName": "Blue",
            "teamAPlayers": ["Kim"],
            "teamBPlayers": ["Lee"]
        }"#;
        let req: CreateMatchRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.mode, MatchMode::Singles);
        assert_eq!(req.best_of, 3);
        assert_eq!(req.team_a_name, "Red");
        assert_eq!(req.team_b_players.as_slice(), &["Lee"]);
    }

    #[test]
    fn test_open_time_record_has_null_end() {
        let record = TimeRecord {
            set: 1,
            start: OffsetDateTime::UNIX_EPOCH,
            end: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["start"], "1970-01-01T00:00:00Z");
        assert!(json["end"].is_null());

        let parsed: TimeRecord = serde_json::from_str(r#"{"set":2,"start":"1970-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(parsed.end, None);
    }
}
