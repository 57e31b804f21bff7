use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Identifier of one match (one physical table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub i64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MatchId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(MatchId)
    }
}

/// One of the two physical sides of the table.
///
/// Team identities move between sides when ends are changed; scores,
/// set wins and serve stay attached to the side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown team tag `{0}`, expected `A` or `B`")]
pub struct ParseSideError(pub String);

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "a" => Ok(Side::A),
            "B" | "b" => Ok(Side::B),
            other => Err(ParseSideError(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Singles,
    Doubles,
}

impl MatchMode {
    /// Number of players each team fields in this mode.
    pub fn players_per_team(self) -> usize {
        match self {
            MatchMode::Singles => 1,
            MatchMode::Doubles => 2,
        }
    }
}

/// Ordered player names of one team. Never more than two entries.
pub type PlayerList = SmallVec<[CompactString; 2]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_parsing() {
        assert_eq!("A".parse::<Side>().unwrap(), Side::A);
        assert_eq!("b".parse::<Side>().unwrap(), Side::B);
        assert_eq!(
            "C".parse::<Side>().unwrap_err(),
            ParseSideError("C".to_owned())
        );
    }

    #[test]
    fn test_side_serde_tags() {
        assert_eq!(serde_json::to_string(&Side::A).unwrap(), "\"A\"");
        let mode: MatchMode = serde_json::from_str("\"doubles\"").unwrap();
        assert_eq!(mode, MatchMode::Doubles);
        assert_eq!(mode.players_per_team(), 2);
    }
}
