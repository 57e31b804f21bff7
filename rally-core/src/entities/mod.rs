pub mod match_records;

use rally_sdk::objects::{MatchMode as SdkMatchMode, Side as SdkSide};

/// Match mode for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `rally_sdk::objects::MatchMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "match_mode")]
pub enum MatchModeName {
    Singles,
    Doubles,
}

impl From<MatchModeName> for SdkMatchMode {
    fn from(value: MatchModeName) -> Self {
        match value {
            MatchModeName::Singles => SdkMatchMode::Singles,
            MatchModeName::Doubles => SdkMatchMode::Doubles,
        }
    }
}

impl From<SdkMatchMode> for MatchModeName {
    fn from(value: SdkMatchMode) -> Self {
        match value {
            SdkMatchMode::Singles => MatchModeName::Singles,
            SdkMatchMode::Doubles => MatchModeName::Doubles,
        }
    }
}

/// Table side for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `rally_sdk::objects::Side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "match_side")]
pub enum SideName {
    A,
    B,
}

impl From<SideName> for SdkSide {
    fn from(value: SideName) -> Self {
        match value {
            SideName::A => SdkSide::A,
            SideName::B => SdkSide::B,
        }
    }
}

impl From<SdkSide> for SideName {
    fn from(value: SdkSide) -> Self {
        match value {
            SdkSide::A => SideName::A,
            SdkSide::B => SideName::B,
        }
    }
}
