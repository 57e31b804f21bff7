pub mod scoreboard;
pub mod sides;
pub mod ws;

pub use scoreboard::{
    CreateMatchRequest, FinishResponse, MatchState, PointEvent, ServeResponse, SetLog, TimeRecord,
};
pub use sides::{MatchId, MatchMode, ParseSideError, PlayerList, Side};
pub use ws::{WsClientMessage, WsErrorCode, WsServerMessage};
