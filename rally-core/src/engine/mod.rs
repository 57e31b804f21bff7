//! Match rule engine.
//!
//! Pure state transitions on a [`MatchRecord`]; no I/O. The
//! [`orchestrator`](crate::orchestrator) wraps these in load / persist /
//! notify.
//!
//! - `score`: point increments and corrections
//! - `lifecycle`: set end, match end, change of ends
//! - `serve`: initial serve draw and rotation
//! - `history`: per-set point log and set clocks

pub mod error;
pub mod history;
pub mod lifecycle;
pub mod record;
pub mod score;
pub mod serve;

pub use error::EngineError;
pub use history::SetClock;
pub use lifecycle::is_set_over;
pub use record::{MatchRecord, MatchSetup};
pub use score::{PointDelta, apply_point};
pub use serve::{ServeAssignment, assign_initial_serve, serve_owner_for_set};

use rally_sdk::objects::Side;

/// Notable outcome of a rule step, in the order it must be announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Serve owner for the set now in play (or still in play).
    ServeOwner(Option<Side>),
    /// `side` took set number `set`.
    SetWon { set: u32, side: Side },
    /// `side` took the match.
    MatchWon(Side),
}
