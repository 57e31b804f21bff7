//! Scoreboard API handlers.
//!
//! Every route exists in an un-keyed form acting on
//! `server.default_match_id` and a keyed form under `/scoreboard/{match_id}`.
//!
//! # Endpoints
//!
//! - `GET   /scoreboard`                   – current state
//! - `POST  /scoreboard/create`            – create or reset the match
//! - `POST  /scoreboard/start-set`         – (re)start the set clock
//! - `PATCH /scoreboard/add-point/{team}`  – score a point for `A` or `B`
//! - `PATCH /scoreboard/remove-point/{team}` – take a point back
//! - `POST  /scoreboard/random-serve`      – draw the initial serve
//! - `POST  /scoreboard/finish-game`       – finish and reset the match
//! - `GET   /scoreboard/ws`                – WebSocket score stream

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use rally_core::engine::EngineError;
use rally_sdk::objects::ParseSideError;

use crate::state::AppState;

mod broadcast;
mod extractors;
mod handlers;
mod ws;

pub use broadcast::BroadcastPort;

/// Build the Scoreboard API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scoreboard", get(handlers::get_state))
        .route("/scoreboard/{match_id}", get(handlers::get_state))
        .route("/scoreboard/create", post(handlers::create))
        .route("/scoreboard/{match_id}/create", post(handlers::create))
        .route("/scoreboard/start-set", post(handlers::start_set))
        .route("/scoreboard/{match_id}/start-set", post(handlers::start_set))
        .route("/scoreboard/add-point/{team}", patch(handlers::add_point))
        .route(
            "/scoreboard/{match_id}/add-point/{team}",
            patch(handlers::add_point),
        )
        .route(
            "/scoreboard/remove-point/{team}",
            patch(handlers::remove_point),
        )
        .route(
            "/scoreboard/{match_id}/remove-point/{team}",
            patch(handlers::remove_point),
        )
        .route("/scoreboard/random-serve", post(handlers::random_serve))
        .route(
            "/scoreboard/{match_id}/random-serve",
            post(handlers::random_serve),
        )
        .route("/scoreboard/finish-game", post(handlers::finish_game))
        .route(
            "/scoreboard/{match_id}/finish-game",
            post(handlers::finish_game),
        )
        .route("/scoreboard/ws", get(ws::scoreboard_ws))
        .route("/scoreboard/{match_id}/ws", get(ws::scoreboard_ws))
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in Scoreboard API handlers.
#[derive(Debug)]
pub enum ScoreboardApiError {
    /// The engine rejected the command.
    Engine(EngineError),
    /// `{match_id}` is not an integer.
    InvalidMatchId(String),
    /// `{team}` is not `A` or `B`.
    InvalidTeam(ParseSideError),
    /// A point route was reached without a `{team}` segment.
    MissingTeam,
    /// Path parameters could not be read.
    BadPath(String),
}

impl From<EngineError> for ScoreboardApiError {
    fn from(e: EngineError) -> Self {
        ScoreboardApiError::Engine(e)
    }
}

impl IntoResponse for ScoreboardApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ScoreboardApiError::Engine(EngineError::MatchNotFound(id)) => {
                (StatusCode::NOT_FOUND, format!("match {id} not found")).into_response()
            }
            ScoreboardApiError::Engine(e @ EngineError::MatchTerminal { .. }) => {
                (StatusCode::CONFLICT, e.to_string()).into_response()
            }
            ScoreboardApiError::Engine(e @ EngineError::InvalidCommand(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string()).into_response()
            }
            ScoreboardApiError::Engine(EngineError::Store(e)) => {
                tracing::error!(error = %e, "Scoreboard API store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            ScoreboardApiError::InvalidMatchId(raw) => (
                StatusCode::BAD_REQUEST,
                format!("invalid match id `{raw}`"),
            )
                .into_response(),
            ScoreboardApiError::InvalidTeam(e) => {
                (StatusCode::BAD_REQUEST, e.to_string()).into_response()
            }
            ScoreboardApiError::MissingTeam => {
                (StatusCode::BAD_REQUEST, "missing team").into_response()
            }
            ScoreboardApiError::BadPath(reason) => {
                (StatusCode::BAD_REQUEST, reason).into_response()
            }
        }
    }
}
