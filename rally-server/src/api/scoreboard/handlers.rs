use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use rally_sdk::objects::{CreateMatchRequest, ServeResponse};

use super::ScoreboardApiError;
use super::extractors::ScoreboardPath;
use crate::state::AppState;

/// `GET /scoreboard[/{match_id}]`: current match state.
///
/// A match that was never created reads as a zero-state record.
pub(super) async fn get_state(
    State(state): State<AppState>,
    path: ScoreboardPath,
) -> Result<impl IntoResponse, ScoreboardApiError> {
    let record = state.engine.get_current_state(path.match_id).await?;
    Ok(Json(record.to_state(path.match_id)))
}

/// `POST /scoreboard[/{match_id}]/create`: create or reset a match.
pub(super) async fn create(
    State(state): State<AppState>,
    path: ScoreboardPath,
    Json(request): Json<CreateMatchRequest>,
) -> Result<impl IntoResponse, ScoreboardApiError> {
    let record = state.engine.create_or_reset(path.match_id, request).await?;
    Ok(Json(record.to_state(path.match_id)))
}

/// `POST /scoreboard[/{match_id}]/start-set`: (re)start the set clock.
pub(super) async fn start_set(
    State(state): State<AppState>,
    path: ScoreboardPath,
) -> Result<impl IntoResponse, ScoreboardApiError> {
    let record = state.engine.start_set(path.match_id).await?;
    Ok(Json(record.to_state(path.match_id)))
}

/// `PATCH /scoreboard[/{match_id}]/add-point/{team}`
pub(super) async fn add_point(
    State(state): State<AppState>,
    path: ScoreboardPath,
) -> Result<impl IntoResponse, ScoreboardApiError> {
    let record = state.engine.add_point(path.match_id, path.team()?).await?;
    Ok(Json(record.to_state(path.match_id)))
}

/// `PATCH /scoreboard[/{match_id}]/remove-point/{team}`
pub(super) async fn remove_point(
    State(state): State<AppState>,
    path: ScoreboardPath,
) -> Result<impl IntoResponse, ScoreboardApiError> {
    let record = state
        .engine
        .remove_point(path.match_id, path.team()?)
        .await?;
    Ok(Json(record.to_state(path.match_id)))
}

/// `POST /scoreboard[/{match_id}]/random-serve`: draw the initial serve.
///
/// Repeating the call returns the existing draw with `alreadyAssigned: true`.
pub(super) async fn random_serve(
    State(state): State<AppState>,
    path: ScoreboardPath,
) -> Result<impl IntoResponse, ScoreboardApiError> {
    let (record, already_assigned) = state.engine.assign_initial_serve(path.match_id).await?;
    Ok(Json(ServeResponse {
        already_assigned,
        state: record.to_state(path.match_id),
    }))
}

/// `POST /scoreboard[/{match_id}]/finish-game`: finish and reset.
pub(super) async fn finish_game(
    State(state): State<AppState>,
    path: ScoreboardPath,
) -> Result<impl IntoResponse, ScoreboardApiError> {
    let response = state.engine.finish_and_reset(path.match_id).await?;
    Ok(Json(response))
}
