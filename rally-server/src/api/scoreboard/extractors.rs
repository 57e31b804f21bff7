//! Match and team resolution from the request path.

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use rally_sdk::objects::{MatchId, Side};
use std::collections::HashMap;

use super::ScoreboardApiError;
use crate::state::AppState;

/// Target of a scoreboard request.
///
/// `match_id` comes from the `{match_id}` path segment, or from
/// `server.default_match_id` on the un-keyed routes. `team` is the
/// `{team}` segment of the point routes.
#[derive(Debug, Clone, Copy)]
pub struct ScoreboardPath {
    pub match_id: MatchId,
    team: Option<Side>,
}

impl ScoreboardPath {
    /// The `{team}` segment. Only present on the point routes.
    pub fn team(&self) -> Result<Side, ScoreboardApiError> {
        self.team.ok_or(ScoreboardApiError::MissingTeam)
    }
}

impl FromRequestParts<AppState> for ScoreboardPath {
    type Rejection = ScoreboardApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let params = match Path::<HashMap<String, String>>::from_request_parts(parts, state).await
        {
            Ok(Path(params)) => params,
            Err(PathRejection::MissingPathParams(_)) => HashMap::new(),
            Err(rejection) => return Err(ScoreboardApiError::BadPath(rejection.body_text())),
        };

        let match_id = match params.get("match_id") {
            Some(raw) => raw
                .parse::<MatchId>()
                .map_err(|_| ScoreboardApiError::InvalidMatchId(raw.clone()))?,
            None => state.default_match_id().await,
        };

        let team = params
            .get("team")
            .map(|raw| raw.parse::<Side>())
            .transpose()
            .map_err(ScoreboardApiError::InvalidTeam)?;

        Ok(Self { match_id, team })
    }
}
