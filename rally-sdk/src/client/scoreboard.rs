//! Scoreboard API client (scorer console / display → Rallyboard server).

use reqwest::Client;
use url::Url;

use super::{ClientError, ScoreboardSubscription, parse_response};
use crate::objects::scoreboard::{CreateMatchRequest, FinishResponse, MatchState, ServeResponse};
use crate::objects::sides::{MatchId, Side};

/// Typed HTTP client for the scoreboard API of one match.
#[derive(Debug, Clone)]
pub struct ScoreboardClient {
    http: Client,
    base_url: Url,
    match_id: MatchId,
}

impl ScoreboardClient {
    /// Create a new `ScoreboardClient`.
    ///
    /// * `base_url` – root URL of the server (e.g. `http://table-3.local:8080`).
    /// * `match_id` – the match every call operates on.
    pub fn new(base_url: Url, match_id: MatchId) -> Self {
        Self {
            http: Client::new(),
            base_url,
            match_id,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        let url = self
            .base_url
            .join(&format!("/scoreboard/{}{path}", self.match_id))?;
        Ok(url)
    }

    /// `GET /scoreboard/{match_id}` – current match state.
    pub async fn get_state(&self) -> Result<MatchState, ClientError> {
        let resp = self.http.get(self.endpoint("")?).send().await?;
        parse_response(resp).await
    }

    /// `POST /scoreboard/{match_id}/create` – create or reset the match.
    pub async fn create_or_reset(
        &self,
        request: &CreateMatchRequest,
    ) -> Result<MatchState, ClientError> {
        let resp = self
            .http
            .post(self.endpoint("/create")?)
            .json(request)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /scoreboard/{match_id}/start-set` – (re)start the current set clock.
    pub async fn start_set(&self) -> Result<MatchState, ClientError> {
        let resp = self.http.post(self.endpoint("/start-set")?).send().await?;
        parse_response(resp).await
    }

    /// `PATCH /scoreboard/{match_id}/add-point/{team}`.
    ///
    /// Fails with a `409` [`ClientError::Api`] once the match has a winner.
    pub async fn add_point(&self, side: Side) -> Result<MatchState, ClientError> {
        let resp = self
            .http
            .patch(self.endpoint(&format!("/add-point/{side}"))?)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `PATCH /scoreboard/{match_id}/remove-point/{team}` – score correction.
    pub async fn remove_point(&self, side: Side) -> Result<MatchState, ClientError> {
        let resp = self
            .http
            .patch(self.endpoint(&format!("/remove-point/{side}"))?)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /scoreboard/{match_id}/random-serve` – draw the initial serve.
    pub async fn assign_initial_serve(&self) -> Result<ServeResponse, ClientError> {
        let resp = self
            .http
            .post(self.endpoint("/random-serve")?)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST /scoreboard/{match_id}/finish-game` – discard the match state.
    pub async fn finish_and_reset(&self) -> Result<FinishResponse, ClientError> {
        let resp = self
            .http
            .post(self.endpoint("/finish-game")?)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// Open the live WebSocket stream for this match.
    pub async fn subscribe(&self) -> Result<ScoreboardSubscription, ClientError> {
        let mut url = self.endpoint("/ws")?;
        let scheme = match url.scheme() {
            "http" => "ws",
            "https" => "wss",
            "ws" | "wss" => "",
            other => return Err(ClientError::UnsupportedScheme(other.to_owned())),
        };
        if !scheme.is_empty() && url.set_scheme(scheme).is_err() {
            return Err(ClientError::UnsupportedScheme(url.scheme().to_owned()));
        }
        ScoreboardSubscription::connect(url).await
    }
}
