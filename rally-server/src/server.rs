//! Router assembly and the HTTP listener.

use crate::api;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{Json, Router, extract::State, routing::get};
use rally_sdk::objects::MatchId;
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// `/health` plus every scoreboard route, bound to `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(api::scoreboard::router())
        .with_state(state)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Match served by the un-keyed `/scoreboard` routes.
    default_match_id: MatchId,
    /// Open WebSocket sessions.
    subscribers: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        default_match_id: state.default_match_id().await,
        subscribers: state.score_tx.receiver_count(),
    })
}

/// Serve `router` on `addr` until SIGTERM / SIGINT.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Scoreboard listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
