use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use rally_core::events::MatchEvent;
use rally_sdk::objects::{MatchId, WsClientMessage, WsErrorCode, WsServerMessage};
use tokio::sync::broadcast::error::RecvError;

use super::extractors::ScoreboardPath;
use crate::state::AppState;

/// `GET /scoreboard[/{match_id}]/ws`: live scoreboard stream.
///
/// Upgrades the HTTP connection to a WebSocket. The first frame is the
/// current state; after that every dispatched event for the match is
/// forwarded. A `request_score` frame from the client re-sends the state.
pub(super) async fn scoreboard_ws(
    State(state): State<AppState>,
    path: ScoreboardPath,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_scoreboard_ws(socket, state, path.match_id))
}

/// Translate an engine event into its wire frame.
fn to_message(event: MatchEvent) -> WsServerMessage {
    match event {
        MatchEvent::StateChanged { match_id, record } => WsServerMessage::ScoreUpdate {
            state: record.to_state(match_id),
        },
        MatchEvent::SetWon { set, side, .. } => WsServerMessage::SetWon { set, side },
        MatchEvent::MatchWon { side, .. } => WsServerMessage::MatchWon { side },
        MatchEvent::ServeAssigned { side, .. } => WsServerMessage::ServeAssigned { side },
    }
}

/// Background task that drives a single WebSocket connection.
///
/// 1. Subscribes to the broadcast channel.
/// 2. Sends the current state as the first message.
/// 3. Relays events for `match_id` and answers `request_score` frames
///    until the client disconnects.
async fn handle_scoreboard_ws(mut socket: WebSocket, state: AppState, match_id: MatchId) {
    // Subscribe *before* reading the state so that an update racing with
    // the read is still captured in the receiver's buffer.
    let mut broadcast_rx = state.score_tx.subscribe();

    if send_current_state(&mut socket, &state, match_id).await.is_err() {
        return;
    }
    tracing::debug!(%match_id, "WS: subscriber attached");

    loop {
        tokio::select! {
            result = broadcast_rx.recv() => {
                match result {
                    Ok(event) if event.match_id() == match_id => {
                        if send_json(&mut socket, &to_message(event)).await.is_err() {
                            return;
                        }
                    }
                    Ok(_) => {
                        continue;
                    }
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!(
                            %match_id,
                            skipped = n,
                            "WS: broadcast receiver lagged, resending current state"
                        );
                        if send_current_state(&mut socket, &state, match_id).await.is_err() {
                            return;
                        }
                    }
                    Err(RecvError::Closed) => {
                        break;
                    }
                }
            }

            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = match serde_json::from_str::<WsClientMessage>(text.as_str()) {
                            Ok(WsClientMessage::RequestScore) => {
                                send_current_state(&mut socket, &state, match_id).await
                            }
                            Err(e) => {
                                send_json(
                                    &mut socket,
                                    &WsServerMessage::Error {
                                        code: WsErrorCode::BAD_MESSAGE,
                                        reason: e.to_string(),
                                    },
                                )
                                .await
                            }
                        };
                        if reply.is_err() {
                            return;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return;
                    }
                    Some(Ok(_)) => {
                    }
                    Some(Err(_)) => {
                        return;
                    }
                }
            }
        }
    }

    let _ = socket.send(Message::Close(None)).await;
}

/// Send a `score_update` with the stored state, or an `error` frame if
/// the state cannot be loaded.
async fn send_current_state(
    socket: &mut WebSocket,
    state: &AppState,
    match_id: MatchId,
) -> Result<(), ()> {
    let msg = match state.engine.get_current_state(match_id).await {
        Ok(record) => WsServerMessage::ScoreUpdate {
            state: record.to_state(match_id),
        },
        Err(e) => {
            tracing::error!(error = %e, %match_id, "WS: failed to load match state");
            WsServerMessage::Error {
                code: WsErrorCode::INTERNAL_ERROR,
                reason: "internal error".into(),
            }
        }
    };
    send_json(socket, &msg).await
}

/// Serialize `value` as JSON and send it as a text WebSocket frame.
///
/// Returns `Err(())` if the send fails (client disconnected).
async fn send_json<T: serde::Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), ()> {
    let json = serde_json::to_string(value).map_err(|_| ())?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}
