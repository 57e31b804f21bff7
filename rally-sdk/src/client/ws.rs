use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use super::ClientError;
use crate::objects::ws::{WsClientMessage, WsServerMessage};

/// A live scoreboard stream opened with [`ScoreboardClient::subscribe`].
///
/// [`ScoreboardClient::subscribe`]: super::ScoreboardClient::subscribe
pub struct ScoreboardSubscription {
    socket: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl ScoreboardSubscription {
    pub(super) async fn connect(url: Url) -> Result<Self, ClientError> {
        let (socket, _response) = connect_async(url.as_str()).await?;
        Ok(Self { socket })
    }

    /// Wait for the next server message.
    ///
    /// Returns `None` once the server closed the connection. Control
    /// frames are skipped.
    pub async fn next(&mut self) -> Option<Result<WsServerMessage, ClientError>> {
        while let Some(frame) = self.socket.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    return Some(serde_json::from_str(&text).map_err(ClientError::Json));
                }
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
        None
    }

    /// Ask the server to push the current state again.
    pub async fn request_score(&mut self) -> Result<(), ClientError> {
        let json = serde_json::to_string(&WsClientMessage::RequestScore)?;
        self.socket.send(Message::Text(json)).await?;
        Ok(())
    }

    /// Close the connection.
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.socket.close(None).await?;
        Ok(())
    }
}
