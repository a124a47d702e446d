//! WebSocket connection to the avatar server with strict request/reply pairing

use crate::error::{ClientError, Result};
use avatar_shared::{Request, Response};
use futures_util::{SinkExt, StreamExt};
use log::{debug, info};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub struct Client {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    requests_sent: u64,
}

impl Client {
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to {}", url);
        let (ws, _) = tokio_tungstenite::connect_async(url).await?;
        info!("Connected to {}", url);

        Ok(Client {
            ws,
            requests_sent: 0,
        })
    }

    /// Sends a request and waits for its reply
    pub async fn send(&mut self, request: &Request) -> Result<Response> {
        let reply = self.send_text(&request.encode()?).await?;
        Ok(Response::decode(&reply)?)
    }

    /// Sends a raw text frame and returns the raw reply text
    ///
    /// Requests carry no correlation ID, so only one may be outstanding on a
    /// connection. Taking `&mut self` enforces that.
    pub async fn send_text(&mut self, text: &str) -> Result<String> {
        debug!("-> {}", text);
        self.ws.send(Message::Text(text.to_string())).await?;
        self.requests_sent += 1;

        let reply = self.next_text().await?;
        debug!("<- {}", reply);
        Ok(reply)
    }

    async fn next_text(&mut self) -> Result<String> {
        while let Some(message) = self.ws.next().await {
            match message? {
                Message::Text(text) => return Ok(text),
                Message::Binary(data) => {
                    return String::from_utf8(data).map_err(|e| {
                        ClientError::Protocol(avatar_shared::ProtocolError::Unrecognized(
                            e.to_string(),
                        ))
                    })
                }
                Message::Close(frame) => {
                    if let Some(frame) = frame {
                        info!("Server closed connection: {}", frame.reason);
                    }
                    return Err(ClientError::ServerClosed);
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }

        Err(ClientError::ServerClosed)
    }

    pub fn requests_sent(&self) -> u64 {
        self.requests_sent
    }

    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }
}
