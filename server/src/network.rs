//! Server network layer: TCP accept loop, WebSocket sessions and the plain-text liveness reply

use crate::config::ServerConfig;
use crate::connection_manager::ConnectionManager;
use crate::error::{Result, ServerError};
use crate::handler::handle_message;
use crate::store::AvatarStore;
use avatar_shared::{ErrorReason, Response};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use std::borrow::Cow;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::WebSocketStream;

/// Body returned to any request that does not ask for a WebSocket upgrade
pub const LIVENESS_BODY: &str = "WebSocket server running";

const MAX_HEADER_BYTES: usize = 8192;
const HEADER_POLL_INTERVAL: Duration = Duration::from_millis(5);
const HEADER_STALL_LIMIT: u32 = 400;

/// How an accepted socket should be served, decided from its request head
#[derive(Debug, PartialEq, Eq)]
enum Handshake {
    Upgrade,
    Plain { header_len: usize },
    Closed,
}

/// WebSocket listener bound to a single TCP endpoint
pub struct Server {
    listener: TcpListener,
    store: Arc<RwLock<AvatarStore>>,
    connections: Arc<RwLock<ConnectionManager>>,
}

impl Server {
    pub async fn bind(config: &ServerConfig, store: Arc<RwLock<AvatarStore>>) -> Result<Self> {
        let listener = TcpListener::bind(config.address()).await?;
        info!("Server listening on {}", listener.local_addr()?);

        let connections = ConnectionManager::new(config.max_connections);

        Ok(Server {
            listener,
            store,
            connections: Arc::new(RwLock::new(connections)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn store(&self) -> Arc<RwLock<AvatarStore>> {
        Arc::clone(&self.store)
    }

    pub fn connections(&self) -> Arc<RwLock<ConnectionManager>> {
        Arc::clone(&self.connections)
    }

    /// Accepts connections forever, one task per socket
    pub async fn run(&self) -> Result<()> {
        info!("Server started successfully");

        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    continue;
                }
            };

            let store = Arc::clone(&self.store);
            let connections = Arc::clone(&self.connections);

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, addr, store, connections).await {
                    warn!("Connection from {} ended with error: {}", addr, e);
                }
            });
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    store: Arc<RwLock<AvatarStore>>,
    connections: Arc<RwLock<ConnectionManager>>,
) -> Result<()> {
    match read_handshake(&stream).await? {
        Handshake::Upgrade => serve_websocket(stream, addr, store, connections).await,
        Handshake::Plain { header_len } => {
            debug!("Plain HTTP request from {}", addr);
            serve_liveness(stream, header_len).await
        }
        Handshake::Closed => {
            debug!("{} closed before sending a request", addr);
            Ok(())
        }
    }
}

/// Peeks at the request head without consuming it, so an upgrade request is
/// still intact when handed to the WebSocket handshake.
async fn read_handshake(stream: &TcpStream) -> io::Result<Handshake> {
    let mut buffer = vec![0u8; MAX_HEADER_BYTES];
    let mut seen = 0;
    let mut stalls = 0;

    loop {
        let len = stream.peek(&mut buffer).await?;
        if len == 0 {
            return Ok(Handshake::Closed);
        }

        let head = &buffer[..len];
        if let Some(header_len) = find_header_end(head) {
            return Ok(classify(&head[..header_len], header_len));
        }
        if len == MAX_HEADER_BYTES {
            return Ok(classify(head, len));
        }

        if len == seen {
            stalls += 1;
            if stalls > HEADER_STALL_LIMIT {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "incomplete request head",
                ));
            }
            tokio::time::sleep(HEADER_POLL_INTERVAL).await;
        } else {
            seen = len;
            stalls = 0;
        }
    }
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos + 4)
}

fn classify(head: &[u8], header_len: usize) -> Handshake {
    if is_upgrade_request(head) {
        Handshake::Upgrade
    } else {
        Handshake::Plain { header_len }
    }
}

fn is_upgrade_request(head: &[u8]) -> bool {
    String::from_utf8_lossy(head)
        .lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .any(|(name, value)| {
            name.trim().eq_ignore_ascii_case("upgrade")
                && value.to_ascii_lowercase().contains("websocket")
        })
}

async fn serve_liveness(mut stream: TcpStream, header_len: usize) -> Result<()> {
    let mut head = vec![0u8; header_len];
    stream.read_exact(&mut head).await?;

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        LIVENESS_BODY.len(),
        LIVENESS_BODY
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;

    Ok(())
}

async fn serve_websocket(
    stream: TcpStream,
    addr: SocketAddr,
    store: Arc<RwLock<AvatarStore>>,
    connections: Arc<RwLock<ConnectionManager>>,
) -> Result<()> {
    let mut ws = tokio_tungstenite::accept_async(stream).await?;

    let connection_id = {
        let mut connections = connections.write().await;
        connections.add_connection(addr)
    };

    let Some(connection_id) = connection_id else {
        warn!("Rejecting connection from {}: server full", addr);
        ws.close(Some(CloseFrame {
            code: CloseCode::Again,
            reason: Cow::Borrowed("Server full"),
        }))
        .await?;
        return Ok(());
    };

    let result = run_session(&mut ws, connection_id, &store, &connections).await;

    {
        let mut connections = connections.write().await;
        connections.remove_connection(connection_id);
    }

    match result {
        Err(ServerError::WebSocket(e)) if is_disconnect(&e) => {
            debug!("Connection {} dropped: {}", connection_id, e);
            Ok(())
        }
        other => other,
    }
}

/// Serves one request at a time: the next message is not read until the reply
/// to the current one has been written.
async fn run_session(
    ws: &mut WebSocketStream<TcpStream>,
    connection_id: u32,
    store: &RwLock<AvatarStore>,
    connections: &RwLock<ConnectionManager>,
) -> Result<()> {
    while let Some(message) = ws.next().await {
        let text = match message? {
            Message::Text(text) => text,
            Message::Binary(data) => match String::from_utf8(data) {
                Ok(text) => text,
                Err(_) => {
                    warn!("Connection {} sent non-UTF-8 binary frame", connection_id);
                    let reply = Response::Error(ErrorReason::MalformedRequest).encode();
                    ws.send(Message::Text(reply)).await?;
                    continue;
                }
            },
            // Ping replies and the closing handshake are handled by the stream
            _ => continue,
        };

        debug!("Connection {} -> {}", connection_id, text);
        let reply = handle_message(store, &text).await.encode();
        debug!("Connection {} <- {}", connection_id, reply);

        connections.write().await.record_request(connection_id);
        ws.send(Message::Text(reply)).await?;
    }

    Ok(())
}

fn is_disconnect(error: &WsError) -> bool {
    matches!(
        error,
        WsError::ConnectionClosed
            | WsError::AlreadyClosed
            | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake)
    )
}
