use avatar_shared::ProtocolError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Server closed the connection")]
    ServerClosed,

    #[error("Step {step} ({description}) failed: expected {expected}, got {actual}")]
    UnexpectedResponse {
        step: usize,
        description: String,
        expected: String,
        actual: String,
    },
}

pub type Result<T> = std::result::Result<T, ClientError>;
