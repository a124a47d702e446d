use avatar_shared::ErrorReason;
use std::io;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors returned by avatar store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Out of bounds: ({x}, {y})")]
    OutOfBounds { x: i64, y: i64 },

    #[error("Avatar not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Maps the error onto the reason reported back to the client
    pub fn reason(&self) -> ErrorReason {
        match self {
            StoreError::OutOfBounds { .. } => ErrorReason::OutOfBounds,
            StoreError::NotFound(_) => ErrorReason::AvatarNotFound,
        }
    }
}

/// Errors raised by the listener and connection tasks
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
