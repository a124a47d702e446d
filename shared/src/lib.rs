use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const WORLD_MIN: i64 = 0;
pub const WORLD_MAX: i64 = 200;

pub const SUCCESS: &str = "success";
const ERROR_PREFIX: &str = "error: ";

/// Saturates a coordinate to the closed world range.
pub fn clamp_coordinate(value: i64) -> i64 {
    WORLD_MAX.min(WORLD_MIN.max(value))
}

pub fn in_bounds(value: i64) -> bool {
    (WORLD_MIN..=WORLD_MAX).contains(&value)
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

// Client requests, tagged by the `action` field on the wire
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "action")]
pub enum Request {
    #[serde(rename = "spawn")]
    Spawn { id: String, x: i64, y: i64 },
    #[serde(rename = "moveUp")]
    MoveUp { id: String, distance: i64 },
    #[serde(rename = "moveRight")]
    MoveRight { id: String, distance: i64 },
    #[serde(rename = "position")]
    Position { id: String },
    #[serde(other)]
    Unknown,
}

impl Request {
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn action(&self) -> &'static str {
        match self {
            Request::Spawn { .. } => "spawn",
            Request::MoveUp { .. } => "moveUp",
            Request::MoveRight { .. } => "moveRight",
            Request::Position { .. } => "position",
            Request::Unknown => "unknown",
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Request::Spawn { id, .. }
            | Request::MoveUp { id, .. }
            | Request::MoveRight { id, .. }
            | Request::Position { id } => Some(id),
            Request::Unknown => None,
        }
    }

    /// Whether handling this request can leave the store untouched
    pub fn is_read_only(&self) -> bool {
        matches!(self, Request::Position { .. } | Request::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorReason {
    OutOfBounds,
    AvatarNotFound,
    InvalidAction,
    MalformedRequest,
}

impl ErrorReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorReason::OutOfBounds => "Out of bounds",
            ErrorReason::AvatarNotFound => "Avatar not found",
            ErrorReason::InvalidAction => "Invalid action",
            ErrorReason::MalformedRequest => "Malformed request",
        }
    }

    fn from_reason(reason: &str) -> Option<Self> {
        [
            ErrorReason::OutOfBounds,
            ErrorReason::AvatarNotFound,
            ErrorReason::InvalidAction,
            ErrorReason::MalformedRequest,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == reason)
    }
}

// Server replies; exactly one per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Success,
    Position(Position),
    Error(ErrorReason),
}

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("unknown error reason: {0}")]
    UnknownReason(String),

    #[error("unrecognized response: {0}")]
    Unrecognized(String),
}

impl Response {
    pub fn encode(&self) -> String {
        match self {
            Response::Success => SUCCESS.to_string(),
            Response::Position(position) => {
                serde_json::json!({ "x": position.x, "y": position.y }).to_string()
            }
            Response::Error(reason) => format!("{}{}", ERROR_PREFIX, reason.as_str()),
        }
    }

    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        if text == SUCCESS {
            return Ok(Response::Success);
        }

        if let Some(reason) = text.strip_prefix(ERROR_PREFIX) {
            return ErrorReason::from_reason(reason)
                .map(Response::Error)
                .ok_or_else(|| ProtocolError::UnknownReason(reason.to_string()));
        }

        serde_json::from_str::<Position>(text)
            .map(Response::Position)
            .map_err(|_| ProtocolError::Unrecognized(text.to_string()))
    }
}
