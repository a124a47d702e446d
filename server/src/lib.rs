//! # Avatar Tracking Server Library
//!
//! This library provides the authoritative server for the avatar tracking
//! service. Clients attach over WebSocket, create named avatars at integer
//! coordinates, move them along two axes and query where they are. The server
//! owns the only copy of avatar state.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative State
//! Every avatar position lives in one [`store::AvatarStore`]. The store keeps
//! both coordinates inside the world (`[0, 200]` on each axis) at every
//! mutation: spawns outside the world are rejected, moves saturate at the
//! edges.
//!
//! ### Request Handling
//! Each WebSocket text message carries one JSON request. The request is decoded
//! into a closed [`avatar_shared::Request`] enum and dispatched to the store;
//! exactly one reply string is written back before the next message on that
//! connection is read.
//!
//! ### Liveness
//! Plain HTTP requests to the listening port receive a fixed
//! `WebSocket server running` body, so the port can be checked without a
//! WebSocket client.
//!
//! ## Module Organization
//!
//! ### Store Module (`store`)
//! Avatar positions and the bounds rules for spawn and move.
//!
//! ### Handler Module (`handler`)
//! Decoding of wire messages and dispatch onto the store, including the
//! invalid-action and malformed-request replies.
//!
//! ### Connection Manager Module (`connection_manager`)
//! Connection IDs, capacity enforcement and per-connection request counts.
//!
//! ### Network Module (`network`)
//! TCP accept loop, WebSocket upgrade, per-connection sessions.
//!
//! ## Concurrency
//!
//! Each connection runs in its own tokio task. The store sits behind a single
//! `RwLock`, held for one O(1) operation at a time, so operations on the same
//! avatar from different connections never interleave.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use avatar_server::config::ServerConfig;
//! use avatar_server::network::Server;
//! use avatar_server::store::AvatarStore;
//! use std::sync::Arc;
//! use tokio::sync::RwLock;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(RwLock::new(AvatarStore::new()));
//!     let server = Server::bind(&ServerConfig::default(), store).await?;
//!
//!     // Accepts connections until the task is dropped
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection_manager;
pub mod error;
pub mod handler;
pub mod network;
pub mod store;

pub use error::{ServerError, StoreError};
