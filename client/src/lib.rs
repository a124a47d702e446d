//! # Avatar Tracker Conformance Client
//!
//! This library drives a running avatar server through a fixed script of
//! requests and checks every reply. It is the reference client for the wire
//! protocol: it sends one JSON request per WebSocket text frame and waits for
//! the reply before sending the next, because replies carry no correlation ID.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! WebSocket connection handling and strict request/reply pairing.
//!
//! ### Scenario Module (`scenario`)
//! The ordered conformance steps and the runner that checks them:
//! - Spawning inside and outside the world
//! - Moves that saturate at every edge
//! - Queries for missing avatars
//! - Repeated moves that must accumulate
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use avatar_client::network::Client;
//! use avatar_client::scenario;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::connect("ws://127.0.0.1:8080").await?;
//!     let report = scenario::run(&mut client).await?;
//!     println!("{} steps passed", report.steps_passed);
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod network;
pub mod scenario;

pub use error::ClientError;
