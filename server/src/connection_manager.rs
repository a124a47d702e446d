//! Connection bookkeeping for the avatar tracking server
//!
//! This module tracks the WebSocket sessions currently attached to the server:
//! - Connection lifecycle (register on upgrade, remove on close)
//! - Capacity enforcement against the configured connection limit
//! - Per-connection request counters used in disconnect logging
//!
//! Connections do not own any avatars. Avatar state lives in the shared store
//! and outlives the connection that created it.

use log::info;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Represents an attached WebSocket session
#[derive(Debug)]
pub struct Connection {
    /// Unique connection identifier assigned by the server
    pub id: u32,
    /// Peer address of the connected client
    pub addr: SocketAddr,
    /// When the WebSocket upgrade completed
    pub connected_at: Instant,
    /// Number of requests answered on this connection
    pub requests_handled: u64,
}

impl Connection {
    /// Creates a new connection record for the given ID and address
    pub fn new(id: u32, addr: SocketAddr) -> Self {
        Self {
            id,
            addr,
            connected_at: Instant::now(),
            requests_handled: 0,
        }
    }

    /// Returns how long the connection has been attached
    pub fn uptime(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

/// Manages all attached connections
///
/// Connection IDs start from 1 and are never reused within a server run, so
/// log lines for different sessions stay distinguishable even when the same
/// peer reconnects.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Attached connections indexed by their ID
    connections: HashMap<u32, Connection>,
    /// Next ID handed out to a new connection
    next_connection_id: u32,
    /// Maximum number of concurrent connections allowed
    max_connections: usize,
}

impl ConnectionManager {
    /// Creates an empty manager with the given capacity limit
    pub fn new(max_connections: usize) -> Self {
        Self {
            connections: HashMap::new(),
            next_connection_id: 1,
            max_connections,
        }
    }

    /// Attempts to register a new connection
    ///
    /// Returns Some(connection_id) if there is room, None if the server is at
    /// capacity.
    pub fn add_connection(&mut self, addr: SocketAddr) -> Option<u32> {
        if self.connections.len() >= self.max_connections {
            return None;
        }

        let connection_id = self.next_connection_id;
        self.next_connection_id += 1;

        info!("Connection {} opened from {}", connection_id, addr);
        self.connections
            .insert(connection_id, Connection::new(connection_id, addr));

        Some(connection_id)
    }

    /// Removes a connection and returns its final record
    pub fn remove_connection(&mut self, connection_id: u32) -> Option<Connection> {
        let connection = self.connections.remove(&connection_id)?;
        info!(
            "Connection {} from {} closed after {} requests ({:.1}s)",
            connection.id,
            connection.addr,
            connection.requests_handled,
            connection.uptime().as_secs_f32()
        );
        Some(connection)
    }

    /// Counts one answered request against a connection
    ///
    /// Returns false if the connection ID is unknown.
    pub fn record_request(&mut self, connection_id: u32) -> bool {
        match self.connections.get_mut(&connection_id) {
            Some(connection) => {
                connection.requests_handled += 1;
                true
            }
            None => false,
        }
    }

    /// Looks up the record of an attached connection
    ///
    /// Returns None once the connection has been removed.
    pub fn get(&self, connection_id: u32) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Returns the number of attached connections
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Returns true if no connection is attached
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Returns the capacity limit this manager enforces
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }
}
