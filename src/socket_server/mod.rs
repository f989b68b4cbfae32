//! Dashboard socket server
//!
//! Owns the listening socket and the set of open client connections. Both
//! are driven from the host's cycle callbacks; nothing here spawns threads
//! or blocks.
//!
//! # Protocol
//!
//! Clients only read. Each emitted frame is:
//!
//! ```text
//! [u8 version=1] [u8 reserved=0] [u16 BE length] [compact JSON document]
//! ```
//!
//! A client that connects between two frames receives nothing until the next
//! frame. A client whose socket cannot take a whole frame is disconnected and
//! must reconnect.

pub mod connection;
pub mod listener;
pub mod protocol;

use std::net::{SocketAddr, TcpStream};

pub use connection::{BroadcastReport, ConnectionId, ConnectionSet, FrameSink};
pub use listener::{Listener, DEFAULT_BACKLOG, DEFAULT_PORT};
pub use protocol::{HostEvent, NamedValue};

use crate::error::Result;

/// Listener plus open connections
#[derive(Debug)]
pub struct ConnectionManager {
    listener: Listener,
    connections: ConnectionSet<TcpStream>,
}

impl ConnectionManager {
    pub fn bind(addr: SocketAddr, backlog: i32) -> Result<Self> {
        Ok(Self {
            listener: Listener::bind(addr, backlog)?,
            connections: ConnectionSet::new(),
        })
    }

    /// Accept every pending client without blocking
    pub fn accept_pending(&mut self) -> usize {
        self.listener.accept_pending(&mut self.connections)
    }

    /// Send a frame to every client, dropping the ones that fail
    pub fn broadcast(&mut self, frame: &[u8]) -> BroadcastReport {
        let report = self.connections.broadcast(frame);
        tracing::debug!(
            "Broadcast {} bytes: {} delivered, {} dropped",
            frame.len(),
            report.delivered,
            report.dropped
        );
        report
    }

    /// Close every client; the listener is released when this is dropped
    pub fn close_all(&mut self) {
        let count = self.connections.len();
        self.connections.close_all();
        tracing::info!("Closed {} connection(s)", count);
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }
}
