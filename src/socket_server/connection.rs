//! Open client connections and frame fan-out
//!
//! Each broadcast writes the whole frame to every connection with a single
//! non-blocking write. A connection whose write fails or comes up short is
//! closed and removed; the others still get the frame. There is no retry and
//! no per-connection buffer, so a slow client is dropped rather than queued.

use std::io::{self, Write};
use std::net::{Shutdown, TcpStream};

/// Destination for encoded frames
pub trait FrameSink {
    /// Attempt to write `frame`, returning how many bytes were accepted
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<usize>;

    /// Close the underlying stream
    fn close(&mut self);
}

impl FrameSink for TcpStream {
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<usize> {
        Write::write(self, frame)
    }

    fn close(&mut self) {
        let _ = self.shutdown(Shutdown::Both);
    }
}

/// Identifier assigned to a connection when it is added
pub type ConnectionId = u64;

/// A single open client connection
#[derive(Debug)]
pub struct Connection<S> {
    id: ConnectionId,
    peer: String,
    sink: S,
}

impl<S> Connection<S> {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }
}

/// Outcome of one broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections that accepted the full frame
    pub delivered: usize,
    /// Connections closed because the write failed
    pub dropped: usize,
}

/// Write the whole frame in one call; a short write counts as a failure
fn deliver<S: FrameSink>(sink: &mut S, frame: &[u8]) -> io::Result<()> {
    let written = sink.send_frame(frame)?;
    if written < frame.len() {
        return Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short write: {} of {} bytes", written, frame.len()),
        ));
    }
    Ok(())
}

/// The set of open connections
#[derive(Debug)]
pub struct ConnectionSet<S> {
    connections: Vec<Connection<S>>,
    next_id: ConnectionId,
}

impl<S> Default for ConnectionSet<S> {
    fn default() -> Self {
        Self {
            connections: Vec::new(),
            next_id: 1,
        }
    }
}

impl<S: FrameSink> ConnectionSet<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly accepted connection. Nothing is sent to it until the
    /// next broadcast.
    pub fn add(&mut self, sink: S, peer: impl Into<String>) -> ConnectionId {
        let id = self.next_id;
        self.next_id += 1;
        self.connections.push(Connection {
            id,
            peer: peer.into(),
            sink,
        });
        id
    }

    /// Send `frame` to every connection, pruning the ones that fail
    pub fn broadcast(&mut self, frame: &[u8]) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        self.connections.retain_mut(|conn| match deliver(&mut conn.sink, frame) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(e) => {
                tracing::warn!("Dropping connection {} ({}): {}", conn.id, conn.peer, e);
                conn.sink.close();
                report.dropped += 1;
                false
            }
        });
        report
    }

    /// Close and forget every connection
    pub fn close_all(&mut self) {
        for conn in &mut self.connections {
            tracing::debug!("Closing connection {} ({})", conn.id(), conn.peer());
            conn.sink.close();
        }
        self.connections.clear();
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.iter().any(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection<S>> {
        self.connections.iter()
    }
}
