//! Non-blocking TCP listener

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};

use socket2::{Domain, Protocol, Socket, Type};

use crate::error::{DashError, Result};
use crate::socket_server::connection::ConnectionSet;

/// Default listening port
pub const DEFAULT_PORT: u16 = 21212;

/// Default listen backlog
pub const DEFAULT_BACKLOG: i32 = 10;

/// Listening socket that never blocks on accept
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind with `SO_REUSEADDR`, the given backlog, and non-blocking mode
    pub fn bind(addr: SocketAddr, backlog: i32) -> Result<Self> {
        let bind_err = |source: io::Error| DashError::Bind {
            addr: addr.to_string(),
            source,
        };

        let socket =
            Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP)).map_err(bind_err)?;
        socket.set_reuse_address(true).map_err(bind_err)?;
        socket.bind(&addr.into()).map_err(bind_err)?;
        socket.listen(backlog).map_err(bind_err)?;
        socket.set_nonblocking(true).map_err(bind_err)?;

        let inner: TcpListener = socket.into();
        let local_addr = inner.local_addr().map_err(bind_err)?;
        tracing::info!("Listening on {}", local_addr);

        Ok(Self { inner, local_addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept every pending connection into `connections`.
    ///
    /// Stops at the first `WouldBlock`. Any other accept error is logged and
    /// ends this drain; the listener stays usable. Returns the number of
    /// connections added.
    pub fn accept_pending(&self, connections: &mut ConnectionSet<TcpStream>) -> usize {
        let mut accepted = 0;
        loop {
            match self.inner.accept() {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nonblocking(true) {
                        tracing::warn!("Rejecting connection from {}: {}", peer, e);
                        continue;
                    }
                    if let Err(e) = stream.set_nodelay(true) {
                        tracing::debug!("TCP_NODELAY not set for {}: {}", peer, e);
                    }
                    let id = connections.add(stream, peer.to_string());
                    tracing::info!("Connection {} from {}", id, peer);
                    accepted += 1;
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    break;
                }
            }
        }
        accepted
    }
}
