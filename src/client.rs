//! Reference dashboard client
//!
//! Connects to a running session and yields each broadcast document as a
//! `serde_json::Value`.

use std::io::{self, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{DashError, Result};
use crate::frame::FrameDecoder;

/// Blocking client that decodes frames from a session
#[derive(Debug)]
pub struct WatchClient {
    stream: TcpStream,
    decoder: FrameDecoder,
}

impl WatchClient {
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        Ok(Self {
            stream,
            decoder: FrameDecoder::new(),
        })
    }

    /// Fail reads that wait longer than `timeout`
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_read_timeout(timeout)?;
        Ok(())
    }

    /// Block until the next complete frame and return its raw payload
    pub fn next_payload(&mut self) -> Result<Vec<u8>> {
        let mut buf = [0u8; 8192];
        loop {
            if let Some(payload) = self.decoder.next_payload()? {
                return Ok(payload);
            }
            let n = self.stream.read(&mut buf)?;
            if n == 0 {
                return Err(DashError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "server closed the connection",
                )));
            }
            self.decoder.push(&buf[..n]);
        }
    }

    /// Block until the next frame and parse it as JSON
    pub fn next_document(&mut self) -> Result<serde_json::Value> {
        let payload = self.next_payload()?;
        serde_json::from_slice(&payload).map_err(DashError::InvalidPayload)
    }
}

/// Look up a dotted path such as `telemetry.truck.speed` in a document
pub fn lookup<'a>(document: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    path.split('.')
        .try_fold(document, |node, segment| node.as_object()?.get(segment))
}
