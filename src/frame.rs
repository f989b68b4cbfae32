//! Wire frame codec
//!
//! Every broadcast is a 4-byte header followed by the compact JSON document:
//!
//! ```text
//! [u8 version=1] [u8 reserved=0] [u16 BE length] [payload: length bytes]
//! ```
//!
//! The payload is UTF-8 with no terminator. Its length must fit in 16 bits;
//! larger documents are an error, never a truncated header.

use crate::document::Document;
use crate::error::{DashError, Result};

/// Current protocol version
pub const PROTOCOL_VERSION: u8 = 1;

/// Size of the frame header in bytes
pub const HEADER_LEN: usize = 4;

/// Largest payload a frame can carry
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Decoded frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u8,
    pub reserved: u8,
    pub length: u16,
}

impl FrameHeader {
    /// Build a header for a payload of `len` bytes
    pub fn for_payload(len: usize) -> Result<Self> {
        let length = u16::try_from(len).map_err(|_| DashError::PayloadTooLarge {
            len,
            max: MAX_PAYLOAD_LEN,
        })?;
        Ok(Self {
            version: PROTOCOL_VERSION,
            reserved: 0,
            length,
        })
    }

    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let [hi, lo] = self.length.to_be_bytes();
        [self.version, self.reserved, hi, lo]
    }

    pub fn decode(bytes: [u8; HEADER_LEN]) -> Result<Self> {
        let [version, reserved, hi, lo] = bytes;
        if version != PROTOCOL_VERSION {
            return Err(DashError::UnsupportedVersion { version });
        }
        Ok(Self {
            version,
            reserved,
            length: u16::from_be_bytes([hi, lo]),
        })
    }
}

/// Wrap an already serialized payload in a frame
pub fn encode_payload(payload: &[u8]) -> Result<Vec<u8>> {
    let header = FrameHeader::for_payload(payload.len())?;
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&header.encode());
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Serialize the document and wrap it in a frame
pub fn encode(document: &Document) -> Result<Vec<u8>> {
    let payload = document.to_json()?;
    encode_payload(&payload)
}

/// Incremental frame decoder for clients reading from a stream
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes read from the stream
    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Pop the next complete payload, if one is buffered
    pub fn next_payload(&mut self) -> Result<Option<Vec<u8>>> {
        if self.buf.len() < HEADER_LEN {
            return Ok(None);
        }
        let header = FrameHeader::decode([self.buf[0], self.buf[1], self.buf[2], self.buf[3]])?;
        let end = HEADER_LEN + header.length as usize;
        if self.buf.len() < end {
            return Ok(None);
        }
        let payload = self.buf[HEADER_LEN..end].to_vec();
        self.buf.drain(..end);
        Ok(Some(payload))
    }

    /// Number of buffered bytes not yet returned
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}
