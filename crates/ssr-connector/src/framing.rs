//! Delimiter framing over the raw byte stream
//!
//! The renderer terminates each message with a configured delimiter byte.
//! Reads go through a fixed-size buffer pre-filled with 0x04 (EOT): hitting
//! EOT while scanning means the rest of the buffer holds no data from the
//! current load, not that a message ended.

use std::io::{self, Read};

/// Receive buffer size in bytes.
pub const RECEIVE_BUFFER_LEN: usize = 128;

/// Fill byte marking unused buffer space.
pub const END_OF_TRANSMISSION: u8 = 0x04;

/// Outcome of scanning the buffered bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    /// A complete message, delimiter stripped.
    Message(String),
    /// No complete message buffered; load more bytes first.
    NeedData,
}

/// Fixed-size receive buffer with delimiter scanning.
///
/// Partially accumulated messages survive across loads, so frames split at
/// arbitrary chunk boundaries reassemble exactly.
pub struct FrameBuffer {
    buffer: [u8; RECEIVE_BUFFER_LEN],
    cursor: usize,
    pending: Vec<u8>,
    delimiter: u8,
}

impl FrameBuffer {
    pub fn new(delimiter: u8) -> Self {
        Self {
            buffer: [END_OF_TRANSMISSION; RECEIVE_BUFFER_LEN],
            cursor: RECEIVE_BUFFER_LEN,
            pending: Vec::new(),
            delimiter,
        }
    }

    /// Scan buffered bytes for the next complete message.
    pub fn scan(&mut self) -> Scan {
        while self.cursor < RECEIVE_BUFFER_LEN {
            let byte = self.buffer[self.cursor];
            self.cursor += 1;

            if byte == self.delimiter {
                let message = std::mem::take(&mut self.pending);
                return Scan::Message(String::from_utf8_lossy(&message).into_owned());
            }
            if byte == END_OF_TRANSMISSION {
                // Rest of this load is fill; force a reload.
                self.cursor = RECEIVE_BUFFER_LEN;
                return Scan::NeedData;
            }
            self.pending.push(byte);
        }
        Scan::NeedData
    }

    /// Refill the buffer with one read. Returns the byte count, 0 on EOF.
    pub fn load(&mut self, reader: &mut impl Read) -> io::Result<usize> {
        self.buffer = [END_OF_TRANSMISSION; RECEIVE_BUFFER_LEN];
        let count = reader.read(&mut self.buffer)?;
        self.cursor = 0;
        Ok(count)
    }

    /// Drop buffered bytes and any partial message, used across reconnects.
    pub fn reset(&mut self) {
        self.buffer = [END_OF_TRANSMISSION; RECEIVE_BUFFER_LEN];
        self.cursor = RECEIVE_BUFFER_LEN;
        self.pending.clear();
    }
}
