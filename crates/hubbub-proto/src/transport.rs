//! Newline-delimited codec for tokio.
//!
//! [`LineCodec`] decodes inbound bytes into trimmed `String` lines and
//! encodes [`Line`] values (or raw `&str`, for the initial username line)
//! with a trailing `\n`. Pair it with `tokio_util::codec::Framed` to get
//! a full-duplex line transport over a `TcpStream`.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Result};
use crate::line::Line;

/// Default maximum accepted line length in bytes, terminator included.
pub const MAX_LINE_LEN: usize = 4096;

/// Codec that reads and writes newline-terminated text lines.
///
/// Decoded lines have their `\r\n` or `\n` terminator stripped. Lines
/// longer than the limit are a [`ProtocolError::LineTooLong`], which
/// callers treat as a transport failure for that session.
pub struct LineCodec {
    /// Index of next byte to check for a newline.
    next_index: usize,
    /// Maximum line length.
    max_len: usize,
}

impl LineCodec {
    /// Create a codec with the default length limit.
    pub fn new() -> Self {
        Self {
            next_index: 0,
            max_len: MAX_LINE_LEN,
        }
    }

    /// Create a codec with a custom length limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        // Look for a newline starting from where we left off.
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if line.len() > self.max_len {
                return Err(ProtocolError::LineTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            let text =
                std::str::from_utf8(&line).map_err(|_| ProtocolError::InvalidUtf8)?;
            Ok(Some(text.trim_end_matches(&['\r', '\n'][..]).to_string()))
        } else if src.len() > self.max_len {
            // No terminator in sight and the buffer already overflows the
            // limit; fail now instead of buffering without bound.
            Err(ProtocolError::LineTooLong {
                actual: src.len(),
                limit: self.max_len,
            })
        } else {
            self.next_index = src.len();
            Ok(None)
        }
    }
}

impl Encoder<&Line> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: &Line, dst: &mut BytesMut) -> Result<()> {
        let encoded = item.to_string();
        dst.reserve(encoded.len() + 1);
        dst.put_slice(encoded.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

impl Encoder<&str> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: &str, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(item.len() + 1);
        dst.put_slice(item.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
