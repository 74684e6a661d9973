//! CRLF line framing.
//!
//! [`LineCodec`] turns an arbitrarily chunked byte stream into complete
//! lines and back. It knows nothing about IRC beyond the `\r\n`
//! terminator; parsing happens one layer up.

use bytes::{BufMut, BytesMut};
use encoding::Encoding;
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use crate::error::ProtocolError;

/// Upper bound on a buffered, unterminated line (tags plus body).
pub const MAX_IRC_LINE_LEN: usize = 8191 + 512;

/// Line codec splitting on `\r\n`.
#[derive(Debug, Clone)]
pub struct LineCodec {
    encoding: &'static Encoding,
    /// Offset up to which the buffer has already been searched.
    next_index: usize,
    max_len: usize,
}

impl LineCodec {
    /// Create a codec for the given character encoding.
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            next_index: 0,
            max_len: MAX_IRC_LINE_LEN,
        }
    }

    /// Create a codec from an encoding label such as `"utf-8"` or `"latin1"`.
    pub fn from_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.as_bytes()).map(Self::new)
    }

    /// Override the maximum length of a buffered partial line.
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// The encoding used on the wire.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Forget any partial scan state. Call together with clearing the
    /// read buffer when a connection is re-established.
    pub fn reset(&mut self) {
        self.next_index = 0;
    }

    /// Cut a line at the first CR or LF so it cannot carry a second command.
    pub fn sanitize(mut line: String) -> String {
        if let Some(pos) = line.find(['\r', '\n']) {
            line.truncate(pos);
        }
        line
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(encoding::UTF_8)
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        // Step back one byte so a CR at the end of the previous chunk can
        // pair with an LF at the start of this one.
        let start = self.next_index.saturating_sub(1).min(src.len());
        let found = src[start..]
            .windows(2)
            .position(|w| w == b"\r\n")
            .map(|i| start + i);

        match found {
            Some(pos) => {
                self.next_index = 0;
                let frame = src.split_to(pos + 2);
                let (text, had_errors) = self
                    .encoding
                    .decode_without_bom_handling(&frame[..pos]);
                if had_errors {
                    trace!(encoding = self.encoding.name(), "replaced malformed input bytes");
                }
                Ok(Some(text.into_owned()))
            }
            None if src.len() > self.max_len => Err(ProtocolError::MessageTooLong(src.len())),
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None => {
                if !src.is_empty() {
                    trace!(len = src.len(), "dropping unterminated line at end of stream");
                    src.clear();
                }
                self.next_index = 0;
                Ok(None)
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let line = Self::sanitize(line);
        let (bytes, _, _) = self.encoding.encode(&line);
        dst.reserve(bytes.len() + 2);
        dst.put_slice(&bytes);
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
