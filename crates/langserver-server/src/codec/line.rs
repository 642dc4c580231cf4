//! Newline-delimited JSON framing
//!
//! One message per `\n`-terminated line; a trailing `\r` is stripped and
//! blank lines are skipped.

use bytes::BytesMut;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, Decoder, Encoder};

use langserver_domain::value_objects::Message;

use super::{CodecError, Inbound};

/// Codec for newline-delimited messages
#[derive(Debug, Clone)]
pub struct LineCodec {
    inner: AnyDelimiterCodec,
    max_length: usize,
}

impl LineCodec {
    /// Create a codec rejecting lines longer than `max_length`
    pub fn new(max_length: usize) -> Self {
        Self {
            inner: AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), b"\n".to_vec(), max_length),
            max_length,
        }
    }

    fn map_error(&self, error: AnyDelimiterCodecError) -> CodecError {
        match error {
            AnyDelimiterCodecError::MaxChunkLengthExceeded => CodecError::FrameTooLarge {
                length: self.max_length + 1,
                limit: self.max_length,
            },
            AnyDelimiterCodecError::Io(e) => CodecError::Io(e),
        }
    }

    fn next_line(
        &mut self,
        src: &mut BytesMut,
        eof: bool,
    ) -> Result<Option<Inbound>, CodecError> {
        loop {
            let chunk = if eof {
                self.inner.decode_eof(src)
            } else {
                self.inner.decode(src)
            };
            let Some(line) = chunk.map_err(|e| self.map_error(e))? else {
                return Ok(None);
            };

            let line = line.strip_suffix(b"\r").unwrap_or(&line[..]);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            return Ok(Some(Inbound::from_body(line)));
        }
    }
}

impl Decoder for LineCodec {
    type Item = Inbound;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Inbound>, CodecError> {
        self.next_line(src, false)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Inbound>, CodecError> {
        self.next_line(src, true)
    }
}

impl Encoder<Message> for LineCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), CodecError> {
        let body = item.to_vec()?;
        dst.reserve(body.len() + 1);
        dst.extend_from_slice(&body);
        dst.extend_from_slice(b"\n");
        Ok(())
    }
}
