//! `Content-Length` header framing
//!
//! ```text
//! Content-Length: 52\r\n
//! \r\n
//! {"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}
//! ```
//!
//! Header names are case-insensitive and headers other than
//! `Content-Length` (such as `Content-Type`) are ignored. Whitespace
//! between frames, including at end-of-stream, is skipped.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use langserver_domain::value_objects::Message;

use super::{CodecError, Inbound};
use crate::constants::{CONTENT_LENGTH_HEADER, HEADER_TERMINATOR, MAX_HEADER_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    Head,
    Body(usize),
}

/// Codec for `Content-Length` framed messages
#[derive(Debug, Clone)]
pub struct HeaderCodec {
    max_length: usize,
    state: DecodeState,
}

impl HeaderCodec {
    /// Create a codec rejecting bodies longer than `max_length`
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            state: DecodeState::Head,
        }
    }

    fn decode_head(&mut self, src: &mut BytesMut) -> Result<Option<usize>, CodecError> {
        // Stray blank lines between frames are not part of any header.
        let leading = src.iter().take_while(|b| b.is_ascii_whitespace()).count();
        src.advance(leading);

        let Some(end) = src
            .windows(HEADER_TERMINATOR.len())
            .position(|window| window == HEADER_TERMINATOR)
        else {
            if src.len() > MAX_HEADER_LENGTH {
                return Err(CodecError::MalformedHeader(format!(
                    "header section exceeds {MAX_HEADER_LENGTH} bytes"
                )));
            }
            return Ok(None);
        };

        let length = parse_content_length(&src[..end])?;
        src.advance(end + HEADER_TERMINATOR.len());

        if length > self.max_length {
            return Err(CodecError::FrameTooLarge {
                length,
                limit: self.max_length,
            });
        }
        Ok(Some(length))
    }
}

fn parse_content_length(head: &[u8]) -> Result<usize, CodecError> {
    let head = std::str::from_utf8(head)
        .map_err(|_| CodecError::MalformedHeader("header section is not UTF-8".to_string()))?;

    let mut content_length = None;
    for line in head.split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            return Err(CodecError::MalformedHeader(format!("{line:?}")));
        };
        if name.trim().eq_ignore_ascii_case(CONTENT_LENGTH_HEADER) {
            let value = value.trim();
            let parsed = value
                .parse::<usize>()
                .map_err(|_| CodecError::InvalidContentLength(value.to_string()))?;
            content_length = Some(parsed);
        }
    }

    content_length.ok_or(CodecError::MissingContentLength)
}

impl Decoder for HeaderCodec {
    type Item = Inbound;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Inbound>, CodecError> {
        let length = match self.state {
            DecodeState::Body(length) => length,
            DecodeState::Head => match self.decode_head(src)? {
                Some(length) => {
                    self.state = DecodeState::Body(length);
                    length
                }
                None => return Ok(None),
            },
        };

        if src.len() < length {
            src.reserve(length - src.len());
            return Ok(None);
        }

        let body = src.split_to(length);
        self.state = DecodeState::Head;
        Ok(Some(Inbound::from_body(&body)))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Inbound>, CodecError> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if self.state == DecodeState::Head && src.iter().all(u8::is_ascii_whitespace) {
            src.clear();
            return Ok(None);
        }
        Err(CodecError::Truncated {
            remaining: src.len(),
        })
    }
}

impl Encoder<Message> for HeaderCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), CodecError> {
        let body = item.to_vec()?;
        let head = format!("{CONTENT_LENGTH_HEADER}: {}\r\n\r\n", body.len());
        dst.reserve(head.len() + body.len());
        dst.extend_from_slice(head.as_bytes());
        dst.extend_from_slice(&body);
        Ok(())
    }
}
