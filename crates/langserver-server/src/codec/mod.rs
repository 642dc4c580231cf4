//! Message framing codecs
//!
//! `tokio_util` codecs turning a byte stream into JSON-RPC messages and
//! back. Two framings are available:
//!
//! | Framing | Codec | Wire form |
//! |---------|-------|-----------|
//! | `header` | [`HeaderCodec`] | `Content-Length: N\r\n\r\n<body>` |
//! | `line` | [`LineCodec`] | one JSON document per `\n`-terminated line |
//!
//! A frame whose body is not JSON, or not a JSON-RPC message, decodes to
//! [`Inbound::Invalid`] and the stream stays usable. Only a broken frame
//! (bad header, oversized frame, I/O failure) is a decoder error, which
//! ends the connection.

pub mod header;
pub mod line;

use std::io;

use bytes::BytesMut;
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};

use langserver_domain::value_objects::{Framing, Message, ResponseError};

pub use header::HeaderCodec;
pub use line::LineCodec;

/// Fatal framing errors
#[derive(Debug, Error)]
pub enum CodecError {
    /// Underlying stream failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Header section without `Content-Length`
    #[error("missing Content-Length header")]
    MissingContentLength,

    /// `Content-Length` value is not a length
    #[error("invalid Content-Length header: {0:?}")]
    InvalidContentLength(String),

    /// Header section is not `Name: value` lines
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// Frame exceeds the configured limit
    #[error("frame of {length} bytes exceeds the {limit} byte limit")]
    FrameTooLarge {
        /// Announced or buffered length
        length: usize,
        /// Configured limit
        limit: usize,
    },

    /// Stream ended inside a frame
    #[error("stream ended mid-frame with {remaining} bytes unread")]
    Truncated {
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// Outbound message could not be serialized
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One decoded frame
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// A well-formed JSON-RPC message
    Message(Message),
    /// A frame whose body was rejected; carries the error to send back
    Invalid(ResponseError),
}

impl Inbound {
    /// Classify a frame body
    pub fn from_body(body: &[u8]) -> Self {
        match Message::parse(body) {
            Ok(message) => Self::Message(message),
            Err(error) => Self::Invalid(error),
        }
    }
}

/// Codec selected by the configured framing
#[derive(Debug)]
pub enum MessageCodec {
    /// `Content-Length` header framing
    Header(HeaderCodec),
    /// Newline-delimited framing
    Line(LineCodec),
}

impl MessageCodec {
    /// Codec for `framing` with the given frame limit
    pub fn new(framing: Framing, max_length: usize) -> Self {
        match framing {
            Framing::Header => Self::Header(HeaderCodec::new(max_length)),
            Framing::Line => Self::Line(LineCodec::new(max_length)),
        }
    }
}

impl Decoder for MessageCodec {
    type Item = Inbound;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Inbound>, CodecError> {
        match self {
            Self::Header(codec) => codec.decode(src),
            Self::Line(codec) => codec.decode(src),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Inbound>, CodecError> {
        match self {
            Self::Header(codec) => codec.decode_eof(src),
            Self::Line(codec) => codec.decode_eof(src),
        }
    }
}

impl Encoder<Message> for MessageCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), CodecError> {
        match self {
            Self::Header(codec) => codec.encode(item, dst),
            Self::Line(codec) => codec.encode(item, dst),
        }
    }
}
