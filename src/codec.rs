//! `tokio_util` codec adapter for transports built on framed streams.
//!
//! The core decoder is transport-agnostic; this adapter lets connections
//! built on `FramedRead` drive it directly from their receive buffer. Each
//! decoded item is one [`ResponseFrame`]; intermediate multi-entry frames
//! surface as separate items with `is_final == false`.

use std::io;

use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::{
    decoder::{DecoderConfig, ResponseDecoder},
    error::DecodeError,
    frame::ResponseFrame,
};

/// Decoder adapter wiring a [`ResponseDecoder`] into `tokio_util` framing.
///
/// Decode-only: request encoding belongs to the command side of the client
/// and is not part of this crate.
#[derive(Debug)]
pub struct GibsonClientCodec {
    decoder: ResponseDecoder,
}

impl GibsonClientCodec {
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            decoder: ResponseDecoder::new(config),
        }
    }

    /// Access the underlying decoder, e.g. to check idleness on shutdown.
    #[must_use]
    pub fn decoder(&self) -> &ResponseDecoder { &self.decoder }
}

impl Decoder for GibsonClientCodec {
    type Item = ResponseFrame;
    type Error = DecodeError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.decoder.poll_frame(src)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if src.is_empty() && self.decoder.is_idle() {
            return Ok(None);
        }
        // EOF mid-response: either unconsumed trailing bytes or a
        // partially-decoded frame.
        Err(DecodeError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed mid-response",
        )))
    }
}
