//! Streaming decoder for the Gibson key-value cache wire protocol.
//!
//! This crate turns the incrementally-arriving byte stream of a Gibson
//! server connection into fully-decoded response frames, handling partial
//! network reads at every boundary. The transport owns the socket and the
//! read loop; it feeds buffered bytes through a [`ByteCursor`] and receives
//! frames through a [`ResponseSink`] (or the `tokio_util` codec adapter,
//! [`GibsonClientCodec`]).
//!
//! Request encoding, connection lifecycle, and retry policy are out of
//! scope and belong to the surrounding client.

pub mod codec;
pub mod cursor;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod sink;
pub mod status;
pub mod test_helpers;
pub mod width;

pub use codec::GibsonClientCodec;
pub use cursor::{ByteCursor, RecvBuffer};
pub use decoder::{DecoderConfig, ResponseDecoder};
pub use error::DecodeError;
pub use frame::{Entry, ResponseBody, ResponseFrame};
pub use sink::{CollectedFrames, ResponseSink};
pub use status::{BodyShape, StatusCode};
pub use width::AddrWidth;
