//! Error taxonomy for response decoding.
//!
//! Decode starvation (not enough buffered bytes) is not an error; the
//! decoder reports it as `Ok(None)`. Server-reported outcomes (not-found,
//! memory limit, locked, numeric error) are part of the decoded frame's
//! status, not decode failures. The variants here mean the stream itself
//! cannot be trusted: framing state is corrupt and the transport should
//! terminate the connection.

use std::io;

use thiserror::Error;

/// Failure modes of the response decoder.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Header advertises a body larger than the configured bound.
    #[error("response body exceeds max length: {size} > {max}")]
    OversizedBody {
        /// Body length declared by the header.
        size: u64,
        /// Configured maximum body length.
        max: u64,
    },

    /// Multi-entry header advertises more entries than the configured bound.
    #[error("entry count exceeds maximum: {count} > {max}")]
    OversizedEntrySet {
        /// Entry count declared by the header.
        count: u64,
        /// Configured maximum entry count.
        max: u64,
    },

    /// An entry's key or value length prefix exceeds the body bound.
    #[error("entry field exceeds max length: {size} > {max}")]
    OversizedEntry {
        /// Field length declared by the prefix.
        size: u64,
        /// Configured maximum field length.
        max: u64,
    },

    /// Transport-level I/O error surfaced through the codec adapter.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DecodeError {
    /// Whether the transport should terminate the connection.
    ///
    /// All current variants leave the stream unframeable, so this always
    /// holds; the predicate keeps call sites uniform with richer error
    /// taxonomies.
    #[must_use]
    pub fn should_disconnect(&self) -> bool { true }

    /// Error category label for logging and metrics.
    ///
    /// One of `"framing"` or `"io"`.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::OversizedBody { .. }
            | Self::OversizedEntrySet { .. }
            | Self::OversizedEntry { .. } => "framing",
            Self::Io(_) => "io",
        }
    }
}

impl From<DecodeError> for io::Error {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DecodeError;

    #[test]
    fn framing_errors_disconnect() {
        let err = DecodeError::OversizedBody { size: 10, max: 5 };
        assert!(err.should_disconnect());
        assert_eq!(err.error_type(), "framing");
    }

    #[test]
    fn io_errors_keep_their_kind_through_conversion() {
        let err = DecodeError::Io(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        assert_eq!(err.error_type(), "io");
        let io: std::io::Error = err.into();
        assert_eq!(io.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
