//! Reply status taxonomy for the Gibson wire protocol.
//!
//! Every reply opens with a 2-byte little-endian status code. The code
//! determines both the semantic outcome of the query and the shape of the
//! bytes that follow the header.

/// Status code carried in the first two bytes of every reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Generic error while executing the query.
    Error,
    /// The requested key does not exist.
    NotFound,
    /// A numeric argument (TTL or TIME) was invalid.
    InvalidNumber,
    /// The server hit its configured memory limit and refuses new values
    /// until its freeing routine runs.
    MemoryLimit,
    /// The key is held by a LOCK or MLOCK query.
    Locked,
    /// Success with no payload.
    Ok,
    /// Success; a single length-prefixed value follows.
    Value,
    /// Success; a counted set of key/value pairs follows.
    MultiValue,
    /// A code outside the known taxonomy. Decoded like [`StatusCode::Value`]
    /// so unrecognised success-shaped replies stay readable; whether the
    /// status is semantically an error is the consumer's call.
    Unknown(u16),
}

/// Shape of the bytes following a reply header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyShape {
    /// Header only; the frame resolves as soon as the header is consumed.
    None,
    /// `body_len` bytes of payload follow.
    Fixed,
    /// `total_entries` length-prefixed key/value pairs follow.
    MultiEntry,
}

impl StatusCode {
    /// Map a raw wire code onto the taxonomy.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            0x00 => Self::Error,
            0x01 => Self::NotFound,
            0x02 => Self::InvalidNumber,
            0x03 => Self::MemoryLimit,
            0x04 => Self::Locked,
            0x05 => Self::Ok,
            0x06 => Self::Value,
            0x07 => Self::MultiValue,
            other => Self::Unknown(other),
        }
    }

    /// The raw wire code.
    #[must_use]
    pub const fn as_raw(self) -> u16 {
        match self {
            Self::Error => 0x00,
            Self::NotFound => 0x01,
            Self::InvalidNumber => 0x02,
            Self::MemoryLimit => 0x03,
            Self::Locked => 0x04,
            Self::Ok => 0x05,
            Self::Value => 0x06,
            Self::MultiValue => 0x07,
            Self::Unknown(raw) => raw,
        }
    }

    /// Body shape implied by this status.
    #[must_use]
    pub const fn body_shape(self) -> BodyShape {
        match self {
            Self::Value | Self::Unknown(_) => BodyShape::Fixed,
            Self::MultiValue => BodyShape::MultiEntry,
            _ => BodyShape::None,
        }
    }

    /// Whether the server reported the query as failed.
    ///
    /// `NotFound` is excluded: an absent key is a result, not a failure.
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        matches!(
            self,
            Self::Error | Self::InvalidNumber | Self::MemoryLimit | Self::Locked
        )
    }
}
