//! Address-width configuration for length and count fields.

use std::io;

use bytes::{BufMut, BytesMut};

/// Byte width of every length and count field on the wire.
///
/// Gibson servers are built for either a 32-bit or a 64-bit address space
/// and emit length prefixes to match. The width is fixed when the decoder is
/// constructed and never inferred per message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddrWidth {
    /// 4-byte little-endian lengths and counts.
    U32,
    /// 8-byte little-endian lengths and counts.
    U64,
}

impl AddrWidth {
    /// Number of bytes occupied by one length or count field.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }

    /// Decode a length field from the first [`Self::bytes`] bytes of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than the field width. Callers peek the
    /// full field before decoding it.
    #[must_use]
    pub fn read_len(self, src: &[u8]) -> u64 {
        match self {
            Self::U32 => u64::from(u32::from_le_bytes(
                src[..4].try_into().expect("peeked 4 bytes"),
            )),
            Self::U64 => u64::from_le_bytes(src[..8].try_into().expect("peeked 8 bytes")),
        }
    }

    /// Append `len` to `dst` encoded at this width.
    ///
    /// The decoder never writes length fields; this exists for the
    /// synthetic-reply encoders used in tests.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] if `len` does not fit in the
    /// field width.
    pub fn write_len(self, len: u64, dst: &mut BytesMut) -> io::Result<()> {
        match self {
            Self::U32 => {
                let v = u32::try_from(len).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "length exceeds 32-bit field")
                })?;
                dst.put_u32_le(v);
            }
            Self::U64 => dst.put_u64_le(len),
        }
        Ok(())
    }
}
