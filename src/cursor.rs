//! Byte-cursor capability over the transport's receive buffer.

use bytes::{Buf, BytesMut};

/// Read-only window onto a connection's receive buffer.
///
/// The transport owns the buffer and appends to it as reads complete; the
/// decoder borrows a cursor per invocation. Look-ahead (`peek`) never moves
/// the read position, and `consume` commits it only once a complete unit
/// has been decoded, so a half-read unit is re-attempted in full when more
/// bytes arrive.
pub trait ByteCursor {
    /// Bytes currently buffered and not yet consumed.
    fn available(&self) -> usize;

    /// Borrow `len` bytes starting `offset` bytes past the read position,
    /// or `None` if that many bytes are not buffered yet.
    fn peek(&self, offset: usize, len: usize) -> Option<&[u8]>;

    /// Advance the read position by `len` bytes.
    ///
    /// # Panics
    ///
    /// May panic if fewer than `len` bytes are available. The decoder only
    /// consumes ranges it has already peeked.
    fn consume(&mut self, len: usize);

    /// Hint how many bytes must accumulate before the next decode attempt
    /// can progress. Transports may feed it into their read low-water mark;
    /// the default ignores it.
    fn set_low_watermark(&mut self, bytes: usize) { let _ = bytes; }
}

impl ByteCursor for BytesMut {
    fn available(&self) -> usize { self.len() }

    fn peek(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.get(offset..end)
    }

    fn consume(&mut self, len: usize) { self.advance(len); }
}

/// Receive buffer that records the decoder's low-water-mark hint.
///
/// A thin wrapper over [`BytesMut`] for transports that size their next
/// read from the hint instead of polling with a fixed chunk size.
#[derive(Debug, Default)]
pub struct RecvBuffer {
    buf: BytesMut,
    low_watermark: usize,
}

impl RecvBuffer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Append freshly-read bytes from the transport.
    pub fn extend(&mut self, bytes: &[u8]) { self.buf.extend_from_slice(bytes); }

    /// Most recent low-water-mark hint recorded by the decoder, in bytes.
    #[must_use]
    pub fn low_watermark(&self) -> usize { self.low_watermark }
}

impl ByteCursor for RecvBuffer {
    fn available(&self) -> usize { self.buf.len() }

    fn peek(&self, offset: usize, len: usize) -> Option<&[u8]> { self.buf.peek(offset, len) }

    fn consume(&mut self, len: usize) {
        self.buf.advance(len);
        self.low_watermark = 0;
    }

    fn set_low_watermark(&mut self, bytes: usize) { self.low_watermark = bytes; }
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;

    use super::{ByteCursor, RecvBuffer};

    #[test]
    fn peek_does_not_advance() {
        let buf = BytesMut::from(&b"abcdef"[..]);
        assert_eq!(buf.peek(0, 3), Some(&b"abc"[..]));
        assert_eq!(buf.peek(2, 4), Some(&b"cdef"[..]));
        assert_eq!(buf.peek(3, 4), None);
        assert_eq!(buf.available(), 6);
    }

    #[test]
    fn consume_commits_the_read_position() {
        let mut buf = BytesMut::from(&b"abcdef"[..]);
        buf.consume(2);
        assert_eq!(buf.peek(0, 2), Some(&b"cd"[..]));
        assert_eq!(buf.available(), 4);
    }

    #[test]
    fn recv_buffer_clears_watermark_on_consume() {
        let mut buf = RecvBuffer::new();
        buf.extend(b"abcd");
        buf.set_low_watermark(16);
        assert_eq!(buf.low_watermark(), 16);
        buf.consume(2);
        assert_eq!(buf.low_watermark(), 0);
        assert_eq!(buf.available(), 2);
    }
}
