//! Pull-based state machine turning buffered bytes into response frames.
//!
//! The decoder never performs I/O and never blocks: it inspects the bytes a
//! [`ByteCursor`] already holds and either materialises a frame or reports
//! starvation (`Ok(None)`), leaving the cursor exactly where the current
//! unit began. The transport re-invokes it whenever more bytes arrive.

use bytes::Bytes;
use log::warn;

use crate::{
    cursor::ByteCursor,
    error::DecodeError,
    frame::{Entry, ResponseBody, ResponseFrame, ResponseHeader},
    sink::ResponseSink,
    status::{BodyShape, StatusCode},
    width::AddrWidth,
};

/// Size of the status-code field opening every reply.
const STATUS_LEN: usize = 2;
/// Size of the encoding tag following the status code.
const ENCODING_LEN: usize = 1;

/// Decoder configuration, fixed per connection.
#[derive(Clone, Copy, Debug)]
pub struct DecoderConfig {
    width: AddrWidth,
    max_body_len: u64,
    max_entries: u64,
}

impl DecoderConfig {
    /// Default cap on declared body, key, and value lengths.
    pub const DEFAULT_MAX_BODY_LEN: u64 = 64 * 1024 * 1024;
    /// Default cap on the declared entry count of a multi-entry reply.
    pub const DEFAULT_MAX_ENTRIES: u64 = 1 << 20;

    /// Configuration for the given address width with default sanity bounds.
    #[must_use]
    pub const fn new(width: AddrWidth) -> Self {
        Self {
            width,
            max_body_len: Self::DEFAULT_MAX_BODY_LEN,
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    /// Cap the body, key, and value lengths a header may declare.
    ///
    /// Guards against corrupt headers demanding unbounded buffering.
    #[must_use]
    pub const fn with_max_body_len(mut self, max: u64) -> Self {
        self.max_body_len = max;
        self
    }

    /// Cap the entry count a multi-entry header may declare.
    #[must_use]
    pub const fn with_max_entries(mut self, max: u64) -> Self {
        self.max_entries = max;
        self
    }

    /// Configured address width.
    #[must_use]
    pub const fn width(&self) -> AddrWidth { self.width }
}

/// Position of the decoder within one in-flight response.
#[derive(Debug)]
enum DecodeState {
    /// Waiting for a complete reply header.
    AwaitingHeader,
    /// Header consumed; waiting for `header.body_len` payload bytes.
    AwaitingFixedBody { header: ResponseHeader },
    /// Header consumed; consuming key/value entries until `expected` have
    /// been delivered.
    AwaitingMultiEntry {
        header: ResponseHeader,
        expected: u64,
        delivered: u64,
        batch: Vec<Entry>,
    },
}

/// Outcome of one state-machine step.
enum Step {
    /// Not enough buffered bytes to progress; cursor unmoved for the
    /// current unit.
    Starved,
    /// State advanced; run the next state without returning to the caller.
    Continue,
    /// A frame (partial or final) is ready for delivery.
    Frame(ResponseFrame),
}

/// Streaming decoder for Gibson reply frames.
///
/// One instance per connection. Single-threaded and cooperative: it is
/// invoked synchronously from the transport's read path and holds no
/// resources beyond the in-progress accumulator, which
/// [`reset`](Self::reset) discards on teardown.
#[derive(Debug)]
pub struct ResponseDecoder {
    config: DecoderConfig,
    state: DecodeState,
}

impl ResponseDecoder {
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            state: DecodeState::AwaitingHeader,
        }
    }

    /// Configured address width.
    #[must_use]
    pub fn width(&self) -> AddrWidth { self.config.width }

    /// Whether the decoder sits at a frame boundary.
    ///
    /// Lets the transport classify an EOF as a clean close (idle) or a
    /// truncated response (mid-frame).
    #[must_use]
    pub fn is_idle(&self) -> bool { matches!(self.state, DecodeState::AwaitingHeader) }

    /// Discard any partially-decoded response, e.g. on connection teardown.
    pub fn reset(&mut self) { self.state = DecodeState::AwaitingHeader; }

    /// Attempt to decode the next frame from `cursor`.
    ///
    /// `Ok(None)` means decode starvation: more bytes are needed, and the
    /// cursor has not moved past any partially-examined unit. `Ok(Some(_))`
    /// yields one frame, which is either final or an intermediate
    /// multi-entry batch (`is_final == false`).
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when a header or entry prefix violates the
    /// configured sanity bounds; the stream is then unframeable and the
    /// transport should drop the connection.
    pub fn poll_frame<C>(&mut self, cursor: &mut C) -> Result<Option<ResponseFrame>, DecodeError>
    where
        C: ByteCursor + ?Sized,
    {
        loop {
            let step = match &self.state {
                DecodeState::AwaitingHeader => self.take_header(cursor)?,
                DecodeState::AwaitingFixedBody { .. } => self.take_body(cursor)?,
                DecodeState::AwaitingMultiEntry { .. } => self.take_entries(cursor)?,
            };
            match step {
                Step::Starved => return Ok(None),
                Step::Continue => {}
                Step::Frame(frame) => return Ok(Some(frame)),
            }
        }
    }

    /// Decode every frame already buffered, dispatching to `sink`.
    ///
    /// Final frames go to [`ResponseSink::deliver_complete`]; intermediate
    /// multi-entry frames go to [`ResponseSink::deliver_partial`]. Returns
    /// once no further progress is possible, which covers pipelined replies
    /// sitting back-to-back in the buffer.
    ///
    /// # Errors
    ///
    /// Propagates the first [`DecodeError`]; frames decoded before the
    /// failure have already been delivered.
    pub fn pump<C, S>(&mut self, cursor: &mut C, sink: &mut S) -> Result<(), DecodeError>
    where
        C: ByteCursor + ?Sized,
        S: ResponseSink + ?Sized,
    {
        while let Some(frame) = self.poll_frame(cursor)? {
            if frame.is_final {
                sink.deliver_complete(frame);
            } else {
                sink.deliver_partial(frame);
            }
        }
        Ok(())
    }

    /// Parse one complete reply header, or report starvation.
    ///
    /// The header is peeked in full (status, encoding, length, and for
    /// multi-entry replies the total count) and consumed atomically, so a
    /// split header never commits a partial read.
    fn take_header<C>(&mut self, cursor: &mut C) -> Result<Step, DecodeError>
    where
        C: ByteCursor + ?Sized,
    {
        let Some(status_bytes) = cursor.peek(0, STATUS_LEN) else {
            return Ok(Step::Starved);
        };
        let status = StatusCode::from_raw(u16::from_le_bytes([status_bytes[0], status_bytes[1]]));
        let shape = status.body_shape();

        let width = self.config.width.bytes();
        let counted = matches!(shape, BodyShape::MultiEntry);
        let header_len = STATUS_LEN + ENCODING_LEN + width + if counted { width } else { 0 };
        let Some(rest) = cursor.peek(STATUS_LEN, header_len - STATUS_LEN) else {
            return Ok(Step::Starved);
        };

        let encoding = rest[0];
        let body_len = self.config.width.read_len(&rest[ENCODING_LEN..]);
        if matches!(shape, BodyShape::Fixed) && body_len > self.config.max_body_len {
            return Err(fail_fast(DecodeError::OversizedBody {
                size: body_len,
                max: self.config.max_body_len,
            }));
        }
        let header = ResponseHeader {
            status,
            encoding,
            body_len,
        };

        match shape {
            BodyShape::None => {
                cursor.consume(header_len);
                tracing::debug!(status = ?status, "decoded status-only reply");
                Ok(Step::Frame(ResponseFrame {
                    status,
                    encoding,
                    body: match status {
                        StatusCode::Ok => ResponseBody::Ok,
                        StatusCode::NotFound => ResponseBody::Absent,
                        _ => ResponseBody::Failed,
                    },
                    is_final: true,
                    entries_delivered: 1,
                    entries_expected: 1,
                }))
            }
            BodyShape::Fixed => {
                cursor.consume(header_len);
                tracing::trace!(status = ?status, body_len, "awaiting value payload");
                self.state = DecodeState::AwaitingFixedBody { header };
                Ok(Step::Continue)
            }
            BodyShape::MultiEntry => {
                let expected = self.config.width.read_len(&rest[ENCODING_LEN + width..]);
                if expected > self.config.max_entries {
                    return Err(fail_fast(DecodeError::OversizedEntrySet {
                        count: expected,
                        max: self.config.max_entries,
                    }));
                }
                cursor.consume(header_len);
                if expected == 0 {
                    tracing::debug!(status = ?status, "decoded empty multi-entry reply");
                    return Ok(Step::Frame(ResponseFrame {
                        status,
                        encoding,
                        body: ResponseBody::Entries(Vec::new()),
                        is_final: true,
                        entries_delivered: 0,
                        entries_expected: 0,
                    }));
                }
                tracing::trace!(status = ?status, expected, "awaiting multi-entry payload");
                self.state = DecodeState::AwaitingMultiEntry {
                    header,
                    expected,
                    delivered: 0,
                    batch: Vec::new(),
                };
                Ok(Step::Continue)
            }
        }
    }

    /// Consume a fixed-length value payload once it is fully buffered.
    fn take_body<C>(&mut self, cursor: &mut C) -> Result<Step, DecodeError>
    where
        C: ByteCursor + ?Sized,
    {
        let DecodeState::AwaitingFixedBody { header } = &self.state else {
            unreachable!("take_body entered outside AwaitingFixedBody");
        };
        let len = usize::try_from(header.body_len).map_err(|_| {
            fail_fast(DecodeError::OversizedBody {
                size: header.body_len,
                max: self.config.max_body_len,
            })
        })?;
        let Some(payload) = cursor.peek(0, len) else {
            cursor.set_low_watermark(len);
            return Ok(Step::Starved);
        };
        let value = Bytes::copy_from_slice(payload);
        cursor.consume(len);

        let DecodeState::AwaitingFixedBody { header } =
            std::mem::replace(&mut self.state, DecodeState::AwaitingHeader)
        else {
            unreachable!("state changed during take_body");
        };
        tracing::debug!(status = ?header.status, len, "decoded value reply");
        Ok(Step::Frame(ResponseFrame {
            status: header.status,
            encoding: header.encoding,
            body: ResponseBody::Value(value),
            is_final: true,
            entries_delivered: 1,
            entries_expected: 1,
        }))
    }

    /// Consume fully-buffered entries, batching them into one frame.
    ///
    /// Loops without returning to the caller while complete entries remain
    /// buffered. A starved look-ahead with a non-empty batch yields an
    /// intermediate frame; with an empty batch it reports starvation.
    fn take_entries<C>(&mut self, cursor: &mut C) -> Result<Step, DecodeError>
    where
        C: ByteCursor + ?Sized,
    {
        let width = self.config.width;
        let max_field = self.config.max_body_len;
        let DecodeState::AwaitingMultiEntry {
            header,
            expected,
            delivered,
            batch,
        } = &mut self.state
        else {
            unreachable!("take_entries entered outside AwaitingMultiEntry");
        };

        let frame = loop {
            let Some((entry, wire_len)) = peek_entry(cursor, width, max_field)? else {
                if batch.is_empty() {
                    return Ok(Step::Starved);
                }
                tracing::trace!(
                    delivered = *delivered,
                    expected = *expected,
                    "partial multi-entry batch"
                );
                return Ok(Step::Frame(ResponseFrame {
                    status: header.status,
                    encoding: header.encoding,
                    body: ResponseBody::Entries(std::mem::take(batch)),
                    is_final: false,
                    entries_delivered: *delivered,
                    entries_expected: *expected,
                }));
            };
            cursor.consume(wire_len);
            batch.push(entry);
            *delivered += 1;
            if *delivered == *expected {
                break ResponseFrame {
                    status: header.status,
                    encoding: header.encoding,
                    body: ResponseBody::Entries(std::mem::take(batch)),
                    is_final: true,
                    entries_delivered: *delivered,
                    entries_expected: *expected,
                };
            }
        };

        self.state = DecodeState::AwaitingHeader;
        tracing::debug!(
            entries = frame.entries_expected,
            "decoded multi-entry reply"
        );
        Ok(Step::Frame(frame))
    }
}

/// Look ahead at one complete `(key_len, key, val_len, val)` unit without
/// moving the cursor.
///
/// Returns the entry and its total wire size, or `None` when any part of it
/// is still missing. Never consuming on a miss is what lets a half-read
/// entry be re-attempted in full once more bytes arrive.
fn peek_entry<C>(
    cursor: &C,
    width: AddrWidth,
    max_field: u64,
) -> Result<Option<(Entry, usize)>, DecodeError>
where
    C: ByteCursor + ?Sized,
{
    let w = width.bytes();

    let Some(prefix) = cursor.peek(0, w) else {
        return Ok(None);
    };
    let key_len = checked_field_len(width.read_len(prefix), max_field)?;
    let Some(key) = cursor.peek(w, key_len) else {
        return Ok(None);
    };

    let mut offset = w + key_len;
    let Some(prefix) = cursor.peek(offset, w) else {
        return Ok(None);
    };
    let val_len = checked_field_len(width.read_len(prefix), max_field)?;
    offset += w;
    let Some(value) = cursor.peek(offset, val_len) else {
        return Ok(None);
    };

    let entry = Entry {
        key: Bytes::copy_from_slice(key),
        value: Bytes::copy_from_slice(value),
    };
    Ok(Some((entry, offset + val_len)))
}

/// Validate a declared key or value length against the configured bound.
fn checked_field_len(len: u64, max_field: u64) -> Result<usize, DecodeError> {
    if len > max_field {
        return Err(fail_fast(DecodeError::OversizedEntry {
            size: len,
            max: max_field,
        }));
    }
    usize::try_from(len).map_err(|_| {
        fail_fast(DecodeError::OversizedEntry {
            size: len,
            max: max_field,
        })
    })
}

/// Record a fail-fast framing error before surfacing it; the stream is
/// unframeable from this point and the transport is expected to drop the
/// connection.
fn fail_fast(err: DecodeError) -> DecodeError {
    warn!("unframeable response stream: {err}");
    err
}
