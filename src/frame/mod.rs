//! Decoded response frames and their building blocks.

use bytes::Bytes;

use crate::status::StatusCode;

/// Fixed portion of a reply header, held by the decoder while a response
/// body is pending.
///
/// Multi-entry replies additionally carry a total-entry count, tracked by
/// the decoder state rather than the header itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ResponseHeader {
    /// Reply status from the first two bytes.
    pub status: StatusCode,
    /// Server-side value encoding tag (plain, number, or compressed).
    pub encoding: u8,
    /// Declared payload length in bytes.
    pub body_len: u64,
}

/// One key/value pair from a multi-entry reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Entry key bytes.
    pub key: Bytes,
    /// Entry value bytes.
    pub value: Bytes,
}

/// Payload of a decoded frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseBody {
    /// Success with no payload.
    Ok,
    /// Key not found; an absent result rather than a failure.
    Absent,
    /// Server-reported failure (generic, numeric, memory limit, or lock).
    Failed,
    /// Single value payload.
    Value(Bytes),
    /// Key/value pairs consumed since the previous delivery for the same
    /// response.
    Entries(Vec<Entry>),
}

/// One decoded unit delivered to the response sink.
///
/// Non-multi-entry replies produce exactly one final frame. Multi-entry
/// replies may produce intermediate frames when the buffer starves mid-set;
/// each carries the entries decoded since the previous delivery, and the
/// cumulative counters let the consumer track progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseFrame {
    /// Reply status.
    pub status: StatusCode,
    /// Server-side value encoding tag.
    pub encoding: u8,
    /// Decoded payload.
    pub body: ResponseBody,
    /// True exactly once per logical response, on its last frame.
    pub is_final: bool,
    /// Entries consumed so far for this response (cumulative).
    pub entries_delivered: u64,
    /// Entries the header promised.
    pub entries_expected: u64,
}

impl ResponseFrame {
    /// Whether the server reported the query as failed.
    #[must_use]
    pub fn is_server_error(&self) -> bool { self.status.is_server_error() }

    /// The single value payload, if this frame carries one.
    #[must_use]
    pub fn value(&self) -> Option<&Bytes> {
        match &self.body {
            ResponseBody::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The entries carried by this frame, if it is part of a multi-entry
    /// reply.
    #[must_use]
    pub fn entries(&self) -> Option<&[Entry]> {
        match &self.body {
            ResponseBody::Entries(entries) => Some(entries),
            _ => None,
        }
    }
}
