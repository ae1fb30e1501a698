#![cfg(any(test, feature = "test-helpers"))]
//! Synthetic reply encoders for tests.
//!
//! The decoder never writes the wire format; these helpers exist so tests
//! and downstream transports can fabricate server replies byte-for-byte.

use bytes::{BufMut, BytesMut};

use crate::{status::StatusCode, width::AddrWidth};

fn put_header(dst: &mut BytesMut, width: AddrWidth, raw_status: u16, encoding: u8, body_len: u64) {
    dst.put_u16_le(raw_status);
    dst.put_u8(encoding);
    width
        .write_len(body_len, dst)
        .expect("test body length fits the configured width");
}

/// Encode a header-only reply (status codes `0x00`–`0x05`).
#[must_use]
pub fn encode_status(width: AddrWidth, status: StatusCode, encoding: u8) -> BytesMut {
    let mut dst = BytesMut::new();
    put_header(&mut dst, width, status.as_raw(), encoding, 0);
    dst
}

/// Encode a single-value reply under status `0x06`.
#[must_use]
pub fn encode_value(width: AddrWidth, encoding: u8, value: &[u8]) -> BytesMut {
    encode_raw_value(width, StatusCode::Value.as_raw(), encoding, value)
}

/// Encode a value-shaped reply under an arbitrary raw status code.
///
/// Lets tests exercise the forward-compatibility rule for codes outside the
/// known taxonomy.
#[must_use]
pub fn encode_raw_value(width: AddrWidth, raw_status: u16, encoding: u8, value: &[u8]) -> BytesMut {
    let mut dst = BytesMut::new();
    put_header(&mut dst, width, raw_status, encoding, value.len() as u64);
    dst.extend_from_slice(value);
    dst
}

/// Encode a multi-entry reply under status `0x07`.
///
/// The header's body length covers the entry data that follows, matching
/// what the server emits; the decoder trusts the entry count instead.
#[must_use]
pub fn encode_multi(width: AddrWidth, encoding: u8, entries: &[(&[u8], &[u8])]) -> BytesMut {
    let w = width.bytes() as u64;
    let body_len: u64 = entries
        .iter()
        .map(|(k, v)| 2 * w + k.len() as u64 + v.len() as u64)
        .sum();

    let mut dst = BytesMut::new();
    put_header(
        &mut dst,
        width,
        StatusCode::MultiValue.as_raw(),
        encoding,
        body_len,
    );
    width
        .write_len(entries.len() as u64, &mut dst)
        .expect("test entry count fits the configured width");
    for (key, value) in entries {
        width
            .write_len(key.len() as u64, &mut dst)
            .expect("test key length fits the configured width");
        dst.extend_from_slice(key);
        width
            .write_len(value.len() as u64, &mut dst)
            .expect("test value length fits the configured width");
        dst.extend_from_slice(value);
    }
    dst
}
