//! Integration tests driving the decoder through the `tokio_util` codec
//! adapter, the way a framed transport would.

use bytes::BytesMut;
use futures::StreamExt;
use gibson_wire::{
    AddrWidth,
    DecoderConfig,
    GibsonClientCodec,
    ResponseBody,
    StatusCode,
    test_helpers::{encode_multi, encode_status, encode_value},
};
use tokio::io::AsyncWriteExt;
use tokio_util::codec::{Decoder, FramedRead};

#[tokio::test]
async fn framed_read_yields_frames_in_wire_order() {
    let width = AddrWidth::U32;
    let mut wire = BytesMut::new();
    wire.extend_from_slice(&encode_status(width, StatusCode::Ok, 0));
    wire.extend_from_slice(&encode_value(width, 0, b"hello"));
    wire.extend_from_slice(&encode_multi(width, 0, &[(b"k", b"v")]));

    let (mut tx, rx) = tokio::io::duplex(16);
    let writer = tokio::spawn(async move {
        // Deliberately awkward chunking to land writes inside headers,
        // length prefixes, and payloads.
        for chunk in wire.chunks(3) {
            tx.write_all(chunk).await.expect("write chunk");
        }
        tx.shutdown().await.expect("shutdown");
    });

    let mut framed = FramedRead::new(rx, GibsonClientCodec::new(DecoderConfig::new(width)));
    let mut frames = Vec::new();
    while let Some(item) = framed.next().await {
        frames.push(item.expect("decode"));
    }
    writer.await.expect("writer task");

    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].body, ResponseBody::Ok);
    assert_eq!(frames[1].value().map(AsRef::as_ref), Some(&b"hello"[..]));
    assert_eq!(frames[2].entries().map(<[_]>::len), Some(1));
    assert!(frames.iter().all(|f| f.is_final));
}

#[tokio::test]
async fn eof_mid_response_surfaces_unexpected_eof() {
    let width = AddrWidth::U32;
    let wire = encode_value(width, 0, b"abcdef");
    let (mut tx, rx) = tokio::io::duplex(64);
    tx.write_all(&wire[..wire.len() - 2]).await.expect("write");
    drop(tx);

    let mut framed = FramedRead::new(rx, GibsonClientCodec::new(DecoderConfig::new(width)));
    let first = framed.next().await.expect("stream yields the failure");
    let err = first.expect_err("truncated response must not decode");
    let io: std::io::Error = err.into();
    assert_eq!(io.kind(), std::io::ErrorKind::UnexpectedEof);
}

#[test]
fn codec_decode_reports_starvation_as_none() {
    let width = AddrWidth::U64;
    let wire = encode_value(width, 0, b"xy");
    let mut codec = GibsonClientCodec::new(DecoderConfig::new(width));

    let mut buf = BytesMut::new();
    buf.extend_from_slice(&wire[..wire.len() - 1]);
    assert!(codec.decode(&mut buf).expect("starvation is not an error").is_none());
    assert!(!codec.decoder().is_idle());

    buf.extend_from_slice(&wire[wire.len() - 1..]);
    let frame = codec
        .decode(&mut buf)
        .expect("decode")
        .expect("payload complete");
    assert_eq!(frame.value().map(AsRef::as_ref), Some(&b"xy"[..]));
    assert!(codec.decoder().is_idle());
}

#[test]
fn codec_surfaces_multi_entry_partials_as_items() {
    let width = AddrWidth::U32;
    let wire = encode_multi(width, 0, &[(b"k1", b"v1"), (b"k2", b"v2")]);
    let header_len = 2 + 1 + 4 + 4;
    let entry_len = 4 + 2 + 4 + 2;
    let split = header_len + entry_len + 1;

    let mut codec = GibsonClientCodec::new(DecoderConfig::new(width));
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&wire[..split]);

    let partial = codec
        .decode(&mut buf)
        .expect("decode")
        .expect("one buffered entry");
    assert!(!partial.is_final);
    assert_eq!(partial.entries_delivered, 1);
    assert_eq!(partial.entries_expected, 2);

    buf.extend_from_slice(&wire[split..]);
    let fin = codec
        .decode(&mut buf)
        .expect("decode")
        .expect("set complete");
    assert!(fin.is_final);
    assert_eq!(fin.entries_delivered, 2);
    assert!(buf.is_empty());
}
