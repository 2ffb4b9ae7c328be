//! Integration tests for the async reader and writer.
//!
//! Most tests run over `tokio::io::duplex`, an in-memory pipe: one end
//! is wrapped by the reader or writer under test, the other end plays
//! the remote peer and writes (or reads) raw frames.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use gridwire_protocol::{
    Codec, FieldSet, Feedback, FrameCodec, GameEnd, Keepalive, Packet,
    PacketKind, ServerHandshake,
};
use gridwire_transport::{AsyncReader, AsyncWriter, TransportError};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};

// =========================================================================
// Helpers
// =========================================================================

const LISTEN: [PacketKind; 4] = [
    PacketKind::Keepalive,
    PacketKind::ServerHandshake,
    PacketKind::GameEnd,
    PacketKind::FieldSet,
];

fn frame(packet: impl Into<Packet>) -> Vec<u8> {
    let mut out = Vec::new();
    FrameCodec.encode(&packet.into(), &mut out).unwrap();
    out
}

/// Returns a reader over one end of a pipe, the peer end, and a counter
/// of disconnect notifications.
fn reader_pair() -> (AsyncReader<DuplexStream>, DuplexStream, Arc<Mutex<u32>>) {
    let (local, peer) = duplex(256);
    let mut reader = AsyncReader::new(local, FrameCodec);
    let fired = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&fired);
    reader
        .on_disconnect()
        .subscribe(move |_| *counter.lock().unwrap() += 1);
    (reader, peer, fired)
}

// =========================================================================
// Reader
// =========================================================================

#[tokio::test]
async fn test_read_any_resolves_each_listed_kind() {
    let (mut reader, mut peer, _) = reader_pair();

    let sent: Vec<Packet> = vec![
        Keepalive.into(),
        ServerHandshake { symbol: 1, width: 3, height: 3 }.into(),
        FieldSet { x: 2, y: 0, field: 1 }.into(),
        GameEnd { result: 1 }.into(),
    ];
    for p in &sent {
        peer.write_all(&frame(*p)).await.unwrap();
    }

    for expected in sent {
        let got = reader.read_any(&LISTEN).await.unwrap();
        assert_eq!(got, expected);
    }
}

#[tokio::test]
async fn test_read_reassembles_frame_split_across_writes() {
    let (mut reader, mut peer, _) = reader_pair();
    let bytes = frame(FieldSet { x: 300, y: 7, field: 2 });

    let writer = tokio::spawn(async move {
        peer.write_all(&bytes[..3]).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        peer.write_all(&bytes[3..]).await.unwrap();
        peer
    });

    let got = reader.read_any(&LISTEN).await.unwrap();
    assert_eq!(got, Packet::FieldSet(FieldSet { x: 300, y: 7, field: 2 }));
    let _peer = writer.await.unwrap();
}

#[tokio::test]
async fn test_field_sets_arrive_in_wire_order() {
    let (mut reader, mut peer, _) = reader_pair();

    let mut burst = Vec::new();
    for i in 0..10 {
        burst.extend(frame(FieldSet { x: i, y: i * 2, field: 1 }));
    }
    peer.write_all(&burst).await.unwrap();

    for i in 0..10 {
        match reader.read_any(&LISTEN).await.unwrap() {
            Packet::FieldSet(f) => assert_eq!((f.x, f.y), (i, i * 2)),
            other => panic!("expected FieldSet, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_read_one_skips_other_known_kinds() {
    let (mut reader, mut peer, fired) = reader_pair();

    peer.write_all(&frame(Keepalive)).await.unwrap();
    peer.write_all(&frame(GameEnd { result: 0 })).await.unwrap();
    peer.write_all(&frame(Feedback { code: 5 })).await.unwrap();

    let got = reader.read_one(PacketKind::Feedback).await.unwrap();
    assert_eq!(got, Packet::Feedback(Feedback { code: 5 }));
    assert_eq!(*fired.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_read_any_rejects_unlisted_kind() {
    let (mut reader, mut peer, fired) = reader_pair();

    peer.write_all(&frame(Feedback { code: 0 })).await.unwrap();

    let err = reader.read_any(&LISTEN).await.unwrap_err();
    assert!(matches!(err, TransportError::Protocol(_)));
    assert!(reader.is_disconnected());
    assert_eq!(*fired.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_unknown_tag_is_fatal() {
    let (mut reader, mut peer, fired) = reader_pair();

    peer.write_all(&[0xEE, 0x00, 0x01]).await.unwrap();

    let err = reader.read_one(PacketKind::Feedback).await.unwrap_err();
    assert!(matches!(err, TransportError::Protocol(_)));
    assert_eq!(*fired.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_remote_close_fires_disconnect_once() {
    let (mut reader, peer, fired) = reader_pair();
    drop(peer);

    let err = reader.read_any(&LISTEN).await.unwrap_err();
    assert!(matches!(err, TransportError::ConnectionClosed(_)));

    // Further requests are refused without a second notification.
    let err = reader.read_any(&LISTEN).await.unwrap_err();
    assert!(matches!(err, TransportError::Disconnected));
    let err = reader.read_one(PacketKind::Feedback).await.unwrap_err();
    assert!(matches!(err, TransportError::Disconnected));

    assert_eq!(*fired.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_close_mid_frame_is_a_disconnect() {
    let (mut reader, mut peer, fired) = reader_pair();
    peer.write_all(&frame(FieldSet { x: 1, y: 1, field: 1 })[..4])
        .await
        .unwrap();
    drop(peer);

    let err = reader.read_any(&LISTEN).await.unwrap_err();
    assert!(matches!(err, TransportError::ConnectionClosed(_)));
    assert_eq!(*fired.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_dropped_read_keeps_buffered_bytes() {
    let (mut reader, mut peer, _) = reader_pair();
    let bytes = frame(ServerHandshake { symbol: 2, width: 4, height: 5 });

    peer.write_all(&bytes[..2]).await.unwrap();
    // The read cannot complete; give up on it after a moment.
    let pending =
        tokio::time::timeout(Duration::from_millis(20), reader.read_any(&LISTEN)).await;
    assert!(pending.is_err(), "read should still be waiting");

    peer.write_all(&bytes[2..]).await.unwrap();
    let got = reader.read_any(&LISTEN).await.unwrap();
    assert_eq!(
        got,
        Packet::ServerHandshake(ServerHandshake { symbol: 2, width: 4, height: 5 })
    );
}

// =========================================================================
// Writer
// =========================================================================

#[tokio::test]
async fn test_write_sends_whole_frame() {
    let (local, mut peer) = duplex(256);
    let mut writer = AsyncWriter::new(local, FrameCodec);

    let packet = Packet::FieldSet(FieldSet { x: 1, y: 2, field: 1 });
    writer.write(&packet).await.unwrap();

    let mut buf = vec![0u8; PacketKind::FieldSet.frame_len()];
    peer.read_exact(&mut buf).await.unwrap();
    assert_eq!(buf, frame(packet));
}

#[tokio::test]
async fn test_write_failure_fires_disconnect_once() {
    let (local, peer) = duplex(256);
    drop(peer);

    let mut writer = AsyncWriter::new(local, FrameCodec);
    let fired = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&fired);
    writer
        .on_disconnect()
        .subscribe(move |_| *counter.lock().unwrap() += 1);

    let err = writer.write(&Keepalive.into()).await.unwrap_err();
    assert!(matches!(err, TransportError::SendFailed(_)));
    assert!(writer.is_disconnected());

    let err = writer.write(&Keepalive.into()).await.unwrap_err();
    assert!(matches!(err, TransportError::Disconnected));
    assert_eq!(*fired.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_shutdown_is_silent_and_final() {
    let (local, mut peer) = duplex(256);
    let mut writer = AsyncWriter::new(local, FrameCodec);
    let fired = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&fired);
    writer
        .on_disconnect()
        .subscribe(move |_| *counter.lock().unwrap() += 1);

    writer.shutdown().await.unwrap();

    let mut buf = Vec::new();
    assert_eq!(peer.read_to_end(&mut buf).await.unwrap(), 0);
    assert!(matches!(
        writer.write(&Keepalive.into()).await,
        Err(TransportError::Disconnected)
    ));
    assert_eq!(*fired.lock().unwrap(), 0);
}

// =========================================================================
// TCP
// =========================================================================

#[tokio::test]
async fn test_tcp_halves_carry_frames_both_ways() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port().to_string();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1];
        stream.read_exact(&mut buf).await.unwrap();
        // Echo the keepalive, then end the game.
        stream.write_all(&buf).await.unwrap();
        stream.write_all(&frame(GameEnd { result: 3 })).await.unwrap();
    });

    let stream = gridwire_transport::connect("127.0.0.1", &port).await.unwrap();
    let (read_half, write_half) = stream.into_split();
    let mut reader = AsyncReader::new(read_half, FrameCodec);
    let mut writer = AsyncWriter::new(write_half, FrameCodec);

    writer.write(&Keepalive.into()).await.unwrap();
    assert_eq!(
        reader.read_any(&LISTEN).await.unwrap(),
        Packet::Keepalive(Keepalive)
    );
    assert_eq!(
        reader.read_any(&LISTEN).await.unwrap(),
        Packet::GameEnd(GameEnd { result: 3 })
    );
    server.await.unwrap();
}

#[tokio::test]
async fn test_connect_refused_is_reported() {
    // Grab a free port, then close the listener so nothing answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port().to_string();
    drop(listener);

    let err = gridwire_transport::connect("127.0.0.1", &port)
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::ConnectFailed { .. }));
}

#[tokio::test]
async fn test_connect_bad_port_is_a_resolve_error() {
    let err = gridwire_transport::connect("127.0.0.1", "not-a-port")
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Resolve { .. }));
}
