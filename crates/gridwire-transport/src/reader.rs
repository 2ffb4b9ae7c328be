//! The receiving half of a connection.

use gridwire_protocol::{Codec, FrameCodec, Packet, PacketKind, ProtocolError};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{Notifier, TransportError};

/// Reads frames from one socket and resolves them to packets.
///
/// Each call to [`read_one`](Self::read_one) or
/// [`read_any`](Self::read_any) arms exactly one receive and completes
/// with exactly one packet. Nothing re-arms on its own: the caller asks
/// for the next packet when it is ready for it.
///
/// Bytes that arrive beyond the current frame stay buffered for the next
/// call, and both reads are cancel-safe: dropping a pending read loses
/// nothing.
///
/// The first I/O failure, orderly remote close, or protocol violation
/// fires [`on_disconnect`](Self::on_disconnect) once. From then on every
/// read returns `TransportError::Disconnected` immediately.
pub struct AsyncReader<R, C = FrameCodec> {
    io: R,
    codec: C,
    buf: Vec<u8>,
    disconnected: bool,
    on_disconnect: Notifier<()>,
}

impl<R, C> AsyncReader<R, C>
where
    R: AsyncRead + Unpin,
    C: Codec,
{
    /// Wraps the read side of a socket.
    pub fn new(io: R, codec: C) -> Self {
        Self::with_capacity(io, codec, 64)
    }

    /// Like [`new`](Self::new), with an initial buffer capacity.
    pub fn with_capacity(io: R, codec: C, capacity: usize) -> Self {
        Self {
            io,
            codec,
            buf: Vec::with_capacity(capacity),
            disconnected: false,
            on_disconnect: Notifier::new(),
        }
    }

    /// Subscribers fired once when the connection is lost.
    pub fn on_disconnect(&mut self) -> &mut Notifier<()> {
        &mut self.on_disconnect
    }

    /// Returns `true` once a disconnect has been reported.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Waits for a packet of exactly `kind`.
    ///
    /// Complete frames of other known kinds are skipped. An unknown tag
    /// is still fatal.
    pub async fn read_one(&mut self, kind: PacketKind) -> Result<Packet, TransportError> {
        self.read_frame(&[kind], true).await
    }

    /// Waits for a packet of any kind in `kinds` and returns it, tagged.
    ///
    /// A frame of a known kind outside `kinds` is a protocol violation
    /// and disconnects the reader.
    pub async fn read_any(&mut self, kinds: &[PacketKind]) -> Result<Packet, TransportError> {
        self.read_frame(kinds, false).await
    }

    async fn read_frame(
        &mut self,
        kinds: &[PacketKind],
        skip_others: bool,
    ) -> Result<Packet, TransportError> {
        if self.disconnected {
            return Err(TransportError::Disconnected);
        }

        loop {
            match self.codec.decode(&self.buf, kinds) {
                Ok(Some(decoded)) => {
                    self.buf.drain(..decoded.consumed);
                    tracing::trace!(kind = %decoded.packet.kind(), "frame received");
                    return Ok(decoded.packet);
                }
                Ok(None) => {}
                Err(ProtocolError::UnexpectedKind { kind, frame_len }) if skip_others => {
                    if self.buf.len() >= frame_len {
                        self.buf.drain(..frame_len);
                        tracing::debug!(%kind, "skipping frame while waiting for {kinds:?}");
                        continue;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "protocol violation, dropping connection");
                    return Err(self.disconnect(TransportError::Protocol(e)));
                }
            }

            match self.io.read_buf(&mut self.buf).await {
                Ok(0) => {
                    if !self.buf.is_empty() {
                        tracing::debug!(pending = self.buf.len(), "closed mid-frame");
                    }
                    return Err(self.disconnect(TransportError::ConnectionClosed(
                        "remote closed the connection".into(),
                    )));
                }
                Ok(n) => tracing::trace!(bytes = n, "read"),
                Err(e) => return Err(self.disconnect(TransportError::ReceiveFailed(e))),
            }
        }
    }

    fn disconnect(&mut self, err: TransportError) -> TransportError {
        if !self.disconnected {
            self.disconnected = true;
            tracing::debug!(error = %err, "reader disconnected");
            self.on_disconnect.fire(&());
        }
        err
    }
}
