//! The sending half of a connection.

use gridwire_protocol::{Codec, FrameCodec, Packet};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{Notifier, TransportError};

/// Encodes packets and writes them, whole, to one socket.
///
/// `write` resolves once the complete frame has been handed to the
/// socket; awaiting it *is* the completion callback. A write must be
/// driven to completion. It is not cancel-safe, and a dropped write may
/// leave half a frame on the wire.
///
/// The first failed write fires [`on_disconnect`](Self::on_disconnect)
/// once; later writes return `TransportError::Disconnected` without
/// touching the socket.
pub struct AsyncWriter<W, C = FrameCodec> {
    io: W,
    codec: C,
    scratch: Vec<u8>,
    disconnected: bool,
    on_disconnect: Notifier<()>,
}

impl<W, C> AsyncWriter<W, C>
where
    W: AsyncWrite + Unpin,
    C: Codec,
{
    /// Wraps the write side of a socket.
    pub fn new(io: W, codec: C) -> Self {
        Self {
            io,
            codec,
            scratch: Vec::new(),
            disconnected: false,
            on_disconnect: Notifier::new(),
        }
    }

    /// Subscribers fired once when a write fails.
    pub fn on_disconnect(&mut self) -> &mut Notifier<()> {
        &mut self.on_disconnect
    }

    /// Returns `true` once a disconnect has been reported.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Encodes `packet` and writes the full frame.
    pub async fn write(&mut self, packet: &Packet) -> Result<(), TransportError> {
        if self.disconnected {
            return Err(TransportError::Disconnected);
        }

        self.scratch.clear();
        // Nothing has touched the socket yet, so the link stays up.
        self.codec.encode(packet, &mut self.scratch)?;

        let result = match self.io.write_all(&self.scratch).await {
            Ok(()) => self.io.flush().await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                tracing::trace!(kind = %packet.kind(), bytes = self.scratch.len(), "frame sent");
                Ok(())
            }
            Err(e) => Err(self.disconnect(TransportError::SendFailed(e))),
        }
    }

    /// Shuts down the write direction. The writer is disconnected
    /// afterwards, but a local shutdown does not fire `on_disconnect`.
    pub async fn shutdown(&mut self) -> Result<(), TransportError> {
        if self.disconnected {
            return Ok(());
        }
        self.disconnected = true;
        self.io.shutdown().await.map_err(TransportError::SendFailed)
    }

    fn disconnect(&mut self, err: TransportError) -> TransportError {
        if !self.disconnected {
            self.disconnected = true;
            tracing::debug!(error = %err, "writer disconnected");
            self.on_disconnect.fire(&());
        }
        err
    }
}
