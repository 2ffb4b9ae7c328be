//! Error types for the protocol layer.
//!
//! Each crate in Gridwire defines its own error enum. A `ProtocolError`
//! always means the *bytes* were wrong, never the network.

use crate::PacketKind;

/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The leading byte does not name any known packet kind.
    ///
    /// There is no way to resynchronize a fixed-width stream after this:
    /// we no longer know where the next frame starts.
    #[error("unknown packet tag {0:#04x}")]
    UnknownTag(u8),

    /// A well-formed frame of a known kind arrived, but the reader was
    /// not waiting for that kind.
    ///
    /// `frame_len` tells the caller how many bytes the frame occupies,
    /// so it can choose to skip it instead of failing.
    #[error("unexpected {kind} packet")]
    UnexpectedKind {
        kind: PacketKind,
        frame_len: usize,
    },

    /// The serializer rejected a packet body.
    #[error("encode failed: {0}")]
    Encode(bincode::Error),

    /// A complete frame's payload did not deserialize.
    #[error("decode failed: {0}")]
    Decode(bincode::Error),

    /// The value cannot be represented on the wire (e.g. a name that
    /// does not fit the fixed-width buffer).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
