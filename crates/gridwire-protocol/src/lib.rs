//! Wire protocol for Gridwire.
//!
//! This crate defines the "language" the client and the game server speak:
//!
//! - **Types** ([`Packet`], [`PacketKind`], and the packet bodies):
//!   the fixed-shape records that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`FrameCodec`]): how those records
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while framing.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about sockets. It turns packets into
//! bytes and byte runs back into packets; the transport layer decides
//! when to read and write.
//!
//! ```text
//! Session (state machine) → Transport (reader/writer) → Protocol (bytes)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, Decoded, FrameCodec};
pub use error::ProtocolError;
pub use types::{
    ClientHandshake, FieldSet, Feedback, GameEnd, Keepalive, NAME_LEN, Packet,
    PacketKind, PlayerName, ServerHandshake,
};
