//! Codec trait and the fixed-width frame implementation.
//!
//! A "codec" (coder/decoder) converts between [`Packet`] values and raw
//! bytes. Readers and writers only depend on the [`Codec`] trait, so the
//! framing can be swapped without touching the I/O layer.
//!
//! Unlike a self-delimiting format, decoding here works on a *stream*:
//! the buffer may hold half a frame, exactly one frame, or several frames
//! back to back. `decode` therefore reports how many bytes it consumed,
//! and `None` when it needs more.
//!
//! The tag byte is written by hand; every payload is a serde-derived
//! body serialized with `bincode` in big-endian, fixed-int form, so a
//! body's encoded width is the sum of its field widths.

use bincode::Options;

use crate::{Packet, PacketKind, ProtocolError};

/// A successfully decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// The packet, tagged with its kind.
    pub packet: Packet,
    /// How many bytes of the input the frame occupied.
    pub consumed: usize,
}

/// Encodes packets to bytes and resolves byte runs back to packets.
///
/// ## Contract
///
/// - `encode` is deterministic.
/// - `decode(encode(p), [p.kind()])` yields `p` and consumes every byte.
/// - For any buffer, at most one candidate kind can match: the framing
///   must never leave two kinds ambiguous within one `decode` call.
pub trait Codec: Send + Sync + 'static {
    /// Appends the encoding of `packet` to `dst`.
    ///
    /// # Errors
    /// `ProtocolError::Encode` if the serializer rejects a body.
    fn encode(&self, packet: &Packet, dst: &mut Vec<u8>) -> Result<(), ProtocolError>;

    /// Tries to decode one frame from the front of `src`, accepting only
    /// kinds listed in `candidates`.
    ///
    /// Returns `Ok(None)` if `src` does not yet hold a complete frame.
    ///
    /// # Errors
    /// - `ProtocolError::UnknownTag` if the frame names no known kind.
    /// - `ProtocolError::UnexpectedKind` if the frame is a known kind
    ///   outside `candidates`.
    /// - `ProtocolError::Decode` if the payload does not deserialize.
    fn decode(
        &self,
        src: &[u8],
        candidates: &[PacketKind],
    ) -> Result<Option<Decoded>, ProtocolError>;
}

// ---------------------------------------------------------------------------
// FrameCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] for tag-prefixed, fixed-width, big-endian frames.
///
/// Frame layouts (lengths include the tag):
///
/// ```text
/// ClientHandshake 0x01 | mode u32 | name [u8; 32]   37 bytes
/// ServerHandshake 0x02 | symbol u8 | width u8 | height u8   4 bytes
/// Feedback        0x03 | code u8                     2 bytes
/// Keepalive       0x04                               1 byte
/// FieldSet        0x05 | x u32 | y u32 | field u8   10 bytes
/// GameEnd         0x06 | result u8                   2 bytes
/// ```
///
/// ## Example
///
/// ```rust
/// use gridwire_protocol::{Codec, FieldSet, FrameCodec, Packet, PacketKind};
///
/// let codec = FrameCodec;
/// let packet = Packet::FieldSet(FieldSet { x: 1, y: 2, field: 1 });
///
/// let mut bytes = Vec::new();
/// codec.encode(&packet, &mut bytes).unwrap();
///
/// let decoded = codec
///     .decode(&bytes, &[PacketKind::FieldSet])
///     .unwrap()
///     .unwrap();
/// assert_eq!(decoded.packet, packet);
/// assert_eq!(decoded.consumed, bytes.len());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec;

/// The bincode configuration every payload goes through.
///
/// Fixed-int encoding keeps `u32` at four bytes; the default varint
/// encoding would make frame widths depend on the values.
fn wire() -> impl Options {
    bincode::DefaultOptions::new()
        .with_big_endian()
        .with_fixint_encoding()
}

impl Codec for FrameCodec {
    fn encode(&self, packet: &Packet, dst: &mut Vec<u8>) -> Result<(), ProtocolError> {
        dst.reserve(packet.kind().frame_len());
        dst.push(packet.kind().tag());
        let body = match packet {
            Packet::ClientHandshake(p) => wire().serialize_into(&mut *dst, p),
            Packet::ServerHandshake(p) => wire().serialize_into(&mut *dst, p),
            Packet::Feedback(p) => wire().serialize_into(&mut *dst, p),
            Packet::Keepalive(p) => wire().serialize_into(&mut *dst, p),
            Packet::FieldSet(p) => wire().serialize_into(&mut *dst, p),
            Packet::GameEnd(p) => wire().serialize_into(&mut *dst, p),
        };
        body.map_err(ProtocolError::Encode)
    }

    fn decode(
        &self,
        src: &[u8],
        candidates: &[PacketKind],
    ) -> Result<Option<Decoded>, ProtocolError> {
        let Some(&tag) = src.first() else {
            return Ok(None);
        };
        let kind =
            PacketKind::from_tag(tag).ok_or(ProtocolError::UnknownTag(tag))?;
        let frame_len = kind.frame_len();

        if !candidates.contains(&kind) {
            return Err(ProtocolError::UnexpectedKind { kind, frame_len });
        }
        if src.len() < frame_len {
            return Ok(None);
        }

        // The tag has been checked; `body` is exactly the payload.
        let body = &src[1..frame_len];
        let packet = match kind {
            PacketKind::ClientHandshake => Packet::ClientHandshake(read_body(body)?),
            PacketKind::ServerHandshake => Packet::ServerHandshake(read_body(body)?),
            PacketKind::Feedback => Packet::Feedback(read_body(body)?),
            PacketKind::Keepalive => Packet::Keepalive(read_body(body)?),
            PacketKind::FieldSet => Packet::FieldSet(read_body(body)?),
            PacketKind::GameEnd => Packet::GameEnd(read_body(body)?),
        };

        Ok(Some(Decoded {
            packet,
            consumed: frame_len,
        }))
    }
}

fn read_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ProtocolError> {
    wire().deserialize(body).map_err(ProtocolError::Decode)
}
