//! Packet types for Gridwire's wire format.
//!
//! Every value in this module travels "on the wire": the client encodes
//! it into a fixed-width frame, the server decodes it on the other side
//! (and vice versa). Packet bodies reach the wire through their serde
//! derives. The set of kinds is closed: a peer that speaks a
//! kind not listed here is speaking a different protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ProtocolError;

/// Width of the NUL-padded name buffer carried by [`ClientHandshake`].
pub const NAME_LEN: usize = 32;

// ---------------------------------------------------------------------------
// PacketKind
// ---------------------------------------------------------------------------

/// Identifies which packet a frame encodes.
///
/// The kind is written as the first byte of every frame (its *tag*).
/// Because each kind has exactly one fixed frame length, the tag alone
/// is enough to know how many bytes to wait for and how to decode them.
///
/// ```text
/// ┌──────┬──────────────────────────┐
/// │ tag  │ payload (fixed width)    │
/// │ 1 B  │ frame_len() - 1 bytes    │
/// └──────┴──────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    /// Client → Server: mode and player name.
    ClientHandshake,
    /// Server → Client: assigned symbol and board size.
    ServerHandshake,
    /// Server → Client: acknowledgment of a handshake attempt.
    Feedback,
    /// Server → Client, echoed back verbatim.
    Keepalive,
    /// Either direction: a board cell was claimed.
    FieldSet,
    /// Server → Client: the game is over.
    GameEnd,
}

impl PacketKind {
    /// Every kind, in tag order.
    pub const ALL: [PacketKind; 6] = [
        PacketKind::ClientHandshake,
        PacketKind::ServerHandshake,
        PacketKind::Feedback,
        PacketKind::Keepalive,
        PacketKind::FieldSet,
        PacketKind::GameEnd,
    ];

    /// The leading byte that identifies this kind on the wire.
    pub fn tag(self) -> u8 {
        match self {
            Self::ClientHandshake => 0x01,
            Self::ServerHandshake => 0x02,
            Self::Feedback => 0x03,
            Self::Keepalive => 0x04,
            Self::FieldSet => 0x05,
            Self::GameEnd => 0x06,
        }
    }

    /// Looks up the kind for a tag byte. Returns `None` for unknown tags.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Total encoded length of this kind, tag byte included.
    pub fn frame_len(self) -> usize {
        1 + match self {
            // mode (u32) + name
            Self::ClientHandshake => 4 + NAME_LEN,
            // symbol, width, height
            Self::ServerHandshake => 3,
            Self::Feedback => 1,
            Self::Keepalive => 0,
            // x (u32), y (u32), field (u8)
            Self::FieldSet => 4 + 4 + 1,
            Self::GameEnd => 1,
        }
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientHandshake => write!(f, "ClientHandshake"),
            Self::ServerHandshake => write!(f, "ServerHandshake"),
            Self::Feedback => write!(f, "Feedback"),
            Self::Keepalive => write!(f, "Keepalive"),
            Self::FieldSet => write!(f, "FieldSet"),
            Self::GameEnd => write!(f, "GameEnd"),
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerName
// ---------------------------------------------------------------------------

/// A player name in its on-wire form: exactly [`NAME_LEN`] bytes,
/// padded with NUL.
///
/// Construction rejects names that would not survive the round trip
/// (too long, or containing NUL), so the server never sees a silently
/// truncated name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerName([u8; NAME_LEN]);

impl PlayerName {
    /// Builds a name from a string.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidMessage` if `name` is longer than
    /// [`NAME_LEN`] bytes or contains a NUL byte.
    pub fn new(name: &str) -> Result<Self, ProtocolError> {
        let bytes = name.as_bytes();
        if bytes.len() > NAME_LEN {
            return Err(ProtocolError::InvalidMessage(format!(
                "name is {} bytes, at most {NAME_LEN} allowed",
                bytes.len()
            )));
        }
        if bytes.contains(&0) {
            return Err(ProtocolError::InvalidMessage(
                "name must not contain NUL".into(),
            ));
        }
        let mut buf = [0u8; NAME_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Wraps a raw buffer as received from the wire.
    pub fn from_bytes(bytes: [u8; NAME_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw padded buffer.
    pub fn as_bytes(&self) -> &[u8; NAME_LEN] {
        &self.0
    }

    /// The name without its NUL padding, lossily decoded as UTF-8.
    pub fn to_string_lossy(&self) -> String {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl fmt::Debug for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerName({:?})", self.to_string_lossy())
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

// ---------------------------------------------------------------------------
// Packet bodies
// ---------------------------------------------------------------------------

/// Client → Server: "this is who I am and how I want to play."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientHandshake {
    /// Game mode requested by the client. The console always sends 0.
    pub mode: u32,
    /// Player name, NUL padded.
    pub name: PlayerName,
}

/// Server → Client: "a game is starting; here are your parameters."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerHandshake {
    /// The symbol this client places on the board.
    pub symbol: u8,
    /// Board width in cells.
    pub width: u8,
    /// Board height in cells.
    pub height: u8,
}

/// Server → Client: result of a handshake attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Result / ack code. The client does not interpret it.
    pub code: u8,
}

/// Either direction: "I'm still here." Carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Keepalive;

/// Either direction: cell `(x, y)` now holds `field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    pub x: u32,
    pub y: u32,
    /// The symbol placed in the cell.
    pub field: u8,
}

/// Server → Client: the game ended with `result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEnd {
    pub result: u8,
}

// ---------------------------------------------------------------------------
// Packet
// ---------------------------------------------------------------------------

/// Any packet that can travel on the wire.
///
/// Decoders return this enum rather than a bare struct so the receiver
/// can `match` on what actually arrived. The variant *is* the dispatch
/// key: [`Packet::kind`] returns the matching [`PacketKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packet {
    ClientHandshake(ClientHandshake),
    ServerHandshake(ServerHandshake),
    Feedback(Feedback),
    Keepalive(Keepalive),
    FieldSet(FieldSet),
    GameEnd(GameEnd),
}

impl Packet {
    /// The discriminator for this packet.
    pub fn kind(&self) -> PacketKind {
        match self {
            Self::ClientHandshake(_) => PacketKind::ClientHandshake,
            Self::ServerHandshake(_) => PacketKind::ServerHandshake,
            Self::Feedback(_) => PacketKind::Feedback,
            Self::Keepalive(_) => PacketKind::Keepalive,
            Self::FieldSet(_) => PacketKind::FieldSet,
            Self::GameEnd(_) => PacketKind::GameEnd,
        }
    }
}

macro_rules! impl_from_body {
    ($($body:ident),* $(,)?) => {
        $(
            impl From<$body> for Packet {
                fn from(body: $body) -> Self {
                    Packet::$body(body)
                }
            }
        )*
    };
}

impl_from_body!(
    ClientHandshake,
    ServerHandshake,
    Feedback,
    Keepalive,
    FieldSet,
    GameEnd,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_unique() {
        for a in PacketKind::ALL {
            for b in PacketKind::ALL {
                if a != b {
                    assert_ne!(a.tag(), b.tag(), "{a} and {b} share a tag");
                }
            }
        }
    }

    #[test]
    fn test_from_tag_inverts_tag() {
        for kind in PacketKind::ALL {
            assert_eq!(PacketKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(PacketKind::from_tag(0x00), None);
        assert_eq!(PacketKind::from_tag(0xFF), None);
    }

    #[test]
    fn test_frame_lengths() {
        assert_eq!(PacketKind::ClientHandshake.frame_len(), 37);
        assert_eq!(PacketKind::ServerHandshake.frame_len(), 4);
        assert_eq!(PacketKind::Feedback.frame_len(), 2);
        assert_eq!(PacketKind::Keepalive.frame_len(), 1);
        assert_eq!(PacketKind::FieldSet.frame_len(), 10);
        assert_eq!(PacketKind::GameEnd.frame_len(), 2);
    }

    #[test]
    fn test_packet_kind_matches_variant() {
        let packet: Packet = FieldSet { x: 1, y: 2, field: 1 }.into();
        assert_eq!(packet.kind(), PacketKind::FieldSet);
        assert_eq!(Packet::from(Keepalive).kind(), PacketKind::Keepalive);
    }

    #[test]
    fn test_player_name_pads_with_nul() {
        let name = PlayerName::new("alice").unwrap();
        assert_eq!(&name.as_bytes()[..5], b"alice");
        assert!(name.as_bytes()[5..].iter().all(|&b| b == 0));
        assert_eq!(name.to_string(), "alice");
    }

    #[test]
    fn test_player_name_accepts_exact_width() {
        let long = "x".repeat(NAME_LEN);
        let name = PlayerName::new(&long).unwrap();
        assert_eq!(name.to_string_lossy(), long);
    }

    #[test]
    fn test_player_name_rejects_too_long() {
        let err = PlayerName::new(&"x".repeat(NAME_LEN + 1)).unwrap_err();
        assert!(err.to_string().contains("at most 32"));
    }

    #[test]
    fn test_player_name_rejects_nul() {
        assert!(PlayerName::new("a\0b").is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(PacketKind::ServerHandshake.to_string(), "ServerHandshake");
    }
}
