//! Events the client surfaces to the host application.

use gridwire_transport::Notifier;

/// Payload of `game_started`: the parameters the server assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStarted {
    pub symbol: u8,
    pub width: u8,
    pub height: u8,
}

/// Payload of `field_set`: cell `(x, y)` now holds `field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldUpdate {
    pub field: u8,
    pub x: u32,
    pub y: u32,
}

/// Payload of `game_ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameEnded {
    pub result: u8,
}

/// Payload of `connect_failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectFailed {
    /// The `host:port` that was attempted.
    pub addr: String,
    /// Human-readable cause.
    pub reason: String,
}

/// Every notification a [`Client`](crate::Client) fires.
///
/// Subscribe before driving the client:
///
/// ```rust
/// use gridwire_session::{Client, ClientConfig};
///
/// let mut client = Client::new(ClientConfig::default());
/// client.events().game_ended.subscribe(|end| {
///     println!("game ended; result: {}", end.result);
/// });
/// ```
///
/// Subscribers run inside the client's own handlers, so they cannot call
/// back into the client. To react to an event with a command, send it
/// through a [`ClientHandle`](crate::ClientHandle).
#[derive(Debug, Default)]
pub struct ClientEvents {
    /// The socket is open.
    pub connected: Notifier<()>,
    /// Resolve or connect failed; the session stays `Disconnected`.
    pub connect_failed: Notifier<ConnectFailed>,
    /// The server acknowledged the handshake.
    pub logged_in: Notifier<()>,
    /// A game started.
    pub game_started: Notifier<GameStarted>,
    /// A cell was set, by either player.
    pub field_set: Notifier<FieldUpdate>,
    /// The game ended.
    pub game_ended: Notifier<GameEnded>,
    /// The connection was lost. Fires at most once per connection.
    pub disconnected: Notifier<()>,
}
