//! The client session: connect → handshake → listen → disconnect.
//!
//! A [`Client`] owns one connection, split into an [`AsyncReader`] and
//! an [`AsyncWriter`]. [`Client::connect`] opens it over TCP;
//! [`Client::attach`] accepts any pair of byte streams. Every transition happens inside one of its
//! own `&mut self` methods, so there is exactly one outstanding read and
//! one outstanding write at any time, and no locking.

use gridwire_protocol::{
    ClientHandshake, FieldSet, FrameCodec, GameEnd, Keepalive, Packet,
    PacketKind, PlayerName, ServerHandshake,
};
use gridwire_transport::{AsyncReader, AsyncWriter};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    ClientConfig, ClientError, ClientEvents, ClientState, ConnectFailed,
    FieldUpdate, GameEnded, GameStarted,
};

/// Kinds the server may send once the client is logged in.
pub const LISTEN_KINDS: [PacketKind; 4] = [
    PacketKind::Keepalive,
    PacketKind::ServerHandshake,
    PacketKind::GameEnd,
    PacketKind::FieldSet,
];

/// What a packet handler asks for next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// Arm the listen read again.
    Rearm,
    /// The connection is gone; stop listening.
    Stop,
}

type BoxedRead = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWrite = Box<dyn AsyncWrite + Send + Unpin>;

/// The two halves of a live connection. Dropping it closes the socket.
struct Link {
    reader: AsyncReader<BoxedRead>,
    writer: AsyncWriter<BoxedWrite>,
}

/// A game client session.
///
/// ```rust,no_run
/// use gridwire_session::{Client, ClientConfig};
///
/// # async fn demo() -> Result<(), gridwire_session::ClientError> {
/// let mut client = Client::new(ClientConfig::default());
/// client.events().field_set.subscribe(|f| {
///     println!("[{}][{}]={}", f.x, f.y, f.field);
/// });
///
/// client.connect("127.0.0.1", "9090").await?;
/// client.sign_in(0, "alice").await?;
/// client.listen().await; // returns once disconnected
/// # Ok(())
/// # }
/// ```
pub struct Client {
    config: ClientConfig,
    state: ClientState,
    link: Option<Link>,
    name: Option<String>,
    symbol: u8,
    width: u8,
    height: u8,
    events: ClientEvents,
}

impl Client {
    /// Creates a disconnected client.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            state: ClientState::Disconnected,
            link: None,
            name: None,
            symbol: 0,
            width: 0,
            height: 0,
            events: ClientEvents::default(),
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Event notifiers, for subscribing.
    pub fn events(&mut self) -> &mut ClientEvents {
        &mut self.events
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.is_logged_in()
    }

    /// The name sent in the last handshake on this connection.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Symbol assigned by the last `ServerHandshake` (0 before any game).
    pub fn symbol(&self) -> u8 {
        self.symbol
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Resolves `host:port` and opens the connection.
    ///
    /// Fires `connected` on success. On failure the client stays
    /// `Disconnected`, fires `connect_failed`, and returns the error.
    pub async fn connect(&mut self, host: &str, port: &str) -> Result<(), ClientError> {
        if self.state != ClientState::Disconnected {
            return Err(ClientError::InvalidState {
                op: "connect",
                state: self.state,
            });
        }
        self.transition(ClientState::Connecting);

        let addr = format!("{host}:{port}");
        let stream = match gridwire_transport::connect(host, port).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(%addr, error = %e, "connect failed");
                self.transition(ClientState::Disconnected);
                self.events.connect_failed.fire(&ConnectFailed {
                    addr,
                    reason: e.to_string(),
                });
                return Err(e.into());
            }
        };
        if let Err(e) = stream.set_nodelay(self.config.nodelay) {
            tracing::debug!(error = %e, "could not set TCP_NODELAY");
        }

        let (read_half, write_half) = stream.into_split();
        tracing::info!(%addr, "connected");
        self.install(Box::new(read_half), Box::new(write_half));
        Ok(())
    }

    /// Adopts an already-open connection, given as its two directions.
    ///
    /// Behaves like a successful [`connect`](Self::connect): the client
    /// becomes `Connected` and fires `connected`.
    pub fn attach<R, W>(&mut self, reader: R, writer: W) -> Result<(), ClientError>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        if self.state != ClientState::Disconnected {
            return Err(ClientError::InvalidState {
                op: "attach",
                state: self.state,
            });
        }
        self.transition(ClientState::Connecting);
        tracing::debug!("attached to an open stream");
        self.install(Box::new(reader), Box::new(writer));
        Ok(())
    }

    fn install(&mut self, reader: BoxedRead, writer: BoxedWrite) {
        self.link = Some(Link {
            reader: AsyncReader::with_capacity(reader, FrameCodec, self.config.read_capacity),
            writer: AsyncWriter::new(writer, FrameCodec),
        });
        // A new connection starts from scratch.
        self.name = None;
        self.symbol = 0;
        self.width = 0;
        self.height = 0;

        self.transition(ClientState::Connected);
        self.events.connected.fire(&());
    }

    /// Sends the handshake and waits for the server's `Feedback`.
    ///
    /// Fires `logged_in` once exactly one `Feedback` has arrived. The
    /// feedback code is logged but not interpreted. After this returns
    /// `Ok`, drive the listen loop with [`listen`](Self::listen) or
    /// [`listen_step`](Self::listen_step).
    pub async fn sign_in(&mut self, mode: u32, name: &str) -> Result<(), ClientError> {
        if self.state != ClientState::Connected {
            return Err(if self.link.is_none() {
                ClientError::NotConnected
            } else {
                ClientError::InvalidState {
                    op: "sign in",
                    state: self.state,
                }
            });
        }

        let handshake = ClientHandshake {
            mode,
            name: PlayerName::new(name)?,
        };
        self.name = Some(name.to_owned());
        self.send(&handshake.into()).await?;
        self.transition(ClientState::AwaitingFeedback);

        let feedback = self.receive(&[PacketKind::Feedback], true).await?;
        if let Packet::Feedback(f) = feedback {
            tracing::debug!(code = f.code, "feedback received");
        }

        self.transition(ClientState::LoggedIn);
        tracing::info!(name, "logged in");
        self.events.logged_in.fire(&());
        Ok(())
    }

    /// Claims cell `(x, y)` with this client's symbol.
    ///
    /// No state check beyond having a connection: a call before the
    /// handshake completes still sends (with symbol 0). Without a
    /// connection the call is rejected with `ClientError::NotConnected`
    /// and nothing is fired.
    pub async fn set_field(&mut self, x: u32, y: u32) -> Result<(), ClientError> {
        if self.link.is_none() {
            tracing::debug!(x, y, "set_field rejected: not connected");
            return Err(ClientError::NotConnected);
        }
        let packet = FieldSet {
            x,
            y,
            field: self.symbol,
        };
        self.send(&packet.into()).await
    }

    /// Closes the connection from our side. Fires `disconnected` if a
    /// connection was open.
    pub async fn close(&mut self) {
        if let Some(link) = self.link.as_mut() {
            if let Err(e) = link.writer.shutdown().await {
                tracing::debug!(error = %e, "shutdown failed");
            }
        }
        self.handle_disconnect();
    }

    // -----------------------------------------------------------------------
    // Listen loop
    // -----------------------------------------------------------------------

    /// Arms one listen read and dispatches whatever arrives.
    ///
    /// Returns `Next::Rearm` if the caller should call again,
    /// `Next::Stop` once the connection is gone (or was never logged in).
    pub async fn listen_step(&mut self) -> Next {
        match self.recv_packet().await {
            Ok(packet) => self.dispatch(packet).await,
            Err(e) => {
                tracing::debug!(error = %e, "listen stopped");
                Next::Stop
            }
        }
    }

    /// Runs the listen loop until the connection is lost.
    pub async fn listen(&mut self) {
        while self.listen_step().await == Next::Rearm {}
    }

    /// The read half of a listen step. Cancel-safe.
    pub(crate) async fn recv_packet(&mut self) -> Result<Packet, ClientError> {
        if !self.state.is_logged_in() {
            return Err(ClientError::InvalidState {
                op: "listen",
                state: self.state,
            });
        }
        self.receive(&LISTEN_KINDS, false).await
    }

    /// The handler half of a listen step. Must run to completion.
    pub(crate) async fn dispatch(&mut self, packet: Packet) -> Next {
        tracing::debug!(kind = %packet.kind(), "dispatch");
        match packet {
            Packet::Keepalive(p) => self.on_keepalive(p).await,
            Packet::ServerHandshake(p) => self.on_server_handshake(p),
            Packet::GameEnd(p) => self.on_game_end(p),
            Packet::FieldSet(p) => self.on_field_set(p),
            // Same policy as the reader: a kind outside LISTEN_KINDS is a
            // protocol violation.
            other => {
                tracing::warn!(kind = %other.kind(), "no handler for packet, dropping connection");
                self.handle_disconnect();
                Next::Stop
            }
        }
    }

    async fn on_keepalive(&mut self, packet: Keepalive) -> Next {
        match self.send(&packet.into()).await {
            Ok(()) => Next::Rearm,
            Err(_) => Next::Stop,
        }
    }

    fn on_server_handshake(&mut self, packet: ServerHandshake) -> Next {
        self.symbol = packet.symbol;
        self.width = packet.width;
        self.height = packet.height;
        tracing::info!(
            symbol = packet.symbol,
            width = packet.width,
            height = packet.height,
            "game started"
        );
        self.events.game_started.fire(&GameStarted {
            symbol: packet.symbol,
            width: packet.width,
            height: packet.height,
        });
        Next::Rearm
    }

    fn on_game_end(&mut self, packet: GameEnd) -> Next {
        tracing::info!(result = packet.result, "game ended");
        self.events.game_ended.fire(&GameEnded {
            result: packet.result,
        });
        Next::Rearm
    }

    fn on_field_set(&mut self, packet: FieldSet) -> Next {
        self.events.field_set.fire(&FieldUpdate {
            field: packet.field,
            x: packet.x,
            y: packet.y,
        });
        Next::Rearm
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    async fn send(&mut self, packet: &Packet) -> Result<(), ClientError> {
        let Some(link) = self.link.as_mut() else {
            return Err(ClientError::NotConnected);
        };
        match link.writer.write(packet).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.handle_disconnect();
                Err(e.into())
            }
        }
    }

    async fn receive(
        &mut self,
        kinds: &[PacketKind],
        skip_others: bool,
    ) -> Result<Packet, ClientError> {
        let Some(link) = self.link.as_mut() else {
            return Err(ClientError::NotConnected);
        };
        let result = match kinds {
            [kind] if skip_others => link.reader.read_one(*kind).await,
            _ => link.reader.read_any(kinds).await,
        };
        result.map_err(|e| {
            self.handle_disconnect();
            ClientError::from(e)
        })
    }

    /// Drops the link and fires `disconnected`. Only the first call per
    /// connection does anything: later ones find no link.
    fn handle_disconnect(&mut self) {
        if self.link.take().is_none() {
            return;
        }
        self.transition(ClientState::Disconnected);
        tracing::info!(name = ?self.name, "disconnected");
        self.events.disconnected.fire(&());
    }

    fn transition(&mut self, next: ClientState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} → {}",
            self.state,
            next
        );
        tracing::trace!(from = %self.state, to = %next, "state");
        self.state = next;
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state)
            .field("name", &self.name)
            .field("symbol", &self.symbol)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwire_protocol::Feedback;
    use std::sync::{Arc, Mutex};
    use tokio::io::duplex;

    fn attached() -> (Client, Arc<Mutex<u32>>) {
        let (client_r, _server_w) = duplex(64);
        let (client_w, _server_r) = duplex(64);
        let mut client = Client::default();
        let fired = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&fired);
        client
            .events()
            .disconnected
            .subscribe(move |_| *counter.lock().unwrap() += 1);
        client.attach(client_r, client_w).unwrap();
        (client, fired)
    }

    #[tokio::test]
    async fn test_attach_connects_once() {
        let (mut client, _) = attached();
        assert_eq!(client.state(), ClientState::Connected);

        let (r, w) = duplex(8);
        let err = client.attach(r, w).unwrap_err();
        assert!(matches!(err, ClientError::InvalidState { op: "attach", .. }));
    }

    #[tokio::test]
    async fn test_dispatch_of_unlistened_kind_disconnects() {
        let (mut client, fired) = attached();

        let next = client.dispatch(Feedback { code: 0 }.into()).await;
        assert_eq!(next, Next::Stop);
        assert_eq!(client.state(), ClientState::Disconnected);
        assert_eq!(*fired.lock().unwrap(), 1);

        client.close().await;
        assert_eq!(*fired.lock().unwrap(), 1);
    }
}
