//! # Gridwire
//!
//! Async protocol client for two-player grid games.
//!
//! Gridwire connects to a game server, signs in, answers keepalives,
//! and turns the server's packets into events for the host application.
//! The host subscribes to [`ClientEvents`](prelude::ClientEvents) and
//! drives the client either directly or through a
//! [`ClientHandle`](prelude::ClientHandle).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridwire::prelude::*;
//!
//! # async fn demo() -> Result<(), GridwireError> {
//! let mut client = Client::new(ClientConfig::default());
//! client.events().game_started.subscribe(|g| {
//!     println!("symbol {} on a {}x{} board", g.symbol, g.width, g.height);
//! });
//!
//! let (handle, task) = client.spawn();
//! handle.connect("127.0.0.1", "9090", "alice").await?;
//! handle.set_field(1, 1).await?;
//! # drop(handle);
//! # let _ = task.await;
//! # Ok(())
//! # }
//! ```

mod error;
mod logging;

pub use error::GridwireError;
pub use logging::init_logging;

pub use gridwire_protocol as protocol;
pub use gridwire_session as session;
pub use gridwire_transport as transport;

/// The types most host applications need.
pub mod prelude {
    pub use crate::{GridwireError, init_logging};
    pub use gridwire_protocol::{Packet, PacketKind};
    pub use gridwire_session::{
        Client, ClientConfig, ClientError, ClientEvents, ClientHandle,
        ClientState, Command, ConnectFailed, FieldUpdate, GameEnded,
        GameStarted, Next,
    };
    pub use gridwire_transport::Notifier;
}
