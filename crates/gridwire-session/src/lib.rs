//! Client session for Gridwire.
//!
//! This crate is the state machine that sequences a game client's life:
//!
//! 1. **Connect**: resolve the server and open a socket
//! 2. **Sign in**: send the handshake, wait for `Feedback`
//! 3. **Listen**: answer keepalives, surface game events
//! 4. **Disconnect**: reported once, from whichever side failed first
//!
//! # How it fits in the stack
//!
//! ```text
//! Host application  ← subscribes to ClientEvents, sends Commands
//!     ↕
//! Session Layer (this crate)  ← Client state machine
//!     ↕
//! Transport Layer (below)  ← AsyncReader / AsyncWriter / Notifier
//! ```
//!
//! Everything runs on whichever task drives the [`Client`]. Handlers
//! never overlap, so session state needs no synchronization.
//!
//! There is no timeout: a silent server leaves the listen read pending
//! until the socket errors or the host closes the client.

mod client;
mod config;
mod error;
mod events;
mod handle;

pub use client::{Client, LISTEN_KINDS, Next};
pub use config::{ClientConfig, ClientState};
pub use error::ClientError;
pub use events::{ClientEvents, ConnectFailed, FieldUpdate, GameEnded, GameStarted};
pub use handle::{ClientHandle, Command};
