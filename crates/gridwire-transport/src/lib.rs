//! Single-socket transport for Gridwire.
//!
//! Provides the I/O plumbing the client session is built on:
//!
//! - [`AsyncReader`]: arms one receive at a time and resolves the
//!   arriving bytes to exactly one expected packet kind.
//! - [`AsyncWriter`]: encodes one packet at a time and writes it whole.
//! - [`Notifier`]: the multicast primitive both use to report a lost
//!   connection, at most once each.
//! - [`connect`]: resolve + TCP connect.
//!
//! Reader and writer are generic over `AsyncRead`/`AsyncWrite`, so the
//! two halves of a `TcpStream` (or an in-memory pipe) plug straight in.
//! Every operation takes `&mut self`: a second outstanding read or write
//! on the same half does not compile.

mod error;
mod notifier;
mod reader;
mod tcp;
mod writer;

pub use error::TransportError;
pub use notifier::Notifier;
pub use reader::AsyncReader;
pub use tcp::connect;
pub use writer::AsyncWriter;
