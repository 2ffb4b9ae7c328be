//! Error types for the session layer.

use gridwire_protocol::ProtocolError;
use gridwire_transport::TransportError;

use crate::ClientState;

/// Errors returned by [`Client`](crate::Client) operations.
///
/// Losing the connection is *also* reported through the `disconnected`
/// event; the error returned here only tells the caller that the
/// operation did not complete.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The operation needs a live connection and there is none.
    #[error("not connected")]
    NotConnected,

    /// The operation is not valid in the session's current state.
    /// For example, signing in twice, or connecting while connected.
    #[error("cannot {op} while {state}")]
    InvalidState {
        op: &'static str,
        state: ClientState,
    },

    /// A packet could not be built (e.g. the name does not fit).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The transport failed. The session is `Disconnected` afterwards.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The client task behind a [`ClientHandle`](crate::ClientHandle)
    /// is gone.
    #[error("client task is unavailable")]
    Unavailable,
}
