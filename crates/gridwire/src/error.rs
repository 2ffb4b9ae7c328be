//! Unified error type for the Gridwire client.

use gridwire_protocol::ProtocolError;
use gridwire_session::ClientError;
use gridwire_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `gridwire` facade, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant lets `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum GridwireError {
    /// A transport-level error (resolve, connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (unknown tag, unexpected kind, bad name).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (wrong state, not connected).
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The logging subscriber could not be installed.
    #[error("logging init failed: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let gridwire_err: GridwireError = err.into();
        assert!(matches!(gridwire_err, GridwireError::Transport(_)));
        assert!(gridwire_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::UnknownTag(0x42);
        let gridwire_err: GridwireError = err.into();
        assert!(matches!(gridwire_err, GridwireError::Protocol(_)));
        assert!(gridwire_err.to_string().contains("0x42"));
    }

    #[test]
    fn test_from_client_error() {
        let err = ClientError::NotConnected;
        let gridwire_err: GridwireError = err.into();
        assert!(matches!(gridwire_err, GridwireError::Client(_)));
        assert_eq!(gridwire_err.to_string(), "not connected");
    }
}
