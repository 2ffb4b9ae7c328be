//! Client configuration and the session state machine.

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`Client`](crate::Client).
///
/// Sensible defaults are provided; override only what you need:
///
/// ```rust
/// use gridwire_session::ClientConfig;
///
/// let config = ClientConfig {
///     nodelay: false,
///     ..ClientConfig::default()
/// };
/// assert_eq!(config.mode, 0);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Game mode sent in the handshake by [`ClientHandle::connect`].
    ///
    /// [`ClientHandle::connect`]: crate::ClientHandle::connect
    pub mode: u32,

    /// Disable Nagle's algorithm on the socket. Frames are tiny and
    /// latency-sensitive, so this defaults to `true`.
    pub nodelay: bool,

    /// Initial capacity of the reader's receive buffer, in bytes.
    pub read_capacity: usize,

    /// Depth of the command queue in front of a spawned client task.
    pub command_queue: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            mode: 0,
            nodelay: true,
            read_capacity: 64,
            command_queue: 32,
        }
    }
}

// ---------------------------------------------------------------------------
// ClientState
// ---------------------------------------------------------------------------

/// Where the session is in its lifecycle.
///
/// ```text
///  Disconnected ──connect──→ Connecting ──ok──→ Connected
///       ↑   ↑                    │                  │ sign_in
///       │   └──────failed────────┘                  ↓
///       │                                    AwaitingFeedback
///       │                                           │ Feedback
///       │                                           ↓
///       └────────────(any I/O failure)────────── LoggedIn
/// ```
///
/// `Disconnected` is reachable from every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    AwaitingFeedback,
    LoggedIn,
}

impl ClientState {
    /// Returns `true` if a socket is open.
    pub fn is_connected(&self) -> bool {
        matches!(
            self,
            Self::Connected | Self::AwaitingFeedback | Self::LoggedIn
        )
    }

    /// Returns `true` once the server has acknowledged the handshake.
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn)
    }

    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (_, Self::Disconnected) => true,
            (Self::Disconnected, Self::Connecting) => true,
            (Self::Connecting, Self::Connected) => true,
            (Self::Connected, Self::AwaitingFeedback) => true,
            (Self::AwaitingFeedback, Self::LoggedIn) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for ClientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::AwaitingFeedback => write!(f, "AwaitingFeedback"),
            Self::LoggedIn => write!(f, "LoggedIn"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            ClientState::Disconnected,
            ClientState::Connecting,
            ClientState::Connected,
            ClientState::AwaitingFeedback,
            ClientState::LoggedIn,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} → {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_disconnected_reachable_from_everywhere() {
        for state in [
            ClientState::Connecting,
            ClientState::Connected,
            ClientState::AwaitingFeedback,
            ClientState::LoggedIn,
        ] {
            assert!(state.can_transition_to(ClientState::Disconnected));
        }
    }

    #[test]
    fn test_no_skipping_the_handshake() {
        assert!(!ClientState::Connected.can_transition_to(ClientState::LoggedIn));
        assert!(!ClientState::Disconnected.can_transition_to(ClientState::Connected));
        assert!(!ClientState::LoggedIn.can_transition_to(ClientState::Connected));
    }

    #[test]
    fn test_connectivity_flags() {
        assert!(!ClientState::Disconnected.is_connected());
        assert!(!ClientState::Connecting.is_connected());
        assert!(ClientState::Connected.is_connected());
        assert!(ClientState::AwaitingFeedback.is_connected());
        assert!(ClientState::LoggedIn.is_connected());

        assert!(ClientState::LoggedIn.is_logged_in());
        assert!(!ClientState::AwaitingFeedback.is_logged_in());
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.mode, 0);
        assert!(config.nodelay);
        assert_eq!(config.read_capacity, 64);
        assert_eq!(config.command_queue, 32);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ClientState::AwaitingFeedback.to_string(), "AwaitingFeedback");
    }
}
