//! State enumeration for the receiver lifecycle.

/// State of a receiver socket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReceiverState {
    /// No socket has been bound.
    #[default]
    Unbound,
    /// The socket is binding to an address.
    Binding,
    /// The socket is bound and delivering datagrams.
    Listening,
    /// Shutdown has been requested.
    Closing,
    /// The socket is closed and the port released.
    Closed,
}

impl std::fmt::Display for ReceiverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReceiverState::Unbound => write!(f, "Unbound"),
            ReceiverState::Binding => write!(f, "Binding"),
            ReceiverState::Listening => write!(f, "Listening"),
            ReceiverState::Closing => write!(f, "Closing"),
            ReceiverState::Closed => write!(f, "Closed"),
        }
    }
}
