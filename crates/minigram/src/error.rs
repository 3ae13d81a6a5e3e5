//! Error types for UDP messaging operations.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

/// Result type alias for messaging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while sending or receiving datagrams.
///
/// The enum is `Clone` so a single failure can fan out to every connected
/// error subscriber; underlying sources are shared behind [`Arc`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The requested address/port pair is already bound by another socket.
    #[error("address {addr} is already in use")]
    AddrInUse {
        addr: String,
        #[source]
        source: Arc<io::Error>,
    },

    /// Binding the listening socket failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: Arc<io::Error>,
    },

    /// Opening or configuring the transient send socket failed.
    #[error("failed to open send socket: {source}")]
    SendSocket {
        #[source]
        source: Arc<io::Error>,
    },

    /// Transmitting a datagram failed.
    #[error("failed to send to {addr}: {source}")]
    Send {
        addr: String,
        #[source]
        source: Arc<io::Error>,
    },

    /// Receiving on a bound socket failed.
    #[error("receive error on {addr}: {source}")]
    Recv {
        addr: SocketAddr,
        #[source]
        source: Arc<io::Error>,
    },

    /// Serializing an outgoing payload to JSON failed.
    #[error("failed to encode payload: {source}")]
    Encode {
        #[source]
        source: Arc<serde_json::Error>,
    },
}

impl Error {
    /// Classify a bind failure. An occupied address/port pair becomes
    /// [`Error::AddrInUse`], everything else [`Error::Bind`].
    pub fn bind(addr: impl Into<String>, source: io::Error) -> Self {
        let addr = addr.into();
        if source.kind() == io::ErrorKind::AddrInUse {
            Self::AddrInUse {
                addr,
                source: Arc::new(source),
            }
        } else {
            Self::Bind {
                addr,
                source: Arc::new(source),
            }
        }
    }

    /// Create a send socket setup error.
    pub fn send_socket(source: io::Error) -> Self {
        Self::SendSocket {
            source: Arc::new(source),
        }
    }

    /// Create a transmit error.
    pub fn send(addr: impl Into<String>, source: io::Error) -> Self {
        Self::Send {
            addr: addr.into(),
            source: Arc::new(source),
        }
    }

    /// Create a receive error.
    pub fn recv(addr: SocketAddr, source: io::Error) -> Self {
        Self::Recv {
            addr,
            source: Arc::new(source),
        }
    }

    /// Create a payload encoding error.
    pub fn encode(source: serde_json::Error) -> Self {
        Self::Encode {
            source: Arc::new(source),
        }
    }

    /// Whether this error is a bind conflict on an occupied address/port.
    pub fn is_addr_in_use(&self) -> bool {
        matches!(self, Self::AddrInUse { .. })
    }
}
