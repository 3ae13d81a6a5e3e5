//! Configuration for the receiver socket.

use crate::{ANY_ADDRESS, DEFAULT_PORT};

/// Configuration for a receiver socket.
#[derive(Clone, Debug)]
pub struct ReceiverConfig {
    /// The address to bind to.
    pub address: String,
    /// The port to bind to. Use 0 for an OS-assigned port.
    pub port: u16,
    /// Receive buffer size in bytes. The default fits the largest possible
    /// UDP payload.
    pub recv_buffer_size: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            address: ANY_ADDRESS.into(),
            port: DEFAULT_PORT,
            recv_buffer_size: 65535,
        }
    }
}

impl ReceiverConfig {
    /// Create a configuration that binds to the specified address and port.
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            ..Default::default()
        }
    }

    /// Create a configuration that binds to any address on the specified
    /// port.
    pub fn any_address(port: u16) -> Self {
        Self::new(ANY_ADDRESS, port)
    }

    /// Set the receive buffer size.
    pub fn recv_buffer_size(mut self, size: usize) -> Self {
        self.recv_buffer_size = size;
        self
    }

    /// Get the bind address string (address:port).
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}
