//! Incoming message envelope and datagram metadata.

use std::net::{IpAddr, SocketAddr};

use serde::Serialize;

use crate::codec::Payload;

/// Metadata describing a single received datagram.
///
/// Serializes with camelCase field names (`receiverAddress`, `receiverPort`,
/// `senderAddress`, `senderPort`, `messageSize`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageInfo {
    /// Local address the receiving socket is bound to.
    pub receiver_address: IpAddr,
    /// Local port the receiving socket is bound to.
    pub receiver_port: u16,
    /// Remote address the datagram was sent from.
    pub sender_address: IpAddr,
    /// Remote port the datagram was sent from.
    pub sender_port: u16,
    /// Payload size in bytes as read from the socket.
    pub message_size: usize,
}

impl MessageInfo {
    /// Build the metadata for a datagram of `message_size` bytes that
    /// arrived on `local` from `peer`.
    pub fn new(local: SocketAddr, peer: SocketAddr, message_size: usize) -> Self {
        Self {
            receiver_address: local.ip(),
            receiver_port: local.port(),
            sender_address: peer.ip(),
            sender_port: peer.port(),
            message_size,
        }
    }

    /// The remote endpoint the datagram was sent from.
    pub fn sender(&self) -> SocketAddr {
        SocketAddr::new(self.sender_address, self.sender_port)
    }

    /// The local endpoint the datagram arrived on.
    pub fn receiver(&self) -> SocketAddr {
        SocketAddr::new(self.receiver_address, self.receiver_port)
    }
}

/// An incoming message: the decoded payload plus datagram metadata.
#[derive(Debug, Clone)]
pub struct Message {
    /// The decoded payload.
    pub payload: Payload,
    /// Where the datagram came from and where it arrived.
    pub info: MessageInfo,
}
