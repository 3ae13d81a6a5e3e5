//! One-shot datagram transmission.

use std::net::Ipv4Addr;

use tokio::net::UdpSocket;

use crate::BROADCAST_ADDRESS;
use crate::codec::Payload;
use crate::error::{Error, Result};

/// Send a single datagram to `address:port`.
///
/// A fresh ephemeral socket is opened for the transmission and released
/// when the call returns, on success and failure alike. Broadcast is
/// enabled automatically when `address` is the limited broadcast address
/// `255.255.255.255`. The address may also be a host name; resolution uses
/// the first resolved endpoint.
///
/// Delivery is fire-and-forget: a successful return means the datagram was
/// handed to the OS, not that anyone received it.
///
/// # Example
///
/// ```ignore
/// use serde_json::json;
///
/// minigram::send("ping", 2020, "127.0.0.1").await?;
/// minigram::send(json!({"kind": "hello"}), 2020, "192.168.1.20").await?;
/// ```
pub async fn send(payload: impl Into<Payload>, port: u16, address: &str) -> Result<()> {
    let bytes = payload.into().into_bytes()?;

    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(Error::send_socket)?;

    if address
        .parse::<Ipv4Addr>()
        .is_ok_and(|ip| ip.is_broadcast())
    {
        socket.set_broadcast(true).map_err(Error::send_socket)?;
    }

    let target = format!("{address}:{port}");
    let sent = socket
        .send_to(&bytes, target.as_str())
        .await
        .map_err(|e| Error::send(target.as_str(), e))?;

    tracing::debug!(target: "minigram::sender", to = %target, bytes = sent, "datagram sent");
    Ok(())
}

/// Send a single datagram to the limited broadcast address.
///
/// Equivalent to [`send`] with `255.255.255.255` as the destination.
/// Succeeds whether or not anyone is listening.
pub async fn broadcast(payload: impl Into<Payload>, port: u16) -> Result<()> {
    send(payload, port, BROADCAST_ADDRESS).await
}
