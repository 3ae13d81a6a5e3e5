//! Minimal UDP messaging.
//!
//! minigram sends and receives small UDP datagrams with automatic payload
//! interpretation: JSON where it parses, UTF-8 text where it decodes, raw
//! bytes otherwise.
//!
//! - **Sending**: [`send`] transmits one datagram over a transient socket;
//!   [`broadcast`] targets the limited broadcast address. Both are
//!   fire-and-forget.
//! - **Receiving**: [`listen`] (or [`Receiver::bind`]) binds a socket and
//!   delivers every datagram as a decoded [`Message`] to a callback and to
//!   signal subscribers, until [`Receiver::finish`] releases the port.
//!
//! # Example
//!
//! ```ignore
//! use minigram::{ANY_ADDRESS, DEFAULT_PORT, listen};
//!
//! let receiver = listen(
//!     |msg| println!("{} from {}", msg.payload, msg.info.sender()),
//!     DEFAULT_PORT,
//!     ANY_ADDRESS,
//! )
//! .await?;
//!
//! minigram::broadcast("hello", DEFAULT_PORT).await?;
//!
//! // Port 2020 is free again once this resolves
//! receiver.finish().await;
//! ```

mod codec;
mod error;
mod message;
pub mod receiver;
mod sender;
pub mod signal;

pub use codec::Payload;
pub use error::{Error, Result};
pub use message::{Message, MessageInfo};
pub use receiver::{Receiver, ReceiverConfig, ReceiverState};
pub use sender::{broadcast, send};
pub use signal::{ConnectionId, Signal};

/// Default port for sending and receiving.
pub const DEFAULT_PORT: u16 = 2020;

/// Bind address covering all local interfaces.
pub const ANY_ADDRESS: &str = "0.0.0.0";

/// The limited broadcast address.
pub const BROADCAST_ADDRESS: &str = "255.255.255.255";

/// Bind a receiver and invoke `on_message` for every incoming datagram.
///
/// Convenience wrapper over [`Receiver::bind_with`]. Fails with
/// [`Error::AddrInUse`] when `address:port` is already bound; further
/// subscribers and the shutdown path hang off the returned [`Receiver`].
pub async fn listen<F>(on_message: F, port: u16, address: impl Into<String>) -> Result<Receiver>
where
    F: Fn(&Message) + Send + Sync + 'static,
{
    Receiver::bind_with(ReceiverConfig::new(address, port), on_message).await
}
