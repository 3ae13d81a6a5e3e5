//! Observable UDP receiver.
//!
//! A [`Receiver`] owns one bound socket and turns its datagrams into a
//! stream of decoded [`Message`](crate::Message)s, delivered to an optional
//! bind-time callback and to signal subscribers. Shutdown via
//! [`Receiver::finish`] releases the port before resolving.
//!
//! # Example
//!
//! ```ignore
//! use minigram::{Receiver, ReceiverConfig};
//!
//! let receiver = Receiver::bind_with(ReceiverConfig::any_address(2020), |msg| {
//!     println!("got: {}", msg.payload);
//! })
//! .await?;
//!
//! receiver.finish().await;
//! ```

mod config;
mod socket;
mod state;

pub use config::ReceiverConfig;
pub use socket::Receiver;
pub use state::ReceiverState;
