//! Receiver socket with dual callback/signal delivery.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::net::UdpSocket;
use tokio::sync::{oneshot, watch};

use super::config::ReceiverConfig;
use super::state::ReceiverState;
use crate::codec::Payload;
use crate::error::{Error, Result};
use crate::message::{Message, MessageInfo};
use crate::signal::{ConnectionId, Signal};

/// Callback invoked for every decoded datagram.
type MessageCallback = Arc<dyn Fn(&Message) + Send + Sync>;

/// A bound UDP socket that delivers every incoming datagram as a decoded
/// [`Message`].
///
/// Each datagram is decoded, wrapped with its [`MessageInfo`] metadata and
/// delivered twice: first to the bind-time callback (if one was given), then
/// to every slot connected to the [`message`](Self::message) signal.
///
/// # Signals
///
/// - [`message`](Self::message): Emitted for every decoded datagram
/// - [`error`](Self::error): Emitted when receiving fails on the bound socket
///
/// # Example
///
/// ```ignore
/// let receiver = Receiver::bind(ReceiverConfig::any_address(2020)).await?;
///
/// receiver.message.connect(|msg| {
///     println!("{} from {}", msg.payload, msg.info.sender());
/// });
///
/// // ... later: release the port before reusing it
/// receiver.finish().await;
/// ```
pub struct Receiver {
    config: ReceiverConfig,
    local_addr: SocketAddr,
    state_rx: watch::Receiver<ReceiverState>,
    close_tx: Mutex<Option<oneshot::Sender<()>>>,

    /// Signal emitted for every decoded datagram.
    pub message: Arc<Signal<Message>>,
    /// Signal emitted when receiving fails on the bound socket.
    pub error: Arc<Signal<Error>>,
}

impl Receiver {
    /// Bind a receiver to the configured address and port.
    ///
    /// Returns [`Error::AddrInUse`] when the pair is already bound by
    /// another socket, [`Error::Bind`] for any other bind failure. On
    /// failure no receiver exists and nothing is left bound.
    pub async fn bind(config: ReceiverConfig) -> Result<Self> {
        Self::bind_inner(config, None).await
    }

    /// Bind a receiver that invokes `on_message` for every datagram.
    ///
    /// The callback runs before the [`message`](Self::message) signal is
    /// emitted; both observe every datagram.
    pub async fn bind_with<F>(config: ReceiverConfig, on_message: F) -> Result<Self>
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        Self::bind_inner(config, Some(Arc::new(on_message))).await
    }

    async fn bind_inner(config: ReceiverConfig, callback: Option<MessageCallback>) -> Result<Self> {
        let (state_tx, state_rx) = watch::channel(ReceiverState::Unbound);

        let bind_addr = config.bind_addr();
        let _ = state_tx.send(ReceiverState::Binding);
        tracing::debug!(target: "minigram::receiver", addr = %bind_addr, "binding");

        let socket = UdpSocket::bind(bind_addr.as_str())
            .await
            .map_err(|e| Error::bind(bind_addr.as_str(), e))?;
        let local_addr = socket
            .local_addr()
            .map_err(|e| Error::bind(bind_addr.as_str(), e))?;

        let _ = state_tx.send(ReceiverState::Listening);
        tracing::info!(target: "minigram::receiver", addr = %local_addr, "listening");

        let message = Arc::new(Signal::new());
        let error = Arc::new(Signal::new());
        let (close_tx, close_rx) = oneshot::channel::<()>();

        let message_signal = message.clone();
        let error_signal = error.clone();
        let recv_buffer_size = config.recv_buffer_size;

        tokio::spawn(async move {
            let mut close_rx = close_rx;
            let mut buffer = vec![0u8; recv_buffer_size];

            loop {
                tokio::select! {
                    // Fires on finish() and when the receiver handle drops
                    _ = &mut close_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buffer) => {
                        match result {
                            Ok((len, peer)) => {
                                let msg = Message {
                                    payload: Payload::decode(&buffer[..len]),
                                    info: MessageInfo::new(local_addr, peer, len),
                                };
                                tracing::trace!(
                                    target: "minigram::receiver",
                                    from = %peer,
                                    bytes = len,
                                    "datagram received"
                                );
                                if let Some(callback) = &callback {
                                    callback(&msg);
                                }
                                message_signal.emit(msg);
                            }
                            Err(e) => {
                                tracing::warn!(
                                    target: "minigram::receiver",
                                    addr = %local_addr,
                                    error = %e,
                                    "receive error"
                                );
                                error_signal.emit(Error::recv(local_addr, e));
                            }
                        }
                    }
                }
            }

            let _ = state_tx.send(ReceiverState::Closing);
            // The port is released here; Closed must not be published before
            drop(socket);
            let _ = state_tx.send(ReceiverState::Closed);
            tracing::info!(target: "minigram::receiver", addr = %local_addr, "closed");
        });

        Ok(Self {
            config,
            local_addr,
            state_rx,
            close_tx: Mutex::new(Some(close_tx)),
            message,
            error,
        })
    }

    /// Stop listening and release the port.
    ///
    /// Resolves only after the socket is closed, so the same port can be
    /// bound again immediately. Safe to call more than once: later and
    /// concurrent calls wait for the same closure and complete without
    /// error. All message and error subscribers are disconnected once the
    /// socket is closed.
    pub async fn finish(&self) {
        let close_tx = self.close_tx.lock().take();
        if let Some(tx) = close_tx {
            tracing::debug!(target: "minigram::receiver", addr = %self.local_addr, "finishing");
            let _ = tx.send(());
        }

        // An error here means the loop task is already gone, and with it
        // the socket
        let mut state_rx = self.state_rx.clone();
        let _ = state_rx
            .wait_for(|state| *state == ReceiverState::Closed)
            .await;

        self.message.disconnect_all();
        self.error.disconnect_all();
    }

    /// Connect a slot to the [`message`](Self::message) signal.
    pub fn on_message<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.message.connect(slot)
    }

    /// Connect a slot to the [`error`](Self::error) signal.
    pub fn on_error<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.error.connect(slot)
    }

    /// Get the current receiver state.
    pub fn state(&self) -> ReceiverState {
        *self.state_rx.borrow()
    }

    /// Check if the receiver is listening.
    pub fn is_listening(&self) -> bool {
        self.state() == ReceiverState::Listening
    }

    /// The local address the socket is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The local IP address the socket is bound to.
    pub fn address(&self) -> IpAddr {
        self.local_addr.ip()
    }

    /// The local port the socket is bound to. Reflects the OS assignment
    /// when the configuration requested port 0.
    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Get the configured bind address.
    pub fn bind_addr(&self) -> String {
        self.config.bind_addr()
    }
}

impl std::fmt::Debug for Receiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Receiver")
            .field("bind_addr", &self.config.bind_addr())
            .field("local_addr", &self.local_addr)
            .field("state", &self.state())
            .finish()
    }
}
