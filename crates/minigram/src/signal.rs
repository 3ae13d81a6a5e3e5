//! Signal/slot delivery for message and error streams.
//!
//! A [`Signal<Args>`] holds any number of connected slots (callbacks) and
//! invokes each of them when emitted. The receiver exposes its message and
//! error streams as signals so multiple subscribers can observe the same
//! socket without coordinating with each other.
//!
//! Slots are invoked directly on the emitting task. Emission snapshots the
//! connected slots before calling them, so a slot may connect or disconnect
//! other slots (or itself) without deadlocking.
//!
//! # Example
//!
//! ```
//! use minigram::Signal;
//!
//! let level_changed = Signal::<i32>::new();
//!
//! let id = level_changed.connect(|&level| {
//!     println!("level is now {level}");
//! });
//!
//! level_changed.emit(7);
//! level_changed.disconnect(id);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`]. The ID remains valid until the connection is
    /// explicitly disconnected or the signal is dropped.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    /// The slot function to invoke.
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
}

/// A signal that invokes every connected slot when emitted.
///
/// `Signal<Args>` is `Send + Sync`; slots may be connected, disconnected
/// and emitted from any thread. Slots run on whichever thread calls
/// [`emit`](Self::emit).
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a [`ConnectionId`] that can be used to disconnect the slot
    /// later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Connection {
            slot: Arc::new(slot),
        })
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false`
    /// otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Emit the signal, invoking all connected slots with `args`.
    ///
    /// Slots connected after the snapshot is taken see later emissions only.
    pub fn emit(&self, args: Args) {
        let slots: Vec<_> = self
            .connections
            .lock()
            .iter()
            .map(|(_, conn)| conn.slot.clone())
            .collect();

        tracing::trace!(
            target: "minigram::signal",
            connection_count = slots.len(),
            "emitting signal"
        );

        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connection_count", &self.connection_count())
            .finish()
    }
}
