//! Session change notifications.

use buckery::session::Role;
use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::debug;

/// Published whenever the session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Someone signed in.
    SignedIn {
        /// Username
        username: String,

        /// Account role
        role: Role,
    },

    /// The visitor signed out.
    SignedOut,

    /// The backend rejected the token.
    Expired,
}

/// Publish/subscribe channel for [`SessionEvent`]s.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: Sender<SessionEvent>,
}

impl SessionEvents {
    const CAPACITY: usize = 16;

    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(Self::CAPACITY);

        Self { sender }
    }

    /// Send an event to every current subscriber.
    pub fn publish(&self, event: SessionEvent) {
        debug!(?event, "session event");

        if self.sender.send(event).is_err() {
            debug!("no session subscribers");
        }
    }

    /// Receive events published from now on.
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        self.sender.subscribe()
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}
