use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::{Receiver, Sender, unbounded};
use serde::Serialize;

use crate::status::PlaybackStatus;

/// Identifier of one playback session (one engine instance).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(pub u64);

impl SessionId {
    pub fn next(self) -> SessionId {
        SessionId(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Notifications sent to the view layer so it can re-render.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    SessionOpened {
        session: SessionId,
        url: String,
    },
    SessionClosed {
        session: SessionId,
    },
    StatusChanged {
        session: SessionId,
        status: PlaybackStatus,
    },
}

#[derive(Clone, Default)]
pub struct PlayerEventBus {
    subscribers: Arc<Mutex<Vec<Sender<PlayerEvent>>>>,
}

impl PlayerEventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        let (tx, rx) = unbounded::<PlayerEvent>();
        {
            let mut subscribers = self
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            subscribers.push(tx);
        }
        rx
    }

    /// Sends `event` to every live subscriber, dropping the closed ones.
    pub fn broadcast(&self, event: PlayerEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl fmt::Debug for PlayerEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .subscribers
            .lock()
            .map(|subscribers| subscribers.len())
            .unwrap_or_default();
        f.debug_struct("PlayerEventBus")
            .field("subscribers", &count)
            .finish()
    }
}
