//! Playback status derived from engine signals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::EngineEvent;

/// Last observed state of the playback session.
///
/// The normal life of a session is `None → Ready → {Playing ⇄ Paused} → Ended`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// No session, or the engine has not signaled it can play yet.
    #[default]
    None,
    Ready,
    Playing,
    Paused,
    #[serde(rename = "end")]
    Ended,
}

impl PlaybackStatus {
    /// Status after `event`, or `None` if the event leaves it unchanged.
    ///
    /// `canPlay` only moves a fresh session to `Ready`; it is ignored once
    /// the session has gone past that point. The three playback signals
    /// always overwrite the status, whatever the current one is.
    pub fn on_event(self, event: EngineEvent) -> Option<PlaybackStatus> {
        match event {
            EngineEvent::CanPlay => (self == PlaybackStatus::None).then_some(PlaybackStatus::Ready),
            EngineEvent::PlaybackPlaying => Some(PlaybackStatus::Playing),
            EngineEvent::PlaybackPaused => Some(PlaybackStatus::Paused),
            EngineEvent::PlaybackEnded => Some(PlaybackStatus::Ended),
        }
    }

    /// True if `next` follows the documented lifecycle from `self`.
    pub fn is_expected_transition(self, next: PlaybackStatus) -> bool {
        use PlaybackStatus::*;
        matches!(
            (self, next),
            (None, Ready)
                | (Ready, Playing)
                | (Ready, Paused)
                | (Playing, Playing)
                | (Playing, Paused)
                | (Paused, Paused)
                | (Paused, Playing)
                | (Playing, Ended)
                | (Paused, Ended)
        )
    }

    /// Session established: ready, playing or paused.
    pub fn is_ready(self) -> bool {
        matches!(
            self,
            PlaybackStatus::Ready | PlaybackStatus::Playing | PlaybackStatus::Paused
        )
    }

    pub fn is_playing(self) -> bool {
        self == PlaybackStatus::Playing
    }

    pub fn is_paused(self) -> bool {
        self == PlaybackStatus::Paused
    }

    pub fn is_ended(self) -> bool {
        self == PlaybackStatus::Ended
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackStatus::None => "none",
            PlaybackStatus::Ready => "ready",
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Paused => "paused",
            PlaybackStatus::Ended => "end",
        }
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
