//! Abstraction of the adaptive-streaming player engine.
//!
//! The engine (a DASH media player living in the view) is an external
//! collaborator. The controller only needs the narrow surface below: build
//! an instance, subscribe to four playback signals, bind it to a mount
//! point and a manifest URL, and drive transport.

use std::fmt;

use crate::errors::PlayerError;

/// Playback signals emitted by the engine and observed by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineEvent {
    /// Enough data is buffered to start playback (`canPlay`).
    CanPlay,
    /// Playback reached the end of the media (`playbackEnded`).
    PlaybackEnded,
    /// Playback was paused (`playbackPaused`).
    PlaybackPaused,
    /// Playback started or resumed (`playbackPlaying`).
    PlaybackPlaying,
}

impl EngineEvent {
    /// Every signal the controller listens to.
    pub const ALL: [EngineEvent; 4] = [
        EngineEvent::CanPlay,
        EngineEvent::PlaybackEnded,
        EngineEvent::PlaybackPaused,
        EngineEvent::PlaybackPlaying,
    ];

    /// Event name as exposed by the engine.
    pub fn name(self) -> &'static str {
        match self {
            EngineEvent::CanPlay => "canPlay",
            EngineEvent::PlaybackEnded => "playbackEnded",
            EngineEvent::PlaybackPaused => "playbackPaused",
            EngineEvent::PlaybackPlaying => "playbackPlaying",
        }
    }
}

impl fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Callback registered for one engine event.
pub type Listener = Box<dyn FnMut() + Send + 'static>;

/// Operations the controller needs from one engine instance.
pub trait PlayerEngine: Send {
    /// Registers a listener for `event`.
    fn on(&mut self, event: EngineEvent, listener: Listener);

    /// Unregisters every listener for `event`.
    fn off(&mut self, event: EngineEvent);

    /// Binds the engine to the view element `mount_point` and loads `url`.
    fn initialize(
        &mut self,
        mount_point: &str,
        url: &str,
        autoplay: bool,
    ) -> Result<(), PlayerError>;

    /// Starts buffering before playback is requested.
    fn preload(&mut self) -> Result<(), PlayerError>;

    /// Starts or resumes playback.
    fn play(&mut self) -> Result<(), PlayerError>;

    /// Pauses playback.
    fn pause(&mut self) -> Result<(), PlayerError>;

    /// Seeks to `time` seconds from the start of the media.
    fn seek(&mut self, time: f64) -> Result<(), PlayerError>;

    /// Releases the media and detaches from the view.
    fn reset(&mut self);
}

/// Builds engine instances, one per playback session.
pub trait EngineFactory: Send {
    type Engine: PlayerEngine;

    fn create(&self) -> Result<Self::Engine, PlayerError>;
}

impl<E, F> EngineFactory for F
where
    E: PlayerEngine,
    F: Fn() -> Result<E, PlayerError> + Send,
{
    type Engine = E;

    fn create(&self) -> Result<E, PlayerError> {
        self()
    }
}
