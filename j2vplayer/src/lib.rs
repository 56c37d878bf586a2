//! Playback control for the jpeg2video web client.
//!
//! Wraps one adaptive-streaming player engine and reduces its signals to a
//! small status the view can bind to:
//!
//! ```text
//! none ──canPlay──▶ ready ──▶ playing ⇄ paused ──▶ end
//! ```
//!
//! ```
//! use j2vplayer::{EngineEvent, HeadlessEngineFactory, PlaybackController};
//!
//! let factory = HeadlessEngineFactory::new();
//! let mut player = PlaybackController::new(factory.clone());
//!
//! player.reset("video_player", Some("vidfeed/cam1/stream.mpd"));
//! assert!(!player.is_ready());
//!
//! factory.latest().unwrap().fire(EngineEvent::CanPlay);
//! assert!(player.is_ready());
//! ```

pub mod controller;
pub mod engine;
pub mod errors;
pub mod events;
pub mod headless;
pub mod status;

#[cfg(feature = "j2vconfig")]
pub mod config_ext;

pub use controller::PlaybackController;
pub use engine::{EngineEvent, EngineFactory, Listener, PlayerEngine};
pub use errors::PlayerError;
pub use events::{PlayerEvent, PlayerEventBus, SessionId};
pub use headless::{EngineCall, HeadlessEngine, HeadlessEngineFactory, HeadlessProbe};
pub use status::PlaybackStatus;

#[cfg(feature = "j2vconfig")]
pub use config_ext::PlayerConfigExt;
