//! Client glue for jpeg2video.
//!
//! Ties the stream catalog ([`j2vfeed`]) to playback ([`j2vplayer`]):
//!
//! - [`VidfeedApp`] applies listing results and owns the selection;
//! - [`SelectionController`] turns a selected stream into a player reset;
//! - [`PollingLoop`] refreshes the listing on a fixed interval;
//! - [`AppEvent`]s tell the view what changed.
//!
//! ```
//! use j2vclient::VidfeedApp;
//! use j2vfeed::{FeedLayout, Listing};
//! use j2vplayer::HeadlessEngineFactory;
//!
//! let mut app = VidfeedApp::with_layout(
//!     HeadlessEngineFactory::new(),
//!     FeedLayout::default(),
//!     "video_player",
//! );
//!
//! app.apply_refresh(Listing::from_json(r#"{"x":{"dir":"cam1","title":"Cam 1"}}"#));
//! assert_eq!(app.player().url(), Some("vidfeed/cam1/stream.mpd"));
//! ```

pub mod app;
pub mod events;
pub mod logging;
pub mod polling;
pub mod selection;

pub use app::VidfeedApp;
pub use events::{AppEvent, AppEventBus};
pub use logging::init_logging;
pub use polling::{PollingLoop, SharedApp};
pub use selection::SelectionController;
