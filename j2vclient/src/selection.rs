//! Current stream selection, bound to playback.
//!
//! Selecting a stream always resets the player onto that stream's
//! manifest. The selection is kept by id and resolved against the catalog,
//! so title updates from later listings show through.

use j2vfeed::{FeedLayout, StreamCatalog, StreamDescriptor};
use j2vplayer::{EngineFactory, PlaybackController};
use tracing::info;

pub struct SelectionController<F: EngineFactory> {
    player: PlaybackController<F>,
    layout: FeedLayout,
    mount_point: String,
    current: Option<String>,
}

impl<F: EngineFactory> SelectionController<F> {
    pub fn new(
        player: PlaybackController<F>,
        layout: FeedLayout,
        mount_point: impl Into<String>,
    ) -> Self {
        Self {
            player,
            layout,
            mount_point: mount_point.into(),
            current: None,
        }
    }

    /// Selects `stream` and resets the player onto its manifest.
    ///
    /// Returns the manifest URL handed to the player.
    pub fn select(&mut self, stream: &StreamDescriptor) -> String {
        let url = self.layout.manifest_path(stream.id());
        info!(id = stream.id(), url = %url, "Stream selected");

        self.current = Some(stream.id().to_string());
        self.player.reset(&self.mount_point, Some(&url));
        url
    }

    /// Selects the first stream of `catalog` if nothing is selected yet.
    ///
    /// Returns the selected stream id when a selection was made.
    pub fn auto_select(&mut self, catalog: &StreamCatalog) -> Option<String> {
        if self.current.is_some() {
            return None;
        }
        let first = catalog.first()?;
        self.select(first);
        Some(first.id().to_string())
    }

    /// Drops the selection and leaves the player idle.
    pub fn clear(&mut self) {
        self.current = None;
        self.player.reset(&self.mount_point, None);
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Selected stream, as currently known by `catalog`.
    pub fn current<'a>(&self, catalog: &'a StreamCatalog) -> Option<&'a StreamDescriptor> {
        catalog.get(self.current.as_deref()?)
    }

    pub fn is_selected(&self, stream: &StreamDescriptor) -> bool {
        self.current.as_deref() == Some(stream.id())
    }

    pub fn manifest_url(&self, stream_id: &str) -> String {
        self.layout.manifest_path(stream_id)
    }

    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }

    pub fn player(&self) -> &PlaybackController<F> {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlaybackController<F> {
        &mut self.player
    }
}
