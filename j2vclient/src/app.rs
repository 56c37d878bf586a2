//! Application state shared by the polling loop and the view.
//!
//! [`VidfeedApp`] owns the catalog and the selection. Listing results are
//! applied to it synchronously, and the first stream ever seen is selected
//! automatically when the user has not picked one yet.

use chrono::Utc;
use crossbeam_channel::Receiver;
use j2vconfig::Config;
use j2vfeed::{
    Error, FeedLayout, Listing, MergeReport, Result, StreamCatalog, StreamDescriptor,
    VidfeedConfigExt,
};
use j2vplayer::{EngineFactory, PlaybackController, PlayerConfigExt};
use tracing::{debug, info, warn};

use crate::events::{AppEvent, AppEventBus};
use crate::selection::SelectionController;

pub struct VidfeedApp<F: EngineFactory> {
    catalog: StreamCatalog,
    selection: SelectionController<F>,
    bus: AppEventBus,
}

impl<F: EngineFactory> VidfeedApp<F> {
    pub fn new(selection: SelectionController<F>) -> Self {
        Self {
            catalog: StreamCatalog::new(),
            selection,
            bus: AppEventBus::new(),
        }
    }

    /// Builds the application from the feed and player settings.
    pub fn from_config(config: &Config, factory: F) -> anyhow::Result<Self> {
        let layout = config.get_vidfeed_layout()?;
        let mount_point = config.get_player_mount_point()?;
        Ok(Self::with_layout(factory, layout, mount_point))
    }

    pub fn with_layout(factory: F, layout: FeedLayout, mount_point: impl Into<String>) -> Self {
        let player = PlaybackController::new(factory);
        Self::new(SelectionController::new(player, layout, mount_point))
    }

    /// Applies the outcome of one listing fetch.
    ///
    /// A failed fetch leaves the catalog and the selection untouched.
    /// Returns the merge report when the listing was applied.
    pub fn apply_refresh(&mut self, result: Result<Listing>) -> Option<MergeReport> {
        let listing = match result {
            Ok(listing) => listing,
            Err(err) => {
                warn!(error = %err, "Stream listing refresh failed");
                self.bus.broadcast(AppEvent::RefreshFailed {
                    reason: err.to_string(),
                    at: Utc::now(),
                });
                return None;
            }
        };

        let report = self.catalog.merge(&listing);
        debug!(
            added = report.added,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped,
            total = self.catalog.len(),
            "Stream listing applied"
        );
        self.bus.broadcast(AppEvent::CatalogRefreshed {
            report,
            total: self.catalog.len(),
            at: Utc::now(),
        });

        if let Some(id) = self.selection.auto_select(&self.catalog) {
            info!(id = %id, "First stream selected automatically");
            self.notify_selection(id);
        }

        Some(report)
    }

    /// Selects the stream `id` on behalf of the user.
    ///
    /// An id missing from the catalog yields [`Error::StreamNotFound`] and
    /// leaves the current playback alone.
    pub fn select(&mut self, id: &str) -> Result<()> {
        let stream = self
            .catalog
            .get(id)
            .ok_or_else(|| Error::StreamNotFound(id.to_string()))?;
        self.selection.select(stream);
        self.notify_selection(id.to_string());
        Ok(())
    }

    fn notify_selection(&self, id: String) {
        let manifest_url = self.selection.manifest_url(&id);
        self.bus
            .broadcast(AppEvent::SelectionChanged { id, manifest_url });
    }

    pub fn catalog(&self) -> &StreamCatalog {
        &self.catalog
    }

    /// Stream currently selected, with its latest display fields.
    pub fn current(&self) -> Option<&StreamDescriptor> {
        self.selection.current(&self.catalog)
    }

    pub fn selection(&self) -> &SelectionController<F> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionController<F> {
        &mut self.selection
    }

    pub fn player(&self) -> &PlaybackController<F> {
        self.selection.player()
    }

    pub fn player_mut(&mut self) -> &mut PlaybackController<F> {
        self.selection.player_mut()
    }

    pub fn subscribe(&self) -> Receiver<AppEvent> {
        self.bus.subscribe()
    }

    pub fn bus(&self) -> &AppEventBus {
        &self.bus
    }
}
