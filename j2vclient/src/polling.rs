//! Periodic listing refresh.
//!
//! The loop ticks on a fixed interval, first tick immediate. Every tick
//! spawns its own refresh task, so a slow server can lead to overlapping
//! fetches. Each task applies its result under the application lock, one
//! listing at a time.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use j2vfeed::config_ext::DEFAULT_POLL_INTERVAL_MS;
use j2vfeed::{ListingSource, MergeReport};
use j2vplayer::EngineFactory;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::app::VidfeedApp;

/// Application state shared between the view and refresh tasks.
pub type SharedApp<F> = Arc<Mutex<VidfeedApp<F>>>;

pub struct PollingLoop<S, F: EngineFactory> {
    source: Arc<S>,
    app: SharedApp<F>,
    interval: Duration,
}

impl<S, F> Clone for PollingLoop<S, F>
where
    F: EngineFactory,
{
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            app: Arc::clone(&self.app),
            interval: self.interval,
        }
    }
}

impl<S, F> PollingLoop<S, F>
where
    S: ListingSource + 'static,
    F: EngineFactory + 'static,
{
    /// A zero `interval` is replaced by the default polling interval.
    pub fn new(source: S, app: SharedApp<F>, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            warn!(
                default_ms = DEFAULT_POLL_INTERVAL_MS,
                "Zero polling interval, using default"
            );
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)
        } else {
            interval
        };

        Self {
            source: Arc::new(source),
            app,
            interval,
        }
    }

    pub fn app(&self) -> &SharedApp<F> {
        &self.app
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fetches the listing once and applies it.
    ///
    /// No lock is held while the request is in flight.
    pub async fn refresh_once(&self) -> Option<MergeReport> {
        let result = self.source.fetch_listing().await;
        let mut app = self.app.lock().unwrap_or_else(PoisonError::into_inner);
        app.apply_refresh(result)
    }

    /// Ticks forever, spawning one refresh per tick.
    pub async fn run(self) {
        info!(interval_ms = self.interval.as_millis() as u64, "Stream polling started");

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            debug!("Refreshing stream listing");
            let refresh = self.clone();
            tokio::spawn(async move {
                refresh.refresh_once().await;
            });
        }
    }

    /// Runs the loop on its own task. Aborting the handle stops polling.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
