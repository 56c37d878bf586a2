use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, Sender, unbounded};
use j2vfeed::MergeReport;
use serde::Serialize;

/// Catalog and selection notifications for the view layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    CatalogRefreshed {
        report: MergeReport,
        total: usize,
        at: DateTime<Utc>,
    },
    RefreshFailed {
        reason: String,
        at: DateTime<Utc>,
    },
    SelectionChanged {
        id: String,
        manifest_url: String,
    },
}

#[derive(Clone, Default)]
pub struct AppEventBus {
    subscribers: Arc<Mutex<Vec<Sender<AppEvent>>>>,
}

impl AppEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<AppEvent> {
        let (tx, rx) = unbounded::<AppEvent>();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    pub fn broadcast(&self, event: AppEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl fmt::Debug for AppEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppEventBus").finish_non_exhaustive()
    }
}
