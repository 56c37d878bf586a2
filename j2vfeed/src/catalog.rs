//! Local collection of known streams
//!
//! The catalog grows from successive listings. Each listing is merged entry
//! by entry:
//!
//! - an entry without identity is skipped;
//! - an entry whose id is already known updates that descriptor in place,
//!   field by field;
//! - any other entry is appended.
//!
//! Descriptors missing from a later listing are kept. The catalog never
//! shrinks, and its order is the order in which streams were first seen.

use crate::error::Result;
use crate::models::{Listing, StreamDescriptor};
use crate::source::ListingSource;
use serde::Serialize;
use tracing::{debug, trace};

/// Outcome of merging one listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Descriptors appended to the catalog
    pub added: usize,
    /// Known descriptors whose display fields changed
    pub updated: usize,
    /// Known descriptors the listing left as they were
    pub unchanged: usize,
    /// Listing elements without a usable identity
    pub skipped: usize,
}

impl MergeReport {
    /// Returns true if the merge modified the catalog
    pub fn changed(&self) -> bool {
        self.added > 0 || self.updated > 0
    }
}

/// Ordered, append-only set of stream descriptors
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct StreamCatalog {
    streams: Vec<StreamDescriptor>,
}

impl StreamCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch one listing from `source` and merge it
    ///
    /// On failure the catalog is left untouched and the error is returned;
    /// nothing is retried here.
    pub async fn refresh<S>(&mut self, source: &S) -> Result<MergeReport>
    where
        S: ListingSource + ?Sized,
    {
        let listing = source.fetch_listing().await?;
        Ok(self.merge(&listing))
    }

    /// Merge a listing into the catalog, in listing order
    pub fn merge(&mut self, listing: &Listing) -> MergeReport {
        let mut report = MergeReport::default();

        for (key, entry) in listing.iter() {
            if !entry.has_identity() {
                trace!(key, "Skipping listing entry without dir");
                report.skipped += 1;
                continue;
            }

            match self.streams.iter_mut().find(|s| s.is_same_id(entry)) {
                Some(existing) => {
                    if existing.update(entry) {
                        report.updated += 1;
                    } else {
                        report.unchanged += 1;
                    }
                }
                None => {
                    if let Some(descriptor) = StreamDescriptor::from_entry(entry) {
                        debug!(id = descriptor.id(), "New stream discovered");
                        self.streams.push(descriptor);
                        report.added += 1;
                    }
                }
            }
        }

        report
    }

    /// Number of known streams
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Returns true if no stream was ever seen
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Streams in first-discovery order
    pub fn iter(&self) -> std::slice::Iter<'_, StreamDescriptor> {
        self.streams.iter()
    }

    /// Streams in first-discovery order, as a slice
    pub fn as_slice(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    /// First discovered stream
    pub fn first(&self) -> Option<&StreamDescriptor> {
        self.streams.first()
    }

    /// Look a stream up by id
    pub fn get(&self, id: &str) -> Option<&StreamDescriptor> {
        self.streams.iter().find(|s| s.id() == id)
    }

    /// Position of a stream in display order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.streams.iter().position(|s| s.id() == id)
    }

    /// Returns true if a stream with this id is known
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }
}

impl<'a> IntoIterator for &'a StreamCatalog {
    type Item = &'a StreamDescriptor;
    type IntoIter = std::slice::Iter<'a, StreamDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.streams.iter()
    }
}
