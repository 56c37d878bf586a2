//! Relative paths of the published feed
//!
//! The publisher writes one directory per stream under a common base path,
//! each holding a DASH manifest, plus a listing file next to them:
//!
//! ```text
//! vidfeed/streams.json
//! vidfeed/cam1/stream.mpd
//! vidfeed/cam2/stream.mpd
//! ```

use serde::{Deserialize, Serialize};

/// Default base path of the feed
pub const DEFAULT_BASE_PATH: &str = "vidfeed";

/// Default listing file name
pub const DEFAULT_LISTING_FILE: &str = "streams.json";

/// Default manifest file name
pub const DEFAULT_MANIFEST_FILE: &str = "stream.mpd";

/// Relative paths used to reach the listing and the stream manifests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedLayout {
    base_path: String,
    listing_file: String,
    manifest_file: String,
}

impl Default for FeedLayout {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PATH, DEFAULT_LISTING_FILE, DEFAULT_MANIFEST_FILE)
    }
}

impl FeedLayout {
    /// Create a layout; surrounding slashes are stripped from every part
    pub fn new(
        base_path: impl Into<String>,
        listing_file: impl Into<String>,
        manifest_file: impl Into<String>,
    ) -> Self {
        Self {
            base_path: trim_slashes(base_path.into()),
            listing_file: trim_slashes(listing_file.into()),
            manifest_file: trim_slashes(manifest_file.into()),
        }
    }

    /// Base path shared by the listing and the manifests
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Path of the listing, e.g. `vidfeed/streams.json`
    pub fn listing_path(&self) -> String {
        self.join(&[self.listing_file.as_str()])
    }

    /// Path of a stream manifest, e.g. `vidfeed/cam1/stream.mpd`
    pub fn manifest_path(&self, stream_id: &str) -> String {
        self.join(&[stream_id, self.manifest_file.as_str()])
    }

    fn join(&self, parts: &[&str]) -> String {
        std::iter::once(self.base_path.as_str())
            .chain(parts.iter().copied())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn trim_slashes(value: String) -> String {
    value.trim_matches('/').to_string()
}
