//! Data models for the stream listing
//!
//! The server publishes `vidfeed/streams.json`, either as an object mapping
//! arbitrary keys to stream entries or as an array of entries:
//!
//! ```json
//! { "x": { "dir": "cam1", "title": "Cam 1", "desc": "Front door" } }
//! [ { "dir": "cam1", "title": "Cam 1" }, { "dir": "cam2" } ]
//! ```
//!
//! `dir` identifies a stream. The other fields are optional display data.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Listing Models
// ============================================================================

/// One element of a listing response
///
/// `None` stands for "undefined": the field was absent, `null`, or not a
/// string. Undefined fields never overwrite known values during a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingEntry {
    /// Stream directory, the identifying field
    pub dir: Option<String>,
    /// Display name
    pub title: Option<String>,
    /// Free-form description
    pub desc: Option<String>,
}

impl ListingEntry {
    /// Create an entry carrying only an identity
    pub fn new(dir: impl Into<String>) -> Self {
        Self {
            dir: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// Extract an entry from a raw JSON element
    ///
    /// Elements that are not objects yield an entry without identity, which
    /// the catalog skips.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            dir: text("dir"),
            title: text("title"),
            desc: text("desc"),
        }
    }

    /// Identity of the entry, if it has a usable one
    ///
    /// An empty `dir` cannot name a stream directory and counts as missing,
    /// so such an entry is skipped. The browser client only checked for an
    /// undefined `dir` and kept it, with an empty id and a manifest at
    /// `vidfeed//stream.mpd`.
    pub fn id(&self) -> Option<&str> {
        self.dir.as_deref().filter(|dir| !dir.is_empty())
    }

    /// Returns true if the entry can be merged into a catalog
    pub fn has_identity(&self) -> bool {
        self.id().is_some()
    }
}

/// A parsed listing response, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    entries: Vec<(String, ListingEntry)>,
}

impl Listing {
    /// Parse a listing from its JSON text
    pub fn from_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    /// Build a listing from an already decoded JSON document
    ///
    /// Objects are walked in document order with their keys; arrays are
    /// keyed by element index. Any other document is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        let entries = match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(key, item)| (key, ListingEntry::from_value(&item)))
                .collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), ListingEntry::from_value(item)))
                .collect(),
            other => {
                return Err(Error::invalid_listing(format!(
                    "expected an object or an array, got {}",
                    json_kind(&other)
                )));
            }
        };

        Ok(Self { entries })
    }

    /// Number of elements in the response, identified or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the response had no elements
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, entry)` pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ListingEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }
}

impl FromIterator<ListingEntry> for Listing {
    fn from_iter<T: IntoIterator<Item = ListingEntry>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .enumerate()
                .map(|(index, entry)| (index.to_string(), entry))
                .collect(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Catalog Models
// ============================================================================

/// A discoverable live stream
///
/// The id is the stream directory on the server and never changes once the
/// descriptor exists. Display fields are refreshed in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamDescriptor {
    #[serde(rename = "dir")]
    id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-form description
    #[serde(rename = "desc", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl StreamDescriptor {
    /// Create a descriptor with no display data
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build a descriptor from a listing entry, if it has an identity
    pub fn from_entry(entry: &ListingEntry) -> Option<Self> {
        let mut descriptor = Self::new(entry.id()?);
        descriptor.update(entry);
        Some(descriptor)
    }

    /// Stream identifier (server directory)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Title, falling back to the id
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    /// Returns true if `entry` designates this stream
    pub fn is_same_id(&self, entry: &ListingEntry) -> bool {
        entry.id() == Some(self.id.as_str())
    }

    /// Copy the defined fields of `entry` into this descriptor
    ///
    /// Undefined fields leave the current values untouched. Returns true if
    /// anything changed.
    pub fn update(&mut self, entry: &ListingEntry) -> bool {
        let mut changed = false;
        if let Some(title) = &entry.title {
            changed |= self.title.as_ref() != Some(title);
            self.title = Some(title.clone());
        }
        if let Some(desc) = &entry.desc {
            changed |= self.description.as_ref() != Some(desc);
            self.description = Some(desc.clone());
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_listing_keeps_document_order() {
        let listing = Listing::from_json(
            r#"{"z": {"dir": "cam3"}, "a": {"dir": "cam1"}, "m": {"dir": "cam2"}}"#,
        )
        .unwrap();

        let ids: Vec<_> = listing.iter().filter_map(|(_, e)| e.id()).collect();
        assert_eq!(ids, vec!["cam3", "cam1", "cam2"]);

        let keys: Vec<_> = listing.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_array_listing_is_keyed_by_index() {
        let listing =
            Listing::from_json(r#"[{"dir": "cam1", "title": "Cam 1"}, {"dir": "cam2"}]"#).unwrap();

        let items: Vec<_> = listing.iter().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].0, "0");
        assert_eq!(items[0].1, &ListingEntry::new("cam1").with_title("Cam 1"));
        assert_eq!(items[1].0, "1");
    }

    #[test]
    fn test_scalar_listing_is_rejected() {
        let err = Listing::from_json("42").unwrap_err();
        assert!(matches!(err, Error::InvalidListing(_)));

        let err = Listing::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_malformed_entries_have_no_identity() {
        let listing = Listing::from_json(
            r#"{"a": 12, "b": {"title": "No dir"}, "c": {"dir": ""}, "d": {"dir": 7}, "e": {"dir": null}}"#,
        )
        .unwrap();

        assert_eq!(listing.len(), 5);
        assert!(listing.iter().all(|(_, e)| !e.has_identity()));
    }

    #[test]
    fn test_null_and_non_string_fields_are_undefined() {
        let entry = ListingEntry::from_value(&serde_json::json!({
            "dir": "cam1",
            "title": null,
            "desc": 3
        }));
        assert_eq!(entry, ListingEntry::new("cam1"));
    }

    #[test]
    fn test_update_keeps_fields_missing_from_entry() {
        let mut stream = StreamDescriptor::new("cam1")
            .with_title("Cam 1")
            .with_description("Front door");

        assert!(!stream.update(&ListingEntry::new("cam1")));
        assert_eq!(stream.title.as_deref(), Some("Cam 1"));
        assert_eq!(stream.description.as_deref(), Some("Front door"));

        assert!(stream.update(&ListingEntry::new("cam1").with_desc("Back door")));
        assert_eq!(stream.title.as_deref(), Some("Cam 1"));
        assert_eq!(stream.description.as_deref(), Some("Back door"));
    }

    #[test]
    fn test_descriptor_serializes_with_wire_names() {
        let stream = StreamDescriptor::new("cam1").with_title("Cam 1");
        let json = serde_json::to_value(&stream).unwrap();
        assert_eq!(json, serde_json::json!({"dir": "cam1", "title": "Cam 1"}));
        assert_eq!(StreamDescriptor::new("cam2").display_title(), "cam2");
    }
}
