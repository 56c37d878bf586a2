//! Stream listing library for the jpeg2video web client
//!
//! The jpeg2video publisher turns camera JPEG sequences into DASH streams and
//! advertises them in a listing file (`vidfeed/streams.json`). This crate
//! fetches that listing and keeps a local catalog of the advertised streams.
//!
//! # Features
//!
//! - **Listing parser**: accepts the object and array shapes of
//!   `streams.json`, in document order, and tolerates malformed entries
//! - **Catalog**: field-level, identity-keyed merge that never drops a
//!   stream once seen
//! - **HTTP client**: reqwest-based [`VidfeedClient`] behind the
//!   [`ListingSource`] trait
//! - **Layout**: derivation of listing and manifest URLs
//!   (`vidfeed/<dir>/stream.mpd`)
//! - **Configuration Extension**: feed settings stored in j2vconfig
//!
//! # Example
//!
//! ```no_run
//! use j2vfeed::{StreamCatalog, VidfeedClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VidfeedClient::new()?;
//!     let mut catalog = StreamCatalog::new();
//!
//!     let report = catalog.refresh(&client).await?;
//!     println!("{} new stream(s), {} known", report.added, catalog.len());
//!     Ok(())
//! }
//! ```
//!
//! # Known limitation
//!
//! Streams that disappear from the listing stay in the catalog. The
//! publisher only ever appends to its listing, and the view keeps showing
//! whatever it has seen.

pub mod catalog;
pub mod client;
pub mod error;
pub mod layout;
pub mod models;
pub mod source;

#[cfg(feature = "j2vconfig")]
pub mod config_ext;

// Re-exports
pub use catalog::{MergeReport, StreamCatalog};
pub use client::{ClientBuilder, VidfeedClient};
pub use error::{Error, Result};
pub use layout::FeedLayout;
pub use models::{Listing, ListingEntry, StreamDescriptor};
pub use source::ListingSource;

#[cfg(feature = "j2vconfig")]
pub use config_ext::VidfeedConfigExt;
