//! HTTP client for the published stream listing
//!
//! # Example
//!
//! ```no_run
//! use j2vfeed::{StreamCatalog, VidfeedClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VidfeedClient::builder()
//!         .base_url("http://camera-box.local:8080/")
//!         .build()?;
//!
//!     let mut catalog = StreamCatalog::new();
//!     catalog.refresh(&client).await?;
//!
//!     for stream in &catalog {
//!         println!("{} -> {}", stream.display_title(), client.manifest_url(stream.id())?);
//!     }
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::layout::FeedLayout;
use crate::models::Listing;
use crate::source::ListingSource;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default server base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

/// Default timeout for HTTP requests (10 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("jpeg2video/", env!("CARGO_PKG_VERSION"));

/// Listing client
///
/// Stateless: every call issues a fresh request, responses are not cached.
#[derive(Debug, Clone)]
pub struct VidfeedClient {
    client: Client,
    base_url: Url,
    layout: FeedLayout,
    timeout: Duration,
}

impl VidfeedClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Server base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Feed layout used to derive paths
    pub fn layout(&self) -> &FeedLayout {
        &self.layout
    }

    /// Absolute URL of the listing
    pub fn listing_url(&self) -> Result<Url> {
        Ok(self.base_url.join(&self.layout.listing_path())?)
    }

    /// Absolute URL of a stream manifest
    pub fn manifest_url(&self, stream_id: &str) -> Result<Url> {
        Ok(self.base_url.join(&self.layout.manifest_path(stream_id))?)
    }

    /// Fetch and parse the listing
    pub async fn listing(&self) -> Result<Listing> {
        let url = self.listing_url()?;
        debug!(url = %url, "Fetching stream listing");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        Listing::from_json(&body)
    }
}

#[async_trait]
impl ListingSource for VidfeedClient {
    async fn fetch_listing(&self) -> Result<Listing> {
        self.listing().await
    }
}

/// Builder for [`VidfeedClient`]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    layout: FeedLayout,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            layout: FeedLayout::default(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Use an existing reqwest client (shared pool, proxy settings...)
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the server base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the feed layout
    pub fn layout(mut self, layout: FeedLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent (ignored when a client is supplied)
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<VidfeedClient> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder().user_agent(self.user_agent).build()?,
        };

        Ok(VidfeedClient {
            client,
            base_url: parse_base_url(&self.base_url)?,
            layout: self.layout,
            timeout: self.timeout,
        })
    }
}

/// Parse a base URL so that relative joins stay below it
fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{}/", trimmed))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let client = VidfeedClient::new().unwrap();
        assert_eq!(
            client.listing_url().unwrap().as_str(),
            "http://localhost:8080/vidfeed/streams.json"
        );
        assert_eq!(
            client.manifest_url("cam1").unwrap().as_str(),
            "http://localhost:8080/vidfeed/cam1/stream.mpd"
        );
    }

    #[test]
    fn test_base_url_with_sub_path() {
        let client = VidfeedClient::builder()
            .base_url("https://example.org/jpeg2video")
            .layout(FeedLayout::new("feeds", "list.json", "live.mpd"))
            .build()
            .unwrap();

        assert_eq!(
            client.listing_url().unwrap().as_str(),
            "https://example.org/jpeg2video/feeds/list.json"
        );
        assert_eq!(
            client.manifest_url("door").unwrap().as_str(),
            "https://example.org/jpeg2video/feeds/door/live.mpd"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = VidfeedClient::builder()
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
