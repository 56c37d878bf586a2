//! Where listings come from
//!
//! The catalog only needs "give me the current listing". [`ListingSource`]
//! is that seam: [`VidfeedClient`](crate::VidfeedClient) implements it over
//! HTTP, tests implement it with canned responses.

use crate::error::Result;
use crate::models::Listing;
use async_trait::async_trait;
use std::sync::Arc;

/// Provider of stream listings
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the current listing
    ///
    /// One call issues at most one request. Implementations do not retry.
    async fn fetch_listing(&self) -> Result<Listing>;
}

#[async_trait]
impl<S: ListingSource + ?Sized> ListingSource for Arc<S> {
    async fn fetch_listing(&self) -> Result<Listing> {
        (**self).fetch_listing().await
    }
}
