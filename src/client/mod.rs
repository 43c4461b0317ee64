//! Upstream trends service client
//!
//! [`TrendsTransport`] is the boundary between the fetch core and the network.
//! [`GoogleTrendsClient`] implements it over HTTP; tests substitute a mock.

use async_trait::async_trait;

pub mod google;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod rate_limit;

pub use google::GoogleTrendsClient;
pub use models::*;

use crate::error::FetchError;
use crate::fetch::ExploreQuery;

/// Retrieves raw payloads from the upstream service.
///
/// Implementations return the body text unmodified and classify failures:
/// throttling statuses become [`FetchError::RateLimit`], every other transport
/// failure becomes [`FetchError::Download`].
#[async_trait]
pub trait TrendsTransport: Send + Sync {
    /// Fetch the trending feed document for a validated region code.
    async fn fetch_feed(&self, geo: &str) -> Result<String, FetchError>;

    /// Fetch the multi-section export for a validated explore query.
    async fn fetch_export(&self, query: &ExploreQuery) -> Result<String, FetchError>;
}
