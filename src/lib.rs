//! trendscope - trending topics and explore exports with caching
//!
//! The core is a [`TrendsFetcher`] holding a transport and a result cache.
//! Single queries go through [`TrendsFetcher::fetch_feed`] and
//! [`TrendsFetcher::fetch_explore`]; many at once through the batch
//! scheduler in [`batch`]. The process-wide default cache is managed with
//! [`cache_clear`], [`cache_stats`] and [`cache_set_ttl`].

pub mod batch;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod lookup;
pub mod parse;

use std::sync::Arc;

pub use batch::{BatchMode, BatchResults, Completion, ProgressObserver, run_batch};
pub use cache::{CacheStats, TrendsCache};
pub use client::models::{
    Cell, ExploreSection, ExploreSections, NewsArticle, SectionName, TrendImage, TrendRecord,
};
pub use client::{GoogleTrendsClient, TrendsTransport};
pub use config::Config;
pub use error::{Error, FetchError, Result};
pub use fetch::{ExploreParams, FeedParams, SortOrder, TrendsFetcher};
pub use parse::{FeedOptions, parse_feed, parse_sections};

/// Fetcher over HTTP
pub type DefaultFetcher = TrendsFetcher<GoogleTrendsClient>;

/// Build an HTTP fetcher from `config`, using the process-wide cache.
///
/// The configured capacity only applies if the process-wide cache has not
/// been created yet; the configured TTL always applies.
pub fn default_fetcher(config: &Config) -> Result<DefaultFetcher> {
    let transport = GoogleTrendsClient::new(&config.network)?;
    let cache = cache::init_global(config.cache_ttl(), config.cache.max_size);
    Ok(TrendsFetcher::new(Arc::new(transport), cache))
}

/// Empty the process-wide cache. Hit and miss counters are kept.
pub fn cache_clear() {
    cache::global().clear();
}

pub fn cache_stats() -> CacheStats {
    cache::global().stats()
}

/// Set the TTL for future insertions into the process-wide cache.
///
/// `seconds <= 0` disables caching until a positive TTL is set again.
pub fn cache_set_ttl(seconds: i64) {
    cache::global().set_ttl_secs(seconds);
}
