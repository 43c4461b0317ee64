//! Single-query fetcher
//!
//! Wraps a [`TrendsTransport`] with the result cache: a fetch first looks up
//! the canonical query's key, and on a miss downloads, decodes and then
//! stores the decoded result. Nothing is stored unless decoding succeeded.

pub mod params;

use std::cmp::Reverse;
use std::sync::Arc;

pub use params::{ExploreParams, ExploreQuery, FeedParams, FeedQuery, SortOrder};

use crate::cache::TrendsCache;
use crate::client::TrendsTransport;
use crate::client::models::{ExploreSections, TrendRecord};
use crate::error::FetchError;
use crate::parse::{parse_feed, parse_sections};

/// A cached fetch result of either shape
#[derive(Debug, Clone)]
pub enum CachedPayload {
    Trends(Vec<TrendRecord>),
    Sections(ExploreSections),
}

/// Fetches one query at a time through a shared cache.
pub struct TrendsFetcher<T: TrendsTransport> {
    transport: Arc<T>,
    cache: Arc<TrendsCache>,
}

impl<T: TrendsTransport> Clone for TrendsFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<T: TrendsTransport> TrendsFetcher<T> {
    pub fn new(transport: Arc<T>, cache: Arc<TrendsCache>) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &Arc<TrendsCache> {
        &self.cache
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Fetch the trending feed for one region.
    ///
    /// With `use_cache` false the cache is neither read nor written and its
    /// counters are left untouched.
    pub async fn fetch_feed(
        &self,
        params: &FeedParams,
        use_cache: bool,
    ) -> Result<Vec<TrendRecord>, FetchError> {
        let query = params.canonicalize()?;
        let key = query.cache_key();

        if use_cache {
            if let Some(CachedPayload::Trends(records)) = self.cache.get(&key) {
                log::debug!("Cache hit: feed {}", query.geo);
                return Ok(records);
            }
            log::debug!("Cache miss: feed {}", query.geo);
        }

        let xml = self.transport.fetch_feed(&query.geo).await?;
        let records = order_records(parse_feed(&xml, &query.options)?, &query);

        if use_cache {
            self.cache.put(&key, CachedPayload::Trends(records.clone()));
        }
        Ok(records)
    }

    /// Fetch and split an explore export.
    ///
    /// A payload without a single recognizable section is a parse error.
    /// Requested sections the export lacks are simply absent.
    pub async fn fetch_explore(
        &self,
        params: &ExploreParams,
        use_cache: bool,
    ) -> Result<ExploreSections, FetchError> {
        let query = params.canonicalize()?;
        let key = query.cache_key();

        if use_cache {
            if let Some(CachedPayload::Sections(sections)) = self.cache.get(&key) {
                log::debug!("Cache hit: explore {:?}", query.queries);
                return Ok(sections);
            }
            log::debug!("Cache miss: explore {:?}", query.queries);
        }

        let payload = self.transport.fetch_export(&query).await?;
        let mut sections = parse_sections(&payload, None);
        if sections.is_empty() {
            return Err(FetchError::Parse(
                "Export payload contains no recognizable sections".to_string(),
            ));
        }
        if let Some(wanted) = &query.sections {
            sections.sections.retain(|name, _| wanted.contains(name));
        }

        if use_cache {
            self.cache.put(&key, CachedPayload::Sections(sections.clone()));
        }
        Ok(sections)
    }
}

/// Apply the query's sort order and record limit.
fn order_records(mut records: Vec<TrendRecord>, query: &FeedQuery) -> Vec<TrendRecord> {
    match query.sort {
        SortOrder::Relevance => {}
        SortOrder::Title => records.sort_by_cached_key(|r| r.topic.to_lowercase()),
        SortOrder::Volume => records.sort_by_key(|r| Reverse(r.traffic_volume().unwrap_or(0))),
        SortOrder::Recency => records.sort_by_key(|r| Reverse(r.published)),
    }
    if let Some(limit) = query.limit {
        records.truncate(limit);
    }
    records
}
