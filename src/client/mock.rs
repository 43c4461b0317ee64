//! Mock transport for testing
//!
//! Serves canned payloads keyed by target, with optional per-target failures
//! and simulated latency. Tracks call counts and peak concurrency so tests can
//! assert on scheduling behavior.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::TrendsTransport;
use crate::error::FetchError;
use crate::fetch::ExploreQuery;

/// Mock transport for unit tests.
///
/// Feed payloads are keyed by region code, export payloads by the
/// comma-joined query string.
#[derive(Default)]
pub struct MockTransport {
    feeds: Mutex<HashMap<String, String>>,
    exports: Mutex<HashMap<String, String>>,
    failures: Mutex<HashMap<String, FetchError>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(self, geo: &str, xml: &str) -> Self {
        lock(&self.feeds).insert(geo.to_string(), xml.to_string());
        self
    }

    pub fn with_export(self, queries: &str, payload: &str) -> Self {
        lock(&self.exports).insert(queries.to_string(), payload.to_string());
        self
    }

    /// Fail every request for `target` with `error`.
    pub fn with_failure(self, target: &str, error: FetchError) -> Self {
        lock(&self.failures).insert(target.to_string(), error);
        self
    }

    /// Make every request take `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Total requests served, successful or not
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of requests observed in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn serve(
        &self,
        target: &str,
        payloads: &Mutex<HashMap<String, String>>,
    ) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = lock(&self.failures).get(target).cloned();
        let result = match failure {
            Some(err) => Err(err),
            None => lock(payloads).get(target).cloned().ok_or_else(|| {
                FetchError::Download(format!("No mock payload for '{}'", target))
            }),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[async_trait]
impl TrendsTransport for MockTransport {
    async fn fetch_feed(&self, geo: &str) -> Result<String, FetchError> {
        self.serve(geo, &self.feeds).await
    }

    async fn fetch_export(&self, query: &ExploreQuery) -> Result<String, FetchError> {
        self.serve(&query.joined_queries(), &self.exports).await
    }
}

/// Minimal feed document with one item per topic
pub fn feed_xml(topics: &[(&str, &str)]) -> String {
    let items: String = topics
        .iter()
        .map(|(topic, traffic)| {
            format!(
                "<item><title>{}</title><ht:approx_traffic>{}</ht:approx_traffic>\
                 <pubDate>Mon, 14 Oct 2024 10:40:00 -0700</pubDate></item>",
                topic, traffic
            )
        })
        .collect();
    format!(
        "<rss version=\"2.0\" xmlns:ht=\"https://trends.google.com/trending/rss\">\
         <channel><title>Trends</title>{}</channel></rss>",
        items
    )
}
