//! Batch scheduler
//!
//! Runs one fetch per target, either strictly in input order with a pause
//! between targets, or with up to `max_concurrent` fetches in flight at once.
//! A target's failure is recorded against that target and never aborts the
//! batch; only malformed batch input is an error of the batch itself.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;

use crate::client::TrendsTransport;
use crate::client::models::{ExploreSections, TrendRecord};
use crate::error::FetchError;
use crate::fetch::{ExploreParams, FeedParams, TrendsFetcher};

/// Type alias for boxed futures used in concurrent mode
type TargetFuture<V> = Pin<Box<dyn Future<Output = (String, Result<V, FetchError>)> + Send>>;

/// How a batch is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// One target at a time in input order, pausing `delay` between targets
    Serial { delay: Duration },
    /// Up to `max_concurrent` targets in flight; completion order is arbitrary
    Concurrent { max_concurrent: usize },
}

impl Default for BatchMode {
    fn default() -> Self {
        BatchMode::Concurrent { max_concurrent: 5 }
    }
}

/// One finished target, as reported to a [`ProgressObserver`]
#[derive(Debug, Clone, Copy)]
pub struct Completion<'a> {
    pub target: &'a str,
    /// `None` when the target succeeded
    pub error: Option<&'a FetchError>,
    /// Targets finished so far, this one included
    pub completed: usize,
    pub total: usize,
}

/// Receives batch progress events.
///
/// `on_complete` is called exactly once per target, success or failure.
pub trait ProgressObserver: Send + Sync {
    fn on_start(&self, _total: usize) {}

    fn on_complete(&self, event: &Completion<'_>);

    fn on_finish(&self) {}
}

/// Per-target outcomes of a batch
#[derive(Debug, Clone)]
pub struct BatchResults<V> {
    targets: Vec<String>,
    outcomes: HashMap<String, Result<V, FetchError>>,
}

impl<V> BatchResults<V> {
    fn new(targets: Vec<String>) -> Self {
        Self {
            outcomes: HashMap::with_capacity(targets.len()),
            targets,
        }
    }

    pub fn get(&self, target: &str) -> Option<&Result<V, FetchError>> {
        self.outcomes.get(target)
    }

    /// Outcomes in the order the targets were requested
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Result<V, FetchError>)> {
        self.targets
            .iter()
            .filter_map(|t| self.outcomes.get(t).map(|outcome| (t.as_str(), outcome)))
    }

    pub fn successes(&self) -> impl Iterator<Item = (&str, &V)> {
        self.iter().filter_map(|(t, r)| r.as_ref().ok().map(|v| (t, v)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &FetchError)> {
        self.iter().filter_map(|(t, r)| r.as_ref().err().map(|e| (t, e)))
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.values().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.values().filter(|r| r.is_err()).count()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn into_map(self) -> HashMap<String, Result<V, FetchError>> {
        self.outcomes
    }
}

fn validate(targets: &[String], mode: BatchMode) -> Result<(), FetchError> {
    if targets.is_empty() {
        return Err(FetchError::InvalidParameter(
            "Batch needs at least one target".to_string(),
        ));
    }

    if let BatchMode::Concurrent { max_concurrent: 0 } = mode {
        return Err(FetchError::InvalidParameter(
            "Concurrency must be at least 1".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(targets.len());
    for target in targets {
        if !seen.insert(target.as_str()) {
            return Err(FetchError::InvalidParameter(format!(
                "Duplicate batch target '{}'",
                target
            )));
        }
    }

    Ok(())
}

/// Run `fetch` once per target under `mode`.
///
/// Errors only for malformed input: no targets, a concurrency of zero, or a
/// repeated target. Every target's own failure lands in the results.
pub async fn run_batch<V, F, Fut>(
    targets: Vec<String>,
    mode: BatchMode,
    observer: Option<&dyn ProgressObserver>,
    fetch: F,
) -> Result<BatchResults<V>, FetchError>
where
    V: Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
{
    validate(&targets, mode)?;

    let total = targets.len();
    let mut results = BatchResults::new(targets.clone());
    let mut completed = 0;

    if let Some(obs) = observer {
        obs.on_start(total);
    }

    let mut record = |target: String, outcome: Result<V, FetchError>| {
        completed += 1;
        if let Err(e) = &outcome {
            debug!("Batch target {} failed: {}", target, e);
        }
        if let Some(obs) = observer {
            obs.on_complete(&Completion {
                target: &target,
                error: outcome.as_ref().err(),
                completed,
                total,
            });
        }
        results.outcomes.insert(target, outcome);
    };

    match mode {
        BatchMode::Serial { delay } => {
            debug!("Running {} targets serially with {:?} delay", total, delay);

            let mut pending = targets.into_iter().peekable();
            while let Some(target) = pending.next() {
                let outcome = fetch(target.clone()).await;
                record(target, outcome);

                if !delay.is_zero() && pending.peek().is_some() {
                    tokio::time::sleep(delay).await;
                }
            }
        }
        BatchMode::Concurrent { max_concurrent } => {
            debug!(
                "Running {} targets with max {} concurrent",
                total, max_concurrent
            );

            let mut futures: FuturesUnordered<TargetFuture<V>> = FuturesUnordered::new();
            let mut pending = targets.into_iter();

            let make_future = |target: String, f: &F| -> TargetFuture<V> {
                let fut = f(target.clone());
                Box::pin(async move { (target, fut.await) })
            };

            // Seed initial batch up to max_concurrent
            for target in pending.by_ref().take(max_concurrent) {
                futures.push(make_future(target, &fetch));
            }

            // Admit the next target as each one finishes
            while let Some((target, outcome)) = futures.next().await {
                record(target, outcome);

                if let Some(next) = pending.next() {
                    debug!("Admitting batch target {}", next);
                    futures.push(make_future(next, &fetch));
                }
            }
        }
    }

    if let Some(obs) = observer {
        obs.on_finish();
    }

    Ok(results)
}

impl<T: TrendsTransport + 'static> TrendsFetcher<T> {
    /// Fetch the trending feed for every region in `geos`.
    ///
    /// Region codes are trimmed and uppercased first, so `us` and `US` count
    /// as the same target.
    pub async fn fetch_feed_batch(
        &self,
        geos: &[String],
        params: &FeedParams,
        mode: BatchMode,
        observer: Option<&dyn ProgressObserver>,
        use_cache: bool,
    ) -> Result<BatchResults<Vec<TrendRecord>>, FetchError> {
        let targets = geos.iter().map(|g| g.trim().to_uppercase()).collect();

        run_batch(targets, mode, observer, |geo| {
            let fetcher = self.clone();
            let params = params.for_geo(geo);
            async move { fetcher.fetch_feed(&params, use_cache).await }
        })
        .await
    }

    /// Fetch an explore export for each search term in `queries` separately.
    pub async fn fetch_explore_batch(
        &self,
        queries: &[String],
        params: &ExploreParams,
        mode: BatchMode,
        observer: Option<&dyn ProgressObserver>,
        use_cache: bool,
    ) -> Result<BatchResults<ExploreSections>, FetchError> {
        let targets = queries.iter().map(|q| q.trim().to_string()).collect();

        run_batch(targets, mode, observer, |query| {
            let fetcher = self.clone();
            let params = params.for_query(query);
            async move { fetcher.fetch_explore(&params, use_cache).await }
        })
        .await
    }
}
