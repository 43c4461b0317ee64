//! Per-endpoint rate limiting for the upstream trends service
//!
//! Limiting is reactive: requests flow freely until the service answers with
//! a rate-limit status, after which every later request to that endpoint
//! waits for a governor permit.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;

/// Upstream endpoints with independent limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// Trending RSS feed
    Feed,
    /// Explore section export
    Export,
}

impl EndpointKind {
    pub const ALL: [EndpointKind; 2] = [EndpointKind::Feed, EndpointKind::Export];
}

/// Rate limiter state for a single endpoint.
pub struct EndpointRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    active: AtomicBool,
    kind: EndpointKind,
}

impl EndpointRateLimiter {
    /// Create a dormant limiter allowing `per_second` requests once active.
    pub fn new(kind: EndpointKind, per_second: u32) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN));

        Self {
            limiter: RateLimiter::direct(quota),
            active: AtomicBool::new(false),
            kind,
        }
    }

    /// Activate rate limiting for this endpoint.
    pub fn activate(&self) {
        let was_active = self.active.swap(true, Ordering::SeqCst);
        if !was_active {
            debug!("Rate limiting activated for {:?}", self.kind);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Wait for permission if rate limiting is active.
    pub async fn wait_if_active(&self) {
        if self.is_active() {
            debug!("Waiting for rate limiter {:?}", self.kind);
            self.limiter.until_ready().await;
        }
    }
}

/// One limiter per endpoint kind.
pub struct RateLimiterSet {
    limiters: HashMap<EndpointKind, EndpointRateLimiter>,
}

impl RateLimiterSet {
    pub fn new(per_second: u32) -> Self {
        let limiters = EndpointKind::ALL
            .into_iter()
            .map(|kind| (kind, EndpointRateLimiter::new(kind, per_second)))
            .collect();

        Self { limiters }
    }

    /// Wait for rate limit permission for an endpoint (if active).
    pub async fn wait_for(&self, kind: EndpointKind) {
        if let Some(limiter) = self.limiters.get(&kind) {
            limiter.wait_if_active().await;
        }
    }

    /// Activate rate limiting for an endpoint (called on a rate-limit status).
    pub fn activate(&self, kind: EndpointKind) {
        if let Some(limiter) = self.limiters.get(&kind) {
            limiter.activate();
        }
    }

    pub fn is_active(&self, kind: EndpointKind) -> bool {
        self.limiters.get(&kind).is_some_and(|l| l.is_active())
    }
}
