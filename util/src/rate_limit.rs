//! Fixed-window request budgeting keyed by caller address.
//!
//! Every ingestion endpoint consults this limiter before touching the store.
//! The window is frequency-amnesic: once the reset time passes, the key starts
//! over at a count of one no matter how noisy it was in the previous window.
//! The clock is injectable so window-boundary behavior can be tested without
//! sleeping.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Source of monotonic time for the limiter.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Default clock backed by `Instant::now`.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// One counting window for a single key.
struct Window {
    count: u32,
    reset_at: Instant,
}

/// Outcome of a single limiter consultation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after_seconds: u64 },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

/// Per-key fixed-window counter shared across all request handlers.
///
/// The map is sharded (`DashMap`), so concurrent increments and the periodic
/// eviction sweep do not contend on a single lock.
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    max_requests: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_clock(max_requests, window, Arc::new(SystemClock))
    }

    pub fn with_clock(max_requests: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
            clock,
        }
    }

    /// Counts one request against `key` and decides whether it may proceed.
    ///
    /// The first request for a key opens a window with a count of one. Later
    /// requests increment the counter; a post-increment count above the budget
    /// is rejected without resetting the window. Once the reset time has
    /// passed, the key restarts with a fresh window.
    pub fn check(&self, key: &str) -> RateDecision {
        let now = self.clock.now();
        let mut entry = self.windows.entry(key.to_owned()).or_insert_with(|| Window {
            count: 0,
            reset_at: now + self.window,
        });

        if now >= entry.reset_at {
            entry.count = 1;
            entry.reset_at = now + self.window;
            return RateDecision::Allowed {
                remaining: self.max_requests - 1,
            };
        }

        entry.count += 1;
        if entry.count > self.max_requests {
            let retry_after = entry.reset_at.saturating_duration_since(now).as_secs().max(1);
            return RateDecision::Limited {
                retry_after_seconds: retry_after,
            };
        }

        RateDecision::Allowed {
            remaining: self.max_requests - entry.count,
        }
    }

    /// Drops every expired window. Safe to run while requests are in flight;
    /// `retain` locks one shard at a time.
    pub fn evict_expired(&self) {
        let now = self.clock.now();
        self.windows.retain(|_, window| now < window.reset_at);
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}
