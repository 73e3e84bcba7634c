//! Per-key sliding-window rate limiter.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::error::ApiError;

/// Length of the sliding window. Fixed so that `Retry-After` and the
/// minute-boundary reset always describe the same window.
pub const RATE_WINDOW: Duration = Duration::from_secs(60);

/// Quota left after an admitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateStatus {
    /// Window capacity.
    pub limit: usize,
    /// Requests left in the current window.
    pub remaining: usize,
    /// Epoch second of the next minute boundary.
    pub reset_epoch: i64,
}

/// Sliding-window limiter keyed by API key.
///
/// Each key keeps the instants of its admitted requests. Instants older than
/// the window are evicted on every check; a request is rejected when the
/// window already holds `capacity` entries.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    capacity: usize,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    /// Create a limiter admitting `capacity` requests per [`RATE_WINDOW`].
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Admit or reject a request for `key` now.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RateLimited`] when the window is full.
    pub fn check(&self, key: &str) -> Result<RateStatus, ApiError> {
        self.check_at(key, Instant::now(), Utc::now())
    }

    /// Admit or reject a request for `key` at the given instant.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RateLimited`] when the window is full.
    pub fn check_at(&self, key: &str, now: Instant, wall: DateTime<Utc>) -> Result<RateStatus, ApiError> {
        let reset_epoch = next_minute_boundary(wall);
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = hits.entry(key.to_string()).or_default();

        while entries
            .front()
            .is_some_and(|ts| now.saturating_duration_since(*ts) > RATE_WINDOW)
        {
            entries.pop_front();
        }

        if entries.len() >= self.capacity {
            return Err(ApiError::RateLimited {
                retry_after_secs: RATE_WINDOW.as_secs(),
                reset_epoch,
            });
        }

        entries.push_back(now);
        Ok(RateStatus {
            limit: self.capacity,
            remaining: self.capacity - entries.len(),
            reset_epoch,
        })
    }
}

/// Epoch second of the minute boundary following `wall`.
#[must_use]
pub fn next_minute_boundary(wall: DateTime<Utc>) -> i64 {
    let secs = wall.timestamp();
    secs - secs.rem_euclid(60) + 60
}
