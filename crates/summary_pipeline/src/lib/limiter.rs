use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::Error;

/// Per-identity token bucket guarding the summarize pipeline.
///
/// Constructed once at process start and injected into the request path.
/// Buckets are created lazily on first admission and refilled from elapsed
/// wall-clock time; the map's entry API serializes each read-modify-write,
/// so two concurrent requests for the same identity cannot both observe a
/// stale token count.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<String, Bucket>,
    capacity: f64,
    refill_rate: f64,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    pub const DEFAULT_CAPACITY: f64 = 5.0;
    pub const DEFAULT_REFILL_RATE: f64 = 5.0;

    pub fn new(capacity: f64, refill_rate: f64) -> Self {
        RateLimiter {
            buckets: DashMap::new(),
            capacity,
            refill_rate,
        }
    }

    /// Admit one request for `identity`, or fail with [`Error::RateLimited`]
    /// carrying the seconds until a token becomes available.
    pub fn admit(&self, identity: &str) -> Result<(), Error> {
        self.admit_at(identity, Instant::now())
    }

    pub(crate) fn admit_at(&self, identity: &str, now: Instant) -> Result<(), Error> {
        let mut entry = self
            .buckets
            .entry(identity.to_string())
            .or_insert_with(|| Bucket {
                tokens: self.capacity,
                last_refill: now,
            });
        let bucket = entry.value_mut();

        let elapsed = now.saturating_duration_since(bucket.last_refill);
        bucket.tokens =
            (bucket.tokens + elapsed.as_secs_f64() * self.refill_rate).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            let retry_after_seconds = (1.0 - bucket.tokens) / self.refill_rate;
            tracing::debug!(identity, retry_after_seconds, "Request rate limited");
            Err(Error::RateLimited {
                retry_after_seconds,
            })
        }
    }

    /// Drop buckets that have not been touched for `max_idle`. The key space
    /// is bounded by registered users, but long-running processes should
    /// sweep this periodically to keep memory flat.
    pub fn evict_idle(&self, max_idle: Duration) {
        let now = Instant::now();
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.last_refill) < max_idle);
        let evicted = before - self.buckets.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle rate-limit buckets");
        }
    }

    pub fn tracked_identities(&self) -> usize {
        self.buckets.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        RateLimiter::new(Self::DEFAULT_CAPACITY, Self::DEFAULT_REFILL_RATE)
    }
}
