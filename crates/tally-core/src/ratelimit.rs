//! # Fixed-Window Rate Limiter
//!
//! Per-client request counters with a one-minute fixed window.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Fixed Window Counting                               │
//! │                                                                         │
//! │  minute 1041  │  minute 1042  │  minute 1043                            │
//! │  ───────────  │  ───────────  │  ───────────                            │
//! │  ▲▲▲ count=3  │  ▲ count=1    │  ▲▲ count=2                             │
//! │               │               │                                         │
//! │  Counter is REPLACED (not incremented) when the wall-clock minute       │
//! │  changes. Within a minute, check-and-increment is atomic per key.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One counter exists per `(client, bucket)` pair. The map is a sharded
//! concurrent map: the entry guard holds the shard lock for exactly the
//! reset-or-increment step, so two concurrent requests for the same key
//! cannot both observe "under limit" and slip past the threshold, while
//! requests for different keys do not contend.
//!
//! Counters are never evicted; one entry per distinct client address for
//! the process lifetime is an accepted trade-off for a local backend.

use chrono::Utc;
use dashmap::DashMap;

// =============================================================================
// Buckets & Limits
// =============================================================================

/// Endpoint bucket the request falls into.
///
/// Authentication endpoints get the strict limit (brute-force surface),
/// everything else shares the general limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateBucket {
    Auth,
    General,
}

/// Requests allowed per minute per client, by bucket.
#[derive(Debug, Clone, Copy)]
pub struct RateLimits {
    pub auth_per_minute: u32,
    pub general_per_minute: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        RateLimits {
            auth_per_minute: 10,
            general_per_minute: 120,
        }
    }
}

impl RateLimits {
    /// Limit for a bucket.
    #[inline]
    pub fn limit(&self, bucket: RateBucket) -> u32 {
        match bucket {
            RateBucket::Auth => self.auth_per_minute,
            RateBucket::General => self.general_per_minute,
        }
    }
}

// =============================================================================
// Limiter
// =============================================================================

/// One counter: the minute it belongs to and the requests seen in it.
#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    window_minute: i64,
    count: u32,
}

/// Fixed-window request limiter keyed by `(client, bucket)`.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    limits: RateLimits,
    counters: DashMap<(String, RateBucket), WindowCounter>,
}

impl FixedWindowLimiter {
    /// Creates a limiter with the given per-bucket limits.
    pub fn new(limits: RateLimits) -> Self {
        FixedWindowLimiter {
            limits,
            counters: DashMap::new(),
        }
    }

    /// Checks a request against the current wall-clock minute.
    ///
    /// ## Returns
    /// * `true` - request is within the limit, let it through
    /// * `false` - limit exceeded for this window, reject with 429
    pub fn check(&self, client: &str, bucket: RateBucket) -> bool {
        self.check_at(client, bucket, Utc::now().timestamp() / 60)
    }

    /// Checks a request against an explicit minute epoch.
    ///
    /// The clock is a parameter so tests can drive window rollover
    /// without sleeping.
    pub fn check_at(&self, client: &str, bucket: RateBucket, minute: i64) -> bool {
        let limit = self.limits.limit(bucket);

        // The entry guard pins this key's shard: reset-or-increment runs
        // atomically per key.
        let mut counter = self
            .counters
            .entry((client.to_string(), bucket))
            .or_insert(WindowCounter {
                window_minute: minute,
                count: 0,
            });

        if counter.window_minute != minute {
            // Minute boundary crossed: replace, don't increment.
            counter.window_minute = minute;
            counter.count = 0;
        }

        counter.count += 1;
        counter.count <= limit
    }

    /// Number of tracked `(client, bucket)` keys. Diagnostics only.
    pub fn tracked_keys(&self) -> usize {
        self.counters.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(auth: u32, general: u32) -> FixedWindowLimiter {
        FixedWindowLimiter::new(RateLimits {
            auth_per_minute: auth,
            general_per_minute: general,
        })
    }

    /// limit=2: allowed, allowed, rejected within one minute; allowed
    /// again the next minute.
    #[test]
    fn test_limit_and_window_rollover() {
        let limiter = limiter(2, 2);

        assert!(limiter.check_at("10.0.0.1", RateBucket::General, 1000));
        assert!(limiter.check_at("10.0.0.1", RateBucket::General, 1000));
        assert!(!limiter.check_at("10.0.0.1", RateBucket::General, 1000));

        // Next minute: fresh counter.
        assert!(limiter.check_at("10.0.0.1", RateBucket::General, 1001));
    }

    #[test]
    fn test_independent_clients() {
        let limiter = limiter(2, 1);

        assert!(limiter.check_at("10.0.0.1", RateBucket::General, 1000));
        // A different client is a different counter.
        assert!(limiter.check_at("10.0.0.2", RateBucket::General, 1000));
        assert!(!limiter.check_at("10.0.0.1", RateBucket::General, 1000));
    }

    #[test]
    fn test_buckets_do_not_share_counters() {
        let limiter = limiter(1, 1);

        assert!(limiter.check_at("10.0.0.1", RateBucket::Auth, 1000));
        assert!(limiter.check_at("10.0.0.1", RateBucket::General, 1000));
        assert!(!limiter.check_at("10.0.0.1", RateBucket::Auth, 1000));
        assert!(!limiter.check_at("10.0.0.1", RateBucket::General, 1000));
    }

    #[test]
    fn test_auth_bucket_is_stricter() {
        let limiter = FixedWindowLimiter::new(RateLimits::default());

        for _ in 0..10 {
            assert!(limiter.check_at("10.0.0.1", RateBucket::Auth, 1000));
        }
        assert!(!limiter.check_at("10.0.0.1", RateBucket::Auth, 1000));

        // General bucket for the same client still has headroom.
        assert!(limiter.check_at("10.0.0.1", RateBucket::General, 1000));
    }

    #[test]
    fn test_stale_window_is_replaced_not_resumed() {
        let limiter = limiter(2, 2);

        assert!(limiter.check_at("c", RateBucket::General, 1000));
        assert!(limiter.check_at("c", RateBucket::General, 1000));

        // Two minutes later the old count is irrelevant.
        assert!(limiter.check_at("c", RateBucket::General, 1002));
        assert!(limiter.check_at("c", RateBucket::General, 1002));
        assert!(!limiter.check_at("c", RateBucket::General, 1002));
    }

    #[test]
    fn test_concurrent_checks_respect_limit() {
        use std::sync::Arc;
        use std::thread;

        let limiter = Arc::new(limiter(0, 50));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let limiter = Arc::clone(&limiter);
            handles.push(thread::spawn(move || {
                let mut allowed = 0u32;
                for _ in 0..25 {
                    if limiter.check_at("shared", RateBucket::General, 1000) {
                        allowed += 1;
                    }
                }
                allowed
            }));
        }

        let allowed: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        // 8 × 25 = 200 attempts against a limit of 50: exactly 50 pass.
        assert_eq!(allowed, 50);
    }
}
