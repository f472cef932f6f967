//! Fixed-window request counters held in process memory.
//!
//! Each key owns one window that opens on its first request and lasts
//! `window_secs`. Counters are per process, so replicas enforce separate
//! quotas.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::config::RateLimitConfig;
use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};

/// Tracked keys above which expired windows are swept on insert.
const SWEEP_THRESHOLD: usize = 4096;

/// One key's counter.
#[derive(Debug, Clone, Copy)]
struct Window {
    opened_at: u64,
    count: u32,
}

impl Window {
    fn open(now: u64) -> Self {
        Self {
            opened_at: now,
            count: 0,
        }
    }

    fn closes_at(&self, window_secs: u32) -> u64 {
        self.opened_at + u64::from(window_secs)
    }

    fn is_expired(&self, now: u64, window_secs: u32) -> bool {
        now >= self.closes_at(window_secs)
    }
}

/// Rate limiter for a single server process.
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<RateLimitKey, Window>>,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    fn limit_for(&self, scope: RateLimitScope) -> u32 {
        match scope {
            RateLimitScope::Global => self.config.global_max_requests,
            RateLimitScope::Ip => self.config.max_requests,
        }
    }

    fn denial_message(&self, scope: RateLimitScope, retry_after_secs: u32) -> String {
        match scope {
            RateLimitScope::Ip => self.config.message.clone(),
            RateLimitScope::Global => format!(
                "Server is receiving too many requests. Retry after {} seconds.",
                retry_after_secs
            ),
        }
    }

    async fn check_at(&self, key: &RateLimitKey, now: u64) -> RateLimitResult {
        let window_secs = self.config.window_secs;
        let scope = key.scope();
        let limit = self.limit_for(scope);

        let mut windows = self.windows.lock().await;
        if windows.len() >= SWEEP_THRESHOLD && !windows.contains_key(key) {
            windows.retain(|_, window| !window.is_expired(now, window_secs));
        }

        let window = windows
            .entry(key.clone())
            .or_insert_with(|| Window::open(now));
        if window.is_expired(now, window_secs) {
            *window = Window::open(now);
        }

        let closes_at = window.closes_at(window_secs);
        if window.count >= limit {
            let retry_after_secs = u32::try_from(closes_at.saturating_sub(now))
                .unwrap_or(u32::MAX)
                .max(1);
            return RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs,
                scope,
                message: self.denial_message(scope, retry_after_secs),
            });
        }

        window.count += 1;
        RateLimitResult::Allowed(RateLimitStatus {
            limit,
            remaining: limit - window.count,
            reset_at: Timestamp::from_unix_secs(closes_at),
        })
    }

    async fn status_at(&self, key: &RateLimitKey, now: u64) -> RateLimitStatus {
        let window_secs = self.config.window_secs;
        let limit = self.limit_for(key.scope());

        let window = self
            .windows
            .lock()
            .await
            .get(key)
            .copied()
            .filter(|window| !window.is_expired(now, window_secs))
            .unwrap_or_else(|| Window::open(now));

        RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(window.count),
            reset_at: Timestamp::from_unix_secs(window.closes_at(window_secs)),
        }
    }

    #[cfg(test)]
    async fn tracked_keys(&self) -> usize {
        self.windows.lock().await.len()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        Ok(self.check_at(key, Timestamp::now().as_unix_secs()).await)
    }

    async fn status(&self, key: &RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        Ok(self.status_at(key, Timestamp::now().as_unix_secs()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_000;

    fn limiter_with(max_requests: u32) -> InMemoryRateLimiter {
        InMemoryRateLimiter::new(RateLimitConfig {
            max_requests,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn hundred_and_first_request_is_denied_with_configured_message() {
        let limiter = InMemoryRateLimiter::with_defaults();
        let key = RateLimitKey::ip("192.168.1.1");

        for i in 0..100 {
            assert!(
                limiter.check_at(&key, T0).await.is_allowed(),
                "request {} should pass",
                i + 1
            );
        }

        match limiter.check_at(&key, T0 + 60).await {
            RateLimitResult::Denied(denied) => {
                assert_eq!(denied.limit, 100);
                assert_eq!(denied.scope, RateLimitScope::Ip);
                assert_eq!(denied.retry_after_secs, 540);
                assert_eq!(
                    denied.message,
                    "Too many requests from this IP, please try again after 10 minutes"
                );
            }
            RateLimitResult::Allowed(_) => panic!("expected denial"),
        }
    }

    #[tokio::test]
    async fn remaining_counts_down_to_zero() {
        let limiter = limiter_with(3);
        let key = RateLimitKey::ip("10.0.0.1");

        for expected in [2, 1, 0] {
            match limiter.check_at(&key, T0).await {
                RateLimitResult::Allowed(status) => {
                    assert_eq!(status.remaining, expected);
                    assert_eq!(status.reset_at.as_unix_secs(), T0 + 600);
                }
                RateLimitResult::Denied(_) => panic!("denied too early"),
            }
        }
    }

    #[tokio::test]
    async fn status_does_not_consume_quota() {
        let limiter = limiter_with(10);
        let key = RateLimitKey::ip("10.0.0.1");

        assert_eq!(limiter.status_at(&key, T0).await.remaining, 10);
        for _ in 0..3 {
            limiter.check_at(&key, T0).await;
        }
        assert_eq!(limiter.status_at(&key, T0).await.remaining, 7);
        assert_eq!(limiter.status_at(&key, T0).await.remaining, 7);
    }

    #[tokio::test]
    async fn quota_returns_when_window_closes() {
        let limiter = limiter_with(2);
        let key = RateLimitKey::ip("10.0.0.3");

        limiter.check_at(&key, T0).await;
        limiter.check_at(&key, T0 + 1).await;
        assert!(limiter.check_at(&key, T0 + 599).await.is_denied());

        assert!(limiter.check_at(&key, T0 + 600).await.is_allowed());
        assert_eq!(limiter.status_at(&key, T0 + 601).await.remaining, 1);
        assert_eq!(limiter.status_at(&key, T0 + 1200).await.remaining, 2);
    }

    #[tokio::test]
    async fn global_bucket_has_its_own_limit_and_message() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig {
            global_max_requests: 3,
            ..Default::default()
        });
        let key = RateLimitKey::global();

        for _ in 0..3 {
            assert!(limiter.check_at(&key, T0).await.is_allowed());
        }

        match limiter.check_at(&key, T0).await {
            RateLimitResult::Denied(denied) => {
                assert_eq!(denied.scope, RateLimitScope::Global);
                assert_eq!(
                    denied.message,
                    "Server is receiving too many requests. Retry after 600 seconds."
                );
            }
            RateLimitResult::Allowed(_) => panic!("expected denial"),
        }
    }

    #[tokio::test]
    async fn ips_are_counted_separately() {
        let limiter = limiter_with(1);
        let first = RateLimitKey::ip("1.1.1.1");
        let second = RateLimitKey::ip("2.2.2.2");

        limiter.check_at(&first, T0).await;
        assert!(limiter.check_at(&first, T0).await.is_denied());
        assert!(limiter.check_at(&second, T0).await.is_allowed());
    }

    #[tokio::test]
    async fn expired_windows_are_swept_once_many_keys_are_tracked() {
        let limiter = limiter_with(5);
        for i in 0..SWEEP_THRESHOLD {
            limiter
                .check_at(&RateLimitKey::ip(&format!("10.0.{}.{}", i / 256, i % 256)), T0)
                .await;
        }
        assert_eq!(limiter.tracked_keys().await, SWEEP_THRESHOLD);

        limiter.check_at(&RateLimitKey::ip("192.0.2.1"), T0 + 600).await;
        assert_eq!(limiter.tracked_keys().await, 1);
    }

    #[tokio::test]
    async fn check_through_port_uses_wall_clock() {
        let limiter = limiter_with(1);
        let key = RateLimitKey::ip("203.0.113.9");

        assert!(limiter.check(&key).await.unwrap().is_allowed());
        assert!(limiter.check(&key).await.unwrap().is_denied());
        assert_eq!(limiter.status(&key).await.unwrap().remaining, 0);
    }
}
