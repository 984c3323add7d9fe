//! Fixed-window call quota for the upstream API.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Calls allowed per window
    pub quota: u32,
    pub window: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            quota: 10,
            window: Duration::from_secs(60),
        }
    }
}

/// Counts calls in the current window. Once the quota is used up the next
/// `acquire` sleeps a full window and starts a new count; it never reads the
/// server's rate-limit headers.
#[derive(Debug)]
pub struct RateLimiter {
    quota: u32,
    window: Duration,
    calls: u32,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Result<Self, ConfigError> {
        if config.quota == 0 {
            return Err(ConfigError::ZeroQuota);
        }
        Ok(Self {
            quota: config.quota,
            window: config.window,
            calls: 0,
        })
    }

    /// Wait until the quota allows another call, then count it.
    pub async fn acquire(&mut self) {
        if self.calls >= self.quota {
            info!(
                "Rate limit of {} calls reached, waiting {:?}",
                self.quota, self.window
            );
            sleep(self.window).await;
            self.calls = 0;
        }
        self.calls += 1;
        debug!("Call {}/{} in current window", self.calls, self.quota);
    }

    pub fn calls_in_window(&self) -> u32 {
        self.calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn limiter(quota: u32) -> RateLimiter {
        RateLimiter::new(RateLimiterConfig {
            quota,
            window: Duration::from_secs(60),
        })
        .unwrap()
    }

    #[test]
    fn zero_quota_is_rejected() {
        let config = RateLimiterConfig {
            quota: 0,
            window: Duration::from_secs(1),
        };
        assert!(matches!(RateLimiter::new(config), Err(ConfigError::ZeroQuota)));
    }

    #[tokio::test(start_paused = true)]
    async fn third_call_passes_fourth_waits_for_window() {
        let mut limiter = limiter(3);
        limiter.acquire().await;
        limiter.acquire().await;

        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.calls_in_window(), 3);

        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(60));
        assert_eq!(limiter.calls_in_window(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn counter_resets_after_each_stall() {
        let mut limiter = limiter(2);
        let start = Instant::now();
        for _ in 0..6 {
            limiter.acquire().await;
        }
        // Calls 3 and 5 each opened a new window.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(120));
        assert!(elapsed < Duration::from_secs(180));
    }
}
