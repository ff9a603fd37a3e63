//! Token bucket shared by every request of one import run.
//!
//! Refill happens in whole intervals: each full `interval` since the last
//! refill adds `tokens_per_interval` tokens, capped at `capacity`. A caller
//! that finds the bucket empty sleeps until the next interval boundary.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::error::RateConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateConfig {
    pub tokens_per_interval: u32,
    pub interval: Duration,
    /// Bucket size; `None` means `tokens_per_interval`.
    pub capacity: Option<u32>,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self::per_interval(5, Duration::from_secs(1))
    }
}

impl RateConfig {
    pub fn per_interval(tokens_per_interval: u32, interval: Duration) -> Self {
        Self {
            tokens_per_interval,
            interval,
            capacity: None,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn capacity(&self) -> u32 {
        self.capacity.unwrap_or(self.tokens_per_interval)
    }

    pub fn validate(&self) -> Result<(), RateConfigError> {
        if self.tokens_per_interval == 0 {
            return Err(RateConfigError::ZeroTokens);
        }
        if self.interval.is_zero() {
            return Err(RateConfigError::ZeroInterval);
        }
        if self.capacity() < self.tokens_per_interval {
            return Err(RateConfigError::CapacityTooSmall {
                capacity: self.capacity(),
                tokens_per_interval: self.tokens_per_interval,
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
struct BucketState {
    tokens: u32,
    last_refill: Instant,
}

#[derive(Debug)]
pub struct TokenBucket {
    config: RateConfig,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// A full bucket for `config`.
    pub fn new(config: RateConfig) -> Result<Self, RateConfigError> {
        config.validate()?;
        Ok(Self {
            state: Mutex::new(BucketState {
                tokens: config.capacity(),
                last_refill: Instant::now(),
            }),
            config,
        })
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        let interval = self.config.interval;
        let elapsed = now.saturating_duration_since(state.last_refill);
        let intervals = elapsed.as_nanos() / interval.as_nanos();
        if intervals == 0 {
            return;
        }

        let capacity = self.config.capacity();
        let added = intervals.saturating_mul(u128::from(self.config.tokens_per_interval));
        let tokens = (u128::from(state.tokens) + added).min(u128::from(capacity));
        state.tokens = u32::try_from(tokens).unwrap_or(capacity);

        // Keep the interval phase while tokens are still being earned; once
        // the bucket is full the phase no longer matters.
        match u32::try_from(intervals) {
            Ok(n) if state.tokens < capacity => state.last_refill += interval * n,
            _ => state.last_refill = now,
        }
    }

    /// Wait for a token and consume it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                self.refill(&mut state, now);
                if state.tokens > 0 {
                    state.tokens -= 1;
                    return;
                }
                (state.last_refill + self.config.interval).saturating_duration_since(now)
            };
            debug!(wait_ms = wait.as_millis() as u64, "rate limit reached, waiting");
            tokio::time::sleep(wait).await;
        }
    }

    /// Consume a token if one is available right now.
    pub fn try_acquire(&self) -> bool {
        let Ok(mut state) = self.state.try_lock() else {
            return false;
        };
        self.refill(&mut state, Instant::now());
        if state.tokens == 0 {
            return false;
        }
        state.tokens -= 1;
        true
    }
}
