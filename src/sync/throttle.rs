//! # Upstream Throttle
//!
//! The provider blocks clients that crawl too fast, so the synchronizer pauses
//! between cells. The pause length comes from a [`RateLimitPolicy`] and the
//! pause itself goes through a [`Sleeper`], which tests replace with one that
//! only records the requested durations.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Random pause of `min` plus up to `jitter`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub min: Duration,
    pub jitter: Duration,
}

impl RateLimitPolicy {
    pub fn new(min: Duration, jitter: Duration) -> Self {
        Self { min, jitter }
    }

    /// No pause at all
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draw the next pause, uniformly within `[min, min + jitter]`
    pub fn next_delay(&self) -> Duration {
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        if jitter_ms == 0 {
            return self.min;
        }
        self.min + Duration::from_millis(fastrand::u64(0..=jitter_ms))
    }

    pub fn max_delay(&self) -> Duration {
        self.min + self.jitter
    }
}

/// Something that can wait
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock pause
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested pauses without waiting
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    calls: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Duration> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_stays_within_bounds() {
        let policy = RateLimitPolicy::new(Duration::from_secs(5), Duration::from_secs(10));
        for _ in 0..500 {
            let delay = policy.next_delay();
            assert!(delay >= Duration::from_secs(5));
            assert!(delay <= Duration::from_secs(15));
        }
    }

    #[test]
    fn test_zero_jitter_is_exact() {
        let policy = RateLimitPolicy::new(Duration::from_millis(250), Duration::ZERO);
        assert_eq!(policy.next_delay(), Duration::from_millis(250));
        assert_eq!(RateLimitPolicy::disabled().next_delay(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_recording_sleeper_does_not_wait() {
        let sleeper = RecordingSleeper::new();
        let started = std::time::Instant::now();

        sleeper.sleep(Duration::from_secs(3600)).await;
        sleeper.sleep(Duration::from_secs(1)).await;

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(
            sleeper.calls(),
            vec![Duration::from_secs(3600), Duration::from_secs(1)]
        );
    }

    #[tokio::test]
    async fn test_tokio_sleeper_waits() {
        let started = std::time::Instant::now();
        TokioSleeper.sleep(Duration::from_millis(20)).await;
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
