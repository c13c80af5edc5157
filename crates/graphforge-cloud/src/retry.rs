//! Bounded fixed-interval polling
//!
//! Cloud-side waits (boot, power-off, snapshot) have roughly known, bounded
//! latencies, so every wait loop here is a fixed interval times a fixed
//! attempt budget rather than exponential backoff. Exhausting the budget is
//! an explicit, named outcome, not a loop fallthrough.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Outcome of a bounded poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll<T> {
    /// The condition was met within budget
    Ready(T),
    /// The attempt budget was exhausted without the condition being met
    Exhausted { attempts: u32 },
}

impl<T> Poll<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Poll::Ready(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Poll::Ready(value) => Some(value),
            Poll::Exhausted { .. } => None,
        }
    }
}

/// Poll budget: attempts and the pause between them.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollConfig {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Total wall-clock budget this config allows for
    pub fn deadline(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

/// 30 attempts at 10 second intervals, the budget used for server boot,
/// power-off and snapshot waits (~5 minutes).
impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(10),
        }
    }
}

/// Run `op` until it yields `Some(value)` or the budget is exhausted.
///
/// `op` returning `None` means "not yet"; the combinator sleeps for the
/// configured interval and tries again. No sleep happens after the final
/// attempt.
pub async fn poll_until<F, Fut, T>(config: PollConfig, mut op: F) -> Poll<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for attempt in 0..config.max_attempts {
        if let Some(value) = op().await {
            return Poll::Ready(value);
        }
        if attempt + 1 < config.max_attempts {
            sleep(config.interval).await;
        }
    }

    tracing::debug!(
        "poll budget exhausted after {} attempts",
        config.max_attempts
    );
    Poll::Exhausted {
        attempts: config.max_attempts,
    }
}
