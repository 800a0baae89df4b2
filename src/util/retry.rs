use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, FixedInterval};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
    pub backoff: u32,
}

impl RetryPolicy {
    /// Image upload: 5 tries, 5 seconds apart.
    pub const UPLOAD: RetryPolicy = RetryPolicy {
        attempts: 5,
        delay: Duration::from_secs(5),
        backoff: 1,
    };

    /// Whole send: 5 tries, waiting 10, 20, 40 then 80 seconds.
    pub const SEND: RetryPolicy = RetryPolicy {
        attempts: 5,
        delay: Duration::from_secs(10),
        backoff: 2,
    };

    pub fn new(attempts: u32, delay: Duration, backoff: u32) -> Self {
        Self {
            attempts,
            delay,
            backoff,
        }
    }

    /// Unbounded wait sequence. With a backoff above 1 the first wait is
    /// `delay` rounded down to a whole multiple of `backoff` milliseconds.
    fn delays(&self) -> Box<dyn Iterator<Item = Duration> + Send> {
        if self.backoff <= 1 {
            return Box::new(FixedInterval::new(self.delay));
        }

        let backoff = u64::from(self.backoff);
        let factor = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX) / backoff;
        Box::new(ExponentialBackoff::from_millis(backoff).factor(factor))
    }

    /// Waits between attempts, one fewer than `attempts`.
    pub fn strategy(&self) -> impl Iterator<Item = Duration> + Send {
        self.delays().take(self.attempts.saturating_sub(1) as usize)
    }

    /// Wait before retry number `retry` (0 = wait after the first failure).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.delays().nth(retry as usize).unwrap_or_default()
    }
}

/// Runs `operation` until it succeeds, fails with an error `should_retry`
/// rejects, or the policy runs out of attempts. The last error is returned.
pub async fn retry<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    name: &str,
    operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 0;

    RetryIf::spawn(policy.strategy(), operation, |err: &E| {
        attempt += 1;
        let retryable = should_retry(err);
        if retryable && attempt < attempts {
            warn!(operation = name, attempt, attempts, "{err}, retrying");
        }
        retryable
    })
    .await
}
