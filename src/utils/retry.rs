use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Fixed-delay retry policy. `max_attempts == 0` retries forever.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub delay: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(delay: Duration, max_attempts: u32) -> Self {
        Self {
            delay,
            max_attempts,
        }
    }

    fn exhausted(&self, attempt: u32) -> bool {
        self.max_attempts != 0 && attempt >= self.max_attempts
    }
}

/// Runs `acquire` until it succeeds or the policy gives up, sleeping
/// `policy.delay` between attempts. Returns the last error on give-up.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    what: &str,
    mut acquire: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match acquire().await {
            Ok(value) => {
                if attempt > 1 {
                    info!("{} acquired after {} attempts", what, attempt);
                }
                return Ok(value);
            }
            Err(e) if policy.exhausted(attempt) => {
                warn!("Giving up on {} after {} attempts: {}", what, attempt, e);
                return Err(e);
            }
            Err(e) => {
                info!(
                    "Waiting for {} (attempt {}): {}; retrying in {:?}",
                    what, attempt, e, policy.delay
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(Duration::from_secs(5), 0);

        let result: Result<&str, String> = retry_with_backoff(policy, "db", || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(format!("refused #{}", n))
                } else {
                    Ok("connected")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("connected"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_attempts_return_last_error() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(Duration::from_secs(1), 2);

        let result: Result<(), String> = retry_with_backoff(policy, "db", || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err(format!("refused #{}", n)) }
        })
        .await;

        assert_eq!(result, Err("refused #2".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
