//! Bounded connection retry

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};
use wildlife_core::{Result, WildlifeError};

/// Fixed attempt count with a fixed delay between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Run `connect` until it succeeds or the policy's attempts are spent.
///
/// `connect` receives the 1-based attempt number. At least one attempt is made
/// even when `max_attempts` is zero.
pub async fn connect_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    target: &str,
    mut connect: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Display,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        info!(
            "Connecting to {}... (attempt {}/{})",
            target, attempt, attempts
        );

        match connect(attempt).await {
            Ok(connection) => {
                info!("Connected to {}", target);
                return Ok(connection);
            }
            Err(e) => {
                warn!("Connection attempt {} to {} failed: {}", attempt, target, e);
                last_error = e.to_string();

                if attempt < attempts {
                    info!("Retrying in {}ms...", policy.delay.as_millis());
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    Err(WildlifeError::StoreUnavailable {
        attempts,
        reason: last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn quick(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = connect_with_retry(&quick(3), "test store", |attempt| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err("refused")
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<()> = connect_with_retry(&quick(2), "test store", |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err("refused") }
        })
        .await;

        match result {
            Err(WildlifeError::StoreUnavailable { attempts, reason }) => {
                assert_eq!(attempts, 2);
                assert_eq!(reason, "refused");
            }
            other => panic!("expected StoreUnavailable, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = connect_with_retry(&quick(0), "test store", |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, String>(()) }
        })
        .await;

        tokio_test::assert_ok!(result);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_waits_between_attempts() {
        let policy = RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(20),
        };
        let started = std::time::Instant::now();

        let _: Result<()> =
            connect_with_retry(&policy, "test store", |_| async { Err("refused") }).await;

        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
