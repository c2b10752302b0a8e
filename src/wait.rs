//! Bounded polling waits against rendered page state.
//!
//! Every wait has an explicit timeout. Running out of time is reported as a
//! [`WaitTimeout`] value for the caller to act on.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("timed out after {after:?} waiting for {what}")]
pub struct WaitTimeout {
    pub what: &'static str,
    pub after: Duration,
}

/// `timeout` from now, saturating at a point roughly thirty years out
pub fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .unwrap_or_else(|| now + Duration::from_secs(86400 * 365 * 30))
}

/// Poll `probe` every `interval` until it yields a value or `timeout` elapses.
///
/// The probe always runs at least once, so a condition that already holds
/// returns immediately.
pub async fn poll_for<T, F, Fut>(
    what: &'static str,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<T, WaitTimeout>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = deadline_after(timeout);
    loop {
        if let Some(value) = probe().await {
            return Ok(value);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(WaitTimeout {
                what,
                after: timeout,
            });
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

/// Poll a boolean condition until it holds or `timeout` elapses
pub async fn poll_until<F, Fut>(
    what: &'static str,
    timeout: Duration,
    interval: Duration,
    mut condition: F,
) -> Result<(), WaitTimeout>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    poll_for(what, timeout, interval, || {
        let check = condition();
        async move { check.await.then_some(()) }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_huge_timeout_does_not_overflow() {
        let value = poll_for("ready", Duration::MAX, Duration::from_millis(250), || async { Some(1) })
            .await
            .unwrap();
        assert_eq!(value, 1);
        assert!(deadline_after(Duration::MAX) > Instant::now() + Duration::from_secs(86400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_returns_immediately_when_ready() {
        let start = Instant::now();
        let value = poll_for("ready", Duration::from_secs(5), Duration::from_millis(100), || async {
            Some(7)
        })
        .await;

        assert_eq!(value, Ok(7));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_eventually_true() {
        let calls = AtomicUsize::new(0);
        let calls = &calls;
        let result = poll_until("third call", Duration::from_secs(5), Duration::from_millis(100), move || async move {
            calls.fetch_add(1, Ordering::SeqCst) >= 2
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_times_out() {
        let start = Instant::now();
        let result = poll_until("never", Duration::from_secs(2), Duration::from_millis(300), || async {
            false
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.what, "never");
        assert_eq!(err.after, Duration::from_secs(2));
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert!(start.elapsed() < Duration::from_secs(3));
    }
}
