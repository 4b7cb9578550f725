//! Bounded retry with linear backoff
//!
//! Transport-level failures are retried up to a fixed attempt count, with
//! the wait growing linearly: attempt k is followed by a sleep of
//! `base_delay * k`. HTTP error statuses never reach this layer; they are
//! regular responses.

use std::future::Future;
use std::time::Duration;

use crate::shutdown::ShutdownSignal;

/// Attempt bound and backoff base for one call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Attempt k sleeps `base_delay * k` before the next try
    pub base_delay: Duration,
}

/// Why a retried operation gave up.
#[derive(Debug)]
pub enum RetryError<E> {
    Exhausted { attempts: u32, source: E },
    Cancelled,
}

/// Run `op` until it succeeds, the attempt bound is spent, or shutdown is
/// requested. The sleep between attempts races the shutdown signal, so
/// cancellation propagates without waiting out the backoff.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    shutdown: &ShutdownSignal,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(source) if attempt >= policy.max_attempts => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    source,
                });
            }
            Err(source) => {
                let delay = policy.base_delay * attempt;
                tracing::warn!(attempt, error = %source, delay_ms = delay.as_millis() as u64,
                    "transport attempt failed, backing off");
                tokio::select! {
                    _ = shutdown.cancelled() => return Err(RetryError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }
}
