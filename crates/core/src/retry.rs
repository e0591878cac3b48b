// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded retry with jittered exponential backoff.
//!
//! ```text
//! Attempting ──ok──────────────────────────────► Done
//!     │
//!     ├─err, retryable, retries left──► Waiting ──► Attempting
//!     │
//!     └─err, permanent or budget spent─────────► Failed
//! ```
//!
//! The wait before retry `n` (1-based) is `min_wait * 2^(n-1)`, capped at
//! `max_wait`, then jittered uniformly into `[wait/2, wait]` and floored at
//! `min_wait`. A [`CancellationToken`] aborts both the in-flight attempt and
//! any pending wait.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

/// Classifies an error as transient (worth retrying) or permanent.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Retry budget, wait bounds and retryability predicate.
pub struct RetryPolicy<E> {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Shortest wait between attempts, jitter included.
    pub min_wait: Duration,
    /// Longest wait between attempts.
    pub max_wait: Duration,
    is_retryable: Arc<dyn Fn(&E) -> bool + Send + Sync>,
}

impl<E: 'static> RetryPolicy<E> {
    /// A policy with a custom retryability predicate.
    pub fn with_predicate<P>(
        max_retries: u32,
        min_wait: Duration,
        max_wait: Duration,
        predicate: P,
    ) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        RetryPolicy {
            max_retries,
            min_wait,
            max_wait,
            is_retryable: Arc::new(predicate),
        }
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        RetryPolicy::with_predicate(0, Duration::ZERO, Duration::ZERO, |_| false)
    }

    /// Replaces the retryability predicate.
    pub fn predicate<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.is_retryable = Arc::new(predicate);
        self
    }

    pub fn is_retryable(&self, error: &E) -> bool {
        (self.is_retryable)(error)
    }

    /// Unjittered wait before retry number `retry` (1-based).
    pub fn base_wait(&self, retry: u32) -> Duration {
        let cap = self.max_wait.max(self.min_wait);
        let factor = 2u32.checked_pow(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.min_wait.checked_mul(factor).unwrap_or(cap).min(cap)
    }

    /// Jittered wait before retry number `retry` (1-based).
    pub fn backoff<R: Rng + ?Sized>(&self, retry: u32, rng: &mut R) -> Duration {
        let base = self.base_wait(retry);
        let high = base.as_nanos().min(u64::MAX as u128) as u64;
        let low = high / 2;
        let jittered = Duration::from_nanos(rng.gen_range(low..=high));
        jittered.max(self.min_wait)
    }

    /// Runs `operation` under this policy. See [`execute`].
    pub async fn execute<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        operation: F,
    ) -> Result<T, RetryError<E>>
    where
        E: std::error::Error + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        execute(self, cancel, operation).await
    }
}

impl<E: Retryable + 'static> RetryPolicy<E> {
    /// A policy using the error type's own [`Retryable`] classification.
    pub fn new(max_retries: u32, min_wait: Duration, max_wait: Duration) -> Self {
        RetryPolicy::with_predicate(max_retries, min_wait, max_wait, E::is_retryable)
    }
}

impl<E: Retryable + 'static> Default for RetryPolicy<E> {
    fn default() -> Self {
        RetryPolicy::new(3, Duration::from_millis(200), Duration::from_secs(10))
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        RetryPolicy {
            max_retries: self.max_retries,
            min_wait: self.min_wait,
            max_wait: self.max_wait,
            is_retryable: Arc::clone(&self.is_retryable),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("min_wait", &self.min_wait)
            .field("max_wait", &self.max_wait)
            .finish_non_exhaustive()
    }
}

/// Per-operation retry bookkeeping.
#[derive(Debug)]
pub struct RetryState<E> {
    /// Attempts started so far.
    pub attempts: u32,
    pub last_error: Option<E>,
    pub next_wait: Option<Duration>,
}

impl<E> RetryState<E> {
    pub fn new() -> Self {
        RetryState {
            attempts: 0,
            last_error: None,
            next_wait: None,
        }
    }
}

impl<E> Default for RetryState<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal failure of a retried operation.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E>
where
    E: std::error::Error + 'static,
{
    /// Every allowed attempt failed with a transient error.
    #[error("gave up after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: E },

    /// An attempt failed with an error that retrying cannot fix.
    #[error("failed after {attempts} attempt(s): {source}")]
    Rejected { attempts: u32, source: E },

    /// The caller cancelled the operation.
    #[error("cancelled after {attempts} attempt(s)")]
    Cancelled {
        attempts: u32,
        last_error: Option<E>,
    },
}

impl<E: std::error::Error + 'static> RetryError<E> {
    /// Attempts made before the operation ended.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. }
            | RetryError::Rejected { attempts, .. }
            | RetryError::Cancelled { attempts, .. } => *attempts,
        }
    }

    /// The last underlying failure, if any attempt completed.
    pub fn last_error(&self) -> Option<&E> {
        match self {
            RetryError::Exhausted { source, .. } | RetryError::Rejected { source, .. } => {
                Some(source)
            }
            RetryError::Cancelled { last_error, .. } => last_error.as_ref(),
        }
    }

    pub fn into_last_error(self) -> Option<E> {
        match self {
            RetryError::Exhausted { source, .. } | RetryError::Rejected { source, .. } => {
                Some(source)
            }
            RetryError::Cancelled { last_error, .. } => last_error,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled { .. })
    }
}

/// Runs `operation` until it succeeds, fails permanently, exhausts
/// `policy.max_retries`, or `cancel` fires.
///
/// `operation` is called once per attempt and must build a fresh request
/// each time.
pub async fn execute<T, E, F, Fut>(
    policy: &RetryPolicy<E>,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    E: std::error::Error + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut state = RetryState::new();

    loop {
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled {
                attempts: state.attempts,
                last_error: state.last_error,
            });
        }

        state.attempts += 1;
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(RetryError::Cancelled {
                    attempts: state.attempts,
                    last_error: state.last_error,
                });
            }
            outcome = operation() => outcome,
        };

        let error = match outcome {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if !policy.is_retryable(&error) {
            return Err(RetryError::Rejected {
                attempts: state.attempts,
                source: error,
            });
        }
        if state.attempts > policy.max_retries {
            return Err(RetryError::Exhausted {
                attempts: state.attempts,
                source: error,
            });
        }

        let wait = {
            let mut rng = rand::thread_rng();
            policy.backoff(state.attempts, &mut rng)
        };
        state.next_wait = Some(wait);
        state.last_error = Some(error);
        tracing::debug!(
            attempt = state.attempts,
            wait_ms = wait.as_millis() as u64,
            "transient failure, retrying"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(RetryError::Cancelled {
                    attempts: state.attempts,
                    last_error: state.last_error,
                });
            }
            _ = tokio::time::sleep(wait) => {}
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
