use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::RetryError;
use crate::policy::RetryPolicy;

/// Runs `operation` until it succeeds, the policy is exhausted, or the
/// policy's predicate rejects an error.
///
/// | Outcome of attempt `n`                 | Result                                  |
/// |----------------------------------------|-----------------------------------------|
/// | `Ok(v)`                                | `Ok(v)`                                 |
/// | `Err(e)`, `n == max_attempts`          | [`RetryError::Exhausted`] `{ n, e }`    |
/// | `Err(e)`, predicate says no            | [`RetryError::Permanent`] `(e)`         |
/// | `Err(e)`, predicate says yes           | wait `delay_for(n)` (jittered), retry   |
///
/// The exhaustion check runs before the predicate, so the final attempt's
/// error is always reported as exhausted.
///
/// # Errors
///
/// Returns [`RetryError::Exhausted`] or [`RetryError::Permanent`] as above.
pub async fn with_retry<T, E, F, Fut>(
    operation: F,
    policy: &RetryPolicy<E>,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    run(operation, policy, None).await
}

/// [`with_retry`], with a token that interrupts any in-progress back-off
/// wait. An attempt already running is allowed to finish.
///
/// # Errors
///
/// As [`with_retry`], plus [`RetryError::Cancelled`] when `cancel` fires
/// while waiting to retry.
pub async fn with_retry_cancellable<T, E, F, Fut>(
    operation: F,
    policy: &RetryPolicy<E>,
    cancel: &CancellationToken,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    run(operation, policy, Some(cancel)).await
}

async fn run<T, E, F, Fut>(
    mut operation: F,
    policy: &RetryPolicy<E>,
    cancel: Option<&CancellationToken>,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if attempt >= policy.max_attempts() {
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last_error: err,
            });
        }
        if !policy.should_retry(&err) {
            return Err(RetryError::Permanent(err));
        }

        let delay = policy.jittered_delay_for(attempt);
        if !wait(delay, cancel).await {
            return Err(RetryError::Cancelled {
                attempts: attempt,
                last_error: err,
            });
        }
        attempt += 1;
    }
}

/// Sleeps for `delay`. Returns `false` if `cancel` fired first.
async fn wait(delay: Duration, cancel: Option<&CancellationToken>) -> bool {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => false,
            () = tokio::time::sleep(delay) => true,
        },
        None => {
            tokio::time::sleep(delay).await;
            true
        }
    }
}
