use thiserror::Error;

use crate::classify::{Classify, ErrorClass};

/// Terminal outcome of a failed [`with_retry`](crate::with_retry) run.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every permitted attempt failed. `attempts` always equals the policy's
    /// `max_attempts`.
    #[error("gave up after {attempts} attempts: {last_error}")]
    Exhausted {
        attempts: u32,
        #[source]
        last_error: E,
    },

    /// The predicate declared the error not worth retrying. The original
    /// error is carried as-is.
    #[error(transparent)]
    Permanent(E),

    /// The cancellation token fired while waiting to retry.
    #[error("cancelled after {attempts} attempts: {last_error}")]
    Cancelled {
        attempts: u32,
        #[source]
        last_error: E,
    },
}

impl<E> RetryError<E> {
    /// Number of attempts made, if the run got far enough to count them.
    #[must_use]
    pub fn attempts(&self) -> Option<u32> {
        match self {
            RetryError::Exhausted { attempts, .. } | RetryError::Cancelled { attempts, .. } => {
                Some(*attempts)
            }
            RetryError::Permanent(_) => None,
        }
    }

    #[must_use]
    pub fn last_error(&self) -> &E {
        match self {
            RetryError::Exhausted { last_error, .. }
            | RetryError::Cancelled { last_error, .. }
            | RetryError::Permanent(last_error) => last_error,
        }
    }

    /// Discards the retry context and returns the underlying error.
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Exhausted { last_error, .. }
            | RetryError::Cancelled { last_error, .. }
            | RetryError::Permanent(last_error) => last_error,
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }
}

impl<E: Classify> Classify for RetryError<E> {
    fn classify(&self) -> ErrorClass {
        self.last_error().classify()
    }
}
