use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::classify::{default_should_retry, Classify};

/// Randomisation applied on top of the computed back-off delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Jitter {
    /// Sleep exactly the computed delay.
    None,
    /// Uniform in `[0, delay)`.
    Full,
    /// Uniform in `[0.75 × delay, 1.25 × delay)`, re-capped at `max_delay`.
    #[default]
    Bounded,
}

impl Jitter {
    /// Applies this jitter strategy to `delay`, never exceeding `cap`.
    #[must_use]
    pub fn apply(self, delay: Duration, cap: Option<Duration>) -> Duration {
        let jittered = match self {
            Jitter::None => delay,
            Jitter::Full => scale(delay, rand::random::<f64>()),
            Jitter::Bounded => scale(delay, rand::random::<f64>() * 0.5 + 0.75),
        };
        match cap {
            Some(cap) => jittered.min(cap),
            None => jittered,
        }
    }
}

/// `delay × factor`, saturating at `Duration::MAX` instead of overflowing.
fn scale(delay: Duration, factor: f64) -> Duration {
    Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

type Predicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// How many times to attempt an operation and how long to wait in between.
///
/// The wait before attempt `n + 1` is
/// `min(base_delay × backoff_multiplier^(n − 1), max_delay)`, then jittered.
pub struct RetryPolicy<E> {
    max_attempts: u32,
    base_delay: Duration,
    backoff_multiplier: f64,
    max_delay: Option<Duration>,
    jitter: Jitter,
    should_retry: Predicate<E>,
}

impl<E: Classify + 'static> RetryPolicy<E> {
    /// A policy using [`default_should_retry`], a 1 s base delay, a ×2
    /// multiplier, no cap and bounded jitter.
    ///
    /// `max_attempts` below 1 is raised to 1: the operation always runs once.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self::with_predicate(max_attempts, default_should_retry::<E>)
    }
}

impl<E: 'static> RetryPolicy<E> {
    /// Like [`RetryPolicy::new`] but with a caller-supplied retry predicate,
    /// for error types that do not implement [`Classify`].
    #[must_use]
    pub fn with_predicate<P>(max_attempts: u32, predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            max_delay: None,
            jitter: Jitter::default(),
            should_retry: Arc::new(predicate),
        }
    }

    /// Replaces the retry predicate.
    #[must_use]
    pub fn with_should_retry<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Arc::new(predicate);
        self
    }
}

impl<E> RetryPolicy<E> {
    #[must_use]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Sets the growth factor between consecutive waits. Negative or NaN
    /// factors behave as `0`.
    #[must_use]
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    #[must_use]
    pub fn jitter(&self) -> Jitter {
        self.jitter
    }

    #[must_use]
    pub fn should_retry(&self, error: &E) -> bool {
        (self.should_retry)(error)
    }

    /// The un-jittered wait after failed attempt `attempt` (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let factor = self.backoff_multiplier.max(0.0).powi(exponent);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let computed = {
            let nanos = self.base_delay.as_nanos() as f64 * factor;
            if nanos.is_finite() && nanos < u64::MAX as f64 {
                Duration::from_nanos(nanos.round() as u64)
            } else {
                Duration::MAX
            }
        };
        match self.max_delay {
            Some(cap) => computed.min(cap),
            None => computed,
        }
    }

    /// The wait actually slept after failed attempt `attempt`.
    #[must_use]
    pub fn jittered_delay_for(&self, attempt: u32) -> Duration {
        self.jitter.apply(self.delay_for(attempt), self.max_delay)
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            base_delay: self.base_delay,
            backoff_multiplier: self.backoff_multiplier,
            max_delay: self.max_delay,
            jitter: self.jitter,
            should_retry: Arc::clone(&self.should_retry),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("max_delay", &self.max_delay)
            .field("jitter", &self.jitter)
            .finish_non_exhaustive()
    }
}
