//! Retry with classified, capped exponential back-off.
//!
//! [`with_retry`] wraps any fallible async operation. Failures are first
//! normalised into an [`ErrorClass`]; the policy's predicate (by default
//! [`default_should_retry`]) decides whether the class is worth another
//! attempt. The executor itself keeps no state between invocations and
//! emits no log events; callers decide what to report.

mod classify;
mod error;
mod executor;
mod policy;

pub use classify::{default_should_retry, Classify, ErrorClass, FailureShape, ResponseShape};
pub use error::RetryError;
pub use executor::{with_retry, with_retry_cancellable};
pub use policy::{Jitter, RetryPolicy};
pub use tokio_util::sync::CancellationToken;
