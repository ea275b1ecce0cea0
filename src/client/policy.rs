use std::time::Duration;

use crate::Error;

/// How to proceed after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Retry { delay: Duration },
    Fail,
}

/// Fixed-delay retry policy.
///
/// Only retryable transport failures are retried; decode and protocol errors
/// fail on the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// `attempt` is zero-based: the first request is attempt 0.
    pub fn decide(&self, attempt: u32, error: &Error) -> Decision {
        if attempt < self.max_retries && error.is_retryable() {
            Decision::Retry { delay: self.delay }
        } else {
            Decision::Fail
        }
    }
}
