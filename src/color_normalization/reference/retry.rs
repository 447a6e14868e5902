use std::time::Duration;

use tracing::warn;

use crate::color_normalization::common::{CancellationToken, Result};
use crate::color_normalization::reference::matcher::ReferenceMatcher;
use crate::color_normalization::reference::types::{ReferenceMatch, TileDescriptor};

/// Retries retryable lookup failures with doubling backoff.
///
/// Non-retryable errors and the final failure are returned as-is. Backoff sleeps
/// wake up early and return `Cancelled` once the token is cancelled.
pub struct RetryingMatcher<M: ReferenceMatcher> {
    inner: M,
    max_retries: u32,
    initial_backoff: Duration,
    cancel: CancellationToken,
}

impl<M: ReferenceMatcher> RetryingMatcher<M> {
    pub fn new(inner: M, max_retries: u32, initial_backoff: Duration, cancel: CancellationToken) -> Self {
        Self {
            inner,
            max_retries,
            initial_backoff,
            cancel,
        }
    }
}

impl<M: ReferenceMatcher> ReferenceMatcher for RetryingMatcher<M> {
    fn best_match(&self, descriptor: &TileDescriptor) -> Result<ReferenceMatch> {
        let mut backoff = self.initial_backoff;
        let mut attempt = 0u32;
        loop {
            self.cancel.check()?;
            match self.inner.best_match(descriptor) {
                Ok(matched) => return Ok(matched),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        "Reference lookup failed, retrying: {}",
                        e
                    );
                    self.cancel.sleep(backoff)?;
                    backoff = backoff.saturating_mul(2);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
