//! Capped exponential backoff around provider calls.

use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::error::ProviderError;
use crate::traits::Pause;

/// Runs `call` until it succeeds, fails terminally, or retries run out.
///
/// `call` receives the 0-based attempt number. Only transient errors are
/// retried; the error from the last attempt is returned.
pub fn with_backoff<T, F>(
    policy: &RetryPolicy,
    pause: &dyn Pause,
    operation: &str,
    mut call: F,
) -> Result<T, ProviderError>
where
    F: FnMut(u32) -> Result<T, ProviderError>,
{
    let mut attempt = 0;
    loop {
        match call(attempt) {
            Ok(value) => {
                if attempt > 0 {
                    debug!(operation, attempt, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                warn!(
                    operation,
                    attempt,
                    status = %err.status,
                    delay_ms = delay.as_millis() as u64,
                    "transient provider failure, retrying"
                );
                pause.pause(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
