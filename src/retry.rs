use std::time::Duration;

use rand::Rng;

/// Upper bound (exclusive) of the random jitter added to every backoff
/// delay, in milliseconds.
pub const JITTER_MS: u64 = 100;

/// Decides whether an HTTP status is worth another attempt.
///
/// 4xx responses are the request's own fault and will not improve on retry,
/// with two exceptions: 408 (request timeout) and 429 (rate limited).
/// Anything in 5xx territory is treated as transient.
pub fn should_retry_status(status: u16) -> bool {
    matches!(status, 408 | 429) || status >= 500
}

/// Retry bookkeeping for one logical request.
///
/// A fresh value travels through the retry loop and each retry produces the
/// next state, instead of a counter being mutated on shared config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryState {
    /// Zero-based number of the next physical attempt (0 = initial call).
    pub attempt: usize,
    /// Retry cap from the client config.
    pub max_retries: usize,
}

impl RetryState {
    /// State before the first physical attempt.
    pub fn new(max_retries: usize) -> Self {
        Self {
            attempt: 0,
            max_retries,
        }
    }

    /// Whether another retry is allowed under the cap.
    pub fn can_retry(&self) -> bool {
        self.attempt < self.max_retries
    }

    /// State for the following attempt.
    pub fn next(self) -> Self {
        Self {
            attempt: self.attempt + 1,
            ..self
        }
    }
}

/// Backoff delay before retry attempt `attempt` (1-based):
/// `base_ms × 2^(attempt − 1)` plus random jitter in `[0, JITTER_MS)`.
///
/// The exponent is capped so pathological retry caps cannot overflow the
/// multiplier.
pub fn backoff_delay(base_ms: u64, attempt: usize) -> Duration {
    let exp = attempt.saturating_sub(1).min(16) as u32;
    let backoff = base_ms.saturating_mul(1u64 << exp);
    let jitter = rand::rng().random_range(0..JITTER_MS);
    Duration::from_millis(backoff.saturating_add(jitter))
}
