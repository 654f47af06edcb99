use std::time::{Duration, SystemTime};

use serde_json::Value;

/// One physical network call, as seen by hooks.
#[derive(Clone, Debug)]
pub struct RequestAttempt {
    /// HTTP method.
    pub method: reqwest::Method,
    /// Fully-qualified URL.
    pub url: String,
    /// Redacted copy of the request body, if one was sent.
    pub body_preview: Option<Value>,
    /// Zero-based attempt number (0 = initial call).
    pub attempt: usize,
    /// Wall-clock start of the attempt.
    pub started_at: SystemTime,
}

/// Verdict a hook passes back from [`RequestHook::after_failure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDirective {
    /// Defer to the client's retry policy.
    Auto,
    /// Do not retry; surface the error now.
    GiveUp,
}

/// Observes the lifecycle of every physical attempt.
///
/// Hooks run in registration order and are fire-and-forget: nothing a hook
/// does can fail the request, with one exception — [`Self::after_failure`]
/// may veto further retries. All methods default to no-ops.
pub trait RequestHook: Send + Sync {
    /// Runs before every physical attempt, retries included.
    fn before_attempt(&self, _attempt: &RequestAttempt) {}

    /// Runs after a success response. The response itself is not exposed;
    /// hooks observe, the caller decodes.
    fn after_response(&self, _attempt: &RequestAttempt, _status: u16) {}

    /// Runs after a failed attempt, before the retry decision.
    fn after_failure(
        &self,
        _attempt: &RequestAttempt,
        _status: Option<u16>,
        _message: &str,
    ) -> RetryDirective {
        RetryDirective::Auto
    }

    /// Runs once a retry has been scheduled, before the backoff sleep.
    fn on_retry_scheduled(
        &self,
        _attempt: &RequestAttempt,
        _next_attempt: usize,
        _max_retries: usize,
        _delay: Duration,
    ) {
    }
}

/// Default hook: structured request/response logging via `tracing`.
///
/// Attempts, responses and scheduled retries are logged at debug level,
/// failures at error level. Request bodies are already redacted by the time
/// they reach the hook.
pub struct TracingHook {
    service: String,
}

impl TracingHook {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl RequestHook for TracingHook {
    fn before_attempt(&self, attempt: &RequestAttempt) {
        tracing::debug!(
            service = %self.service,
            method = %attempt.method,
            url = %attempt.url,
            body = ?attempt.body_preview,
            attempt = attempt.attempt,
            "http request"
        );
    }

    fn after_response(&self, attempt: &RequestAttempt, status: u16) {
        tracing::debug!(
            service = %self.service,
            method = %attempt.method,
            url = %attempt.url,
            status,
            "http response"
        );
    }

    fn after_failure(
        &self,
        attempt: &RequestAttempt,
        status: Option<u16>,
        message: &str,
    ) -> RetryDirective {
        tracing::error!(
            service = %self.service,
            method = %attempt.method,
            url = %attempt.url,
            status = ?status,
            attempt = attempt.attempt,
            error = message,
            "http request failed"
        );
        RetryDirective::Auto
    }

    fn on_retry_scheduled(
        &self,
        attempt: &RequestAttempt,
        next_attempt: usize,
        max_retries: usize,
        delay: Duration,
    ) {
        tracing::debug!(
            service = %self.service,
            method = %attempt.method,
            url = %attempt.url,
            delay_ms = delay.as_millis() as u64,
            "retrying request ({next_attempt}/{max_retries})"
        );
    }
}
