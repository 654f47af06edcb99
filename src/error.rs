/// Error type returned by this crate.
///
/// Every failure mode — connection error, timeout, non-success status, bad
/// response body — surfaces as this one type once retries are exhausted or
/// the failure is not retryable. The underlying `reqwest` error never
/// escapes to callers.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ExternalServiceError {
    /// Label of the service the request was addressed to.
    pub service: String,
    /// HTTP status code, when a response was received.
    pub status: Option<u16>,
    /// Response body, when one was received (parsed as JSON where possible).
    pub body: Option<serde_json::Value>,
    /// Human-readable description carrying the originating error text.
    pub message: String,
}

impl ExternalServiceError {
    /// An expected failure of a dependency during normal operation, as
    /// opposed to a programmer error. Always true for this type.
    pub fn is_operational(&self) -> bool {
        true
    }
}
