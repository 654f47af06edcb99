//! `sturdy-http` is an async HTTP client for calling external services.
//!
//! It wraps `reqwest` with the plumbing every service-to-service call needs:
//! - exponential-backoff retry with jitter for transient failures
//! - ordered request hooks for structured logging and custom observation
//! - redaction of sensitive body fields before anything is logged
//! - a single caller-facing error type, [`ExternalServiceError`]
//!
//! # Example
//!
//! ```no_run
//! use sturdy_http::{ClientConfig, HttpClient, RequestOptions};
//!
//! # async fn run() -> sturdy_http::Result<()> {
//! let client = HttpClient::new(
//!     ClientConfig::new("https://users.internal")
//!         .service_label("user-service")
//!         .max_retries(3),
//! );
//!
//! let user: serde_json::Value = client.get("/users/42", RequestOptions::new()).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod hooks;
mod options;
mod redact;
mod retry;

pub use client::HttpClient;
pub use error::ExternalServiceError;
pub use hooks::{RequestAttempt, RequestHook, RetryDirective, TracingHook};
pub use options::{ClientConfig, RequestOptions};
pub use redact::{sanitize, REDACTED};
pub use retry::{backoff_delay, should_retry_status, RetryState, JITTER_MS};

pub type Result<T> = std::result::Result<T, ExternalServiceError>;
