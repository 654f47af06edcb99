use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    redact::sanitize,
    retry::{backoff_delay, should_retry_status, RetryState},
    ClientConfig, ExternalServiceError, RequestAttempt, RequestHook, RequestOptions, Result,
    RetryDirective, TracingHook,
};

/// Service label used in errors and logs when the config does not set one.
const DEFAULT_SERVICE_LABEL: &str = "external-service";

/// Async HTTP client with automatic retry, request hooks and log redaction.
///
/// Transient failures (connection errors, timeouts, 408, 429, 5xx) are
/// retried with exponential backoff and jitter up to the configured cap;
/// everything else fails fast. Callers only ever see
/// [`ExternalServiceError`].
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    config: ClientConfig,
    hooks: Vec<Arc<dyn RequestHook>>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("service", &self.service_label())
            .field("default_headers", &"<redacted>")
            .field("max_retries", &self.config.max_retries)
            .finish()
    }
}

impl HttpClient {
    /// Creates a client with the default [`TracingHook`] installed.
    pub fn new(config: ClientConfig) -> Self {
        let hook = TracingHook::new(
            config
                .service_label
                .clone()
                .unwrap_or_else(|| DEFAULT_SERVICE_LABEL.to_owned()),
        );
        Self::new_silent(config).with_hook(Arc::new(hook))
    }

    /// Creates a client with no hooks installed.
    ///
    /// Useful when the embedding application wires its own observation
    /// hooks and does not want the built-in logging.
    pub fn new_silent(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            hooks: Vec::new(),
        }
    }

    /// Appends a hook; hooks run in registration order.
    pub fn with_hook(mut self, hook: Arc<dyn RequestHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Issues a GET request and decodes the response body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, opts: RequestOptions) -> Result<T> {
        self.request(Method::GET, path, None::<&()>, opts).await
    }

    /// Issues a POST request with a JSON body and decodes the response.
    pub async fn post<T, B>(&self, path: &str, body: &B, opts: RequestOptions) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body), opts).await
    }

    /// Issues a PUT request with a JSON body and decodes the response.
    pub async fn put<T, B>(&self, path: &str, body: &B, opts: RequestOptions) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body), opts).await
    }

    /// Issues a PATCH request with a JSON body and decodes the response.
    pub async fn patch<T, B>(&self, path: &str, body: &B, opts: RequestOptions) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, Some(body), opts).await
    }

    /// Issues a DELETE request and decodes the response body.
    ///
    /// An empty response body decodes as JSON `null`, so `T = ()` works for
    /// 204-style responses.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, opts: RequestOptions) -> Result<T> {
        self.request(Method::DELETE, path, None::<&()>, opts).await
    }

    /// Issues a request with retry; the verb methods delegate here.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: RequestOptions,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = match body {
            Some(body) => {
                Some(serde_json::to_value(body).map_err(|err| self.body_encode_error(err))?)
            }
            None => None,
        };
        let (status, value) = self.send_with_retry(method, path, body, &opts).await?;
        serde_json::from_value(value).map_err(|err| self.decode_error(status, err))
    }

    async fn send_with_retry(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        opts: &RequestOptions,
    ) -> Result<(u16, Value)> {
        let url = join_url(&self.config.base_url, path);
        let body_preview = body.as_ref().map(sanitize);
        let timeout = Duration::from_millis(opts.timeout_ms.unwrap_or(self.config.timeout_ms));
        let mut state = RetryState::new(self.config.max_retries);

        loop {
            let attempt = RequestAttempt {
                method: method.clone(),
                url: url.clone(),
                body_preview: body_preview.clone(),
                attempt: state.attempt,
                started_at: SystemTime::now(),
            };
            for hook in &self.hooks {
                hook.before_attempt(&attempt);
            }

            let mut request = self.http.request(method.clone(), &url).timeout(timeout);
            for (name, value) in &self.config.default_headers {
                if !opts.headers.contains_key(name) {
                    request = request.header(name, value);
                }
            }
            for (name, value) in &opts.headers {
                request = request.header(name, value);
            }
            if let Some(body) = &body {
                request = request.json(body);
            }

            let failure = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    match response.text().await {
                        Ok(text) if status.is_success() => {
                            for hook in &self.hooks {
                                hook.after_response(&attempt, status.as_u16());
                            }
                            return Ok((status.as_u16(), parse_body(&text)));
                        }
                        Ok(text) => AttemptFailure::Status {
                            status: status.as_u16(),
                            body: text,
                        },
                        // Losing the body mid-read behaves like a dropped
                        // connection.
                        Err(err) => AttemptFailure::transport(&err),
                    }
                }
                Err(err) => AttemptFailure::transport(&err),
            };

            let message = failure.message();
            let mut directive = RetryDirective::Auto;
            for hook in &self.hooks {
                if hook.after_failure(&attempt, failure.status(), &message) == RetryDirective::GiveUp
                {
                    directive = RetryDirective::GiveUp;
                }
            }

            if directive == RetryDirective::Auto && failure.retryable() && state.can_retry() {
                state = state.next();
                let delay = backoff_delay(self.config.base_retry_delay_ms, state.attempt);
                for hook in &self.hooks {
                    hook.on_retry_scheduled(&attempt, state.attempt, state.max_retries, delay);
                }
                sleep(delay).await;
                continue;
            }

            return Err(self.terminal_error(failure));
        }
    }

    fn service_label(&self) -> &str {
        self.config
            .service_label
            .as_deref()
            .unwrap_or(DEFAULT_SERVICE_LABEL)
    }

    fn terminal_error(&self, failure: AttemptFailure) -> ExternalServiceError {
        let service = self.service_label().to_owned();
        match failure {
            AttemptFailure::Status { status, body } => ExternalServiceError {
                message: format!("request to {service} failed: status {status}"),
                service,
                status: Some(status),
                body: Some(parse_body(&body)),
            },
            AttemptFailure::Transport { message, .. } => ExternalServiceError {
                message: format!("request to {service} failed: {message}"),
                service,
                status: None,
                body: None,
            },
        }
    }

    fn body_encode_error(&self, err: serde_json::Error) -> ExternalServiceError {
        let service = self.service_label().to_owned();
        ExternalServiceError {
            message: format!("request to {service} failed: could not encode request body: {err}"),
            service,
            status: None,
            body: None,
        }
    }

    fn decode_error(&self, status: u16, err: serde_json::Error) -> ExternalServiceError {
        let service = self.service_label().to_owned();
        ExternalServiceError {
            message: format!("request to {service} failed: invalid response body: {err}"),
            service,
            status: Some(status),
            body: None,
        }
    }
}

/// Failure of one physical attempt, before the retry decision.
enum AttemptFailure {
    /// A response arrived with a non-success status.
    Status { status: u16, body: String },
    /// No usable response: connect, timeout or body-read error.
    Transport { message: String, retryable: bool },
}

impl AttemptFailure {
    fn transport(err: &reqwest::Error) -> Self {
        // Builder errors (bad header name, invalid URL) will not improve
        // with another attempt.
        Self::Transport {
            message: err.to_string(),
            retryable: !err.is_builder(),
        }
    }

    fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => should_retry_status(*status),
            Self::Transport { retryable, .. } => *retryable,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Status { status, .. } => format!("unexpected status {status}"),
            Self::Transport { message, .. } => message.clone(),
        }
    }
}

/// Joins the base URL and a request path with exactly one slash.
fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return base.to_owned();
    }
    format!("{base}/{}", path.trim_start_matches('/'))
}

/// Empty bodies become JSON `null` so unit-returning calls decode cleanly;
/// non-JSON bodies are preserved as strings.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
    }
}
