use std::collections::HashMap;

/// Configures base URL, timeout and retry behavior.
///
/// Immutable once handed to [`crate::HttpClient::new`]; the builder methods
/// consume and return the config, so caller-supplied header maps are copied,
/// never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL prefixed to every request path.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Headers applied to every request. Per-call headers win on collision.
    pub default_headers: HashMap<String, String>,
    /// Service name used in logs and error messages.
    pub service_label: Option<String>,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Base retry backoff in milliseconds (exponential strategy).
    pub base_retry_delay_ms: u64,
}

impl ClientConfig {
    /// Creates a config for the given base URL with default timeout and
    /// retry settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: 10_000,
            default_headers: HashMap::new(),
            service_label: None,
            max_retries: 3,
            base_retry_delay_ms: 300,
        }
    }

    /// Sets the per-request timeout in milliseconds.
    pub fn timeout_ms(mut self, value: u64) -> Self {
        self.timeout_ms = value;
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Copies all entries of `headers` into the default header set.
    pub fn headers(mut self, headers: &HashMap<String, String>) -> Self {
        self.default_headers
            .extend(headers.iter().map(|(name, value)| (name.clone(), value.clone())));
        self
    }

    /// Sets the service label used in logs and error messages.
    pub fn service_label(mut self, value: impl Into<String>) -> Self {
        self.service_label = Some(value.into());
        self
    }

    /// Sets the retry cap (retries after the initial attempt).
    pub fn max_retries(mut self, value: usize) -> Self {
        self.max_retries = value;
        self
    }

    /// Sets the base backoff delay in milliseconds.
    pub fn base_retry_delay_ms(mut self, value: u64) -> Self {
        self.base_retry_delay_ms = value;
        self
    }
}

/// Per-call overrides for a single request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Extra headers for this call; override defaults on name collision.
    pub headers: HashMap<String, String>,
    /// Timeout override in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl RequestOptions {
    /// Creates empty options (no overrides).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header for this call only.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Overrides the timeout for this call.
    pub fn timeout_ms(mut self, value: u64) -> Self {
        self.timeout_ms = Some(value);
        self
    }
}
