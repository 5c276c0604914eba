/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Base retry backoff in milliseconds (exponential strategy).
    pub retry_backoff_ms: u64,
    /// Waits at least the upstream `Retry-After` seconds on 429/503.
    pub respect_retry_after: bool,
    /// Upper bound applied to a `Retry-After` wait.
    pub max_retry_after_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_retries: 2,
            retry_backoff_ms: 300,
            respect_retry_after: false,
            max_retry_after_ms: 30_000,
        }
    }
}
