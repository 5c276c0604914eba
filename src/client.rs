use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use tokio::time::{sleep, timeout};

use crate::{
    error::is_retryable_status,
    transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse},
    ClientOptions, RequestDescriptor, Result, TossPaymentsError, TransportError,
};

/// Production API origin.
pub const DEFAULT_API_BASE: &str = "https://api.tosspayments.com";

const API_PREFIX: &str = "/v1/";
const IDEMPOTENCY_KEY: &str = "idempotency-key";

/// Builds the HTTP Basic authorization value for a secret key.
///
/// The secret is the username and the password is empty:
/// `"test_sk"` → `"Basic dGVzdF9zazo="`.
pub fn basic_authorization(secret_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{secret_key}:")))
}

#[derive(Clone)]
/// HTTP client for the Toss Payments Core API.
///
/// Every call goes through [`TossPaymentsClient::execute`], which adds
/// authentication, enforces the per-attempt timeout and retries transient
/// failures with exponential backoff.
pub struct TossPaymentsClient<T = ReqwestTransport> {
    transport: T,
    base_url: String,
    authorization: HeaderValue,
    options: ClientOptions,
}

impl<T> fmt::Debug for TossPaymentsClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TossPaymentsClient")
            .field("base_url", &self.base_url)
            .field("authorization", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl TossPaymentsClient<ReqwestTransport> {
    /// Creates a client for the production API from a secret key.
    ///
    /// Fails with [`TossPaymentsError::Config`] if the key is empty.
    pub fn new(secret_key: impl AsRef<str>) -> Result<Self> {
        Self::with_transport(secret_key, ReqwestTransport::new())
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `TOSS_SECRET_KEY` — secret key (required)
    /// - `TOSS_API_BASE` — API origin override
    /// - `TOSS_TIMEOUT_MS` — per-attempt timeout
    /// - `TOSS_MAX_RETRIES` — retries after the first attempt
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tosspayments_http::TossPaymentsClient;
    ///
    /// let toss = TossPaymentsClient::from_env().expect("missing TOSS_SECRET_KEY");
    /// ```
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("TOSS_SECRET_KEY").ok_or_else(|| {
            TossPaymentsError::Config("missing TOSS_SECRET_KEY environment variable".to_owned())
        })?;
        if secret_key.trim().is_empty() {
            return Err(TossPaymentsError::Config(
                "TOSS_SECRET_KEY is set but empty".to_owned(),
            ));
        }

        let mut options = ClientOptions::default();
        if let Some(value) = lookup("TOSS_TIMEOUT_MS") {
            options.timeout_ms = parse_env_value("TOSS_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("TOSS_MAX_RETRIES") {
            options.max_retries = parse_env_value("TOSS_MAX_RETRIES", &value)?;
        }

        let mut client = Self::new(secret_key)?.with_options(options);
        if let Some(base_url) = lookup("TOSS_API_BASE").filter(|url| !url.trim().is_empty()) {
            client = client.with_base_url(base_url);
        }
        Ok(client)
    }
}

impl<T: Transport> TossPaymentsClient<T> {
    /// Creates a client that sends requests through `transport`.
    pub fn with_transport(secret_key: impl AsRef<str>, transport: T) -> Result<Self> {
        let secret_key = secret_key.as_ref();
        if secret_key.trim().is_empty() {
            return Err(TossPaymentsError::Config("secret key is required".to_owned()));
        }
        let mut authorization = HeaderValue::from_str(&basic_authorization(secret_key))
            .map_err(|err| TossPaymentsError::Config(format!("invalid secret key: {err}")))?;
        authorization.set_sensitive(true);

        Ok(Self {
            transport,
            base_url: DEFAULT_API_BASE.to_owned(),
            authorization,
            options: ClientOptions::default(),
        })
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Points the client at another origin, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Executes one logical request and returns the parsed JSON body.
    ///
    /// HTTP 5xx/429 and retryable transport failures are retried up to
    /// [`ClientOptions::max_retries`] times, waiting
    /// `retry_backoff_ms × 2^(n-1)` before retry `n`. Anything else fails
    /// on the first attempt.
    pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<serde_json::Value> {
        let request = self.build_request(&descriptor)?;
        let attempt_timeout =
            Duration::from_millis(descriptor.timeout_ms.unwrap_or(self.options.timeout_ms));
        let mut attempt = 0usize;

        loop {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                method = %request.method,
                path = %descriptor.path,
                attempt,
                "sending request"
            );

            let outcome = timeout(attempt_timeout, self.transport.send(request.clone()))
                .await
                .unwrap_or_else(|_| Err(TransportError::Timeout));
            let can_retry = attempt < self.options.max_retries;

            match outcome {
                Ok(response) => {
                    if response.status.is_success() {
                        return decode_json(&response);
                    }

                    let status = response.status.as_u16();
                    if is_retryable_status(status) && can_retry {
                        attempt += 1;
                        let retry_after = self.retry_after(&response);
                        self.wait_before_retry(attempt, retry_after).await;
                        continue;
                    }

                    #[cfg(feature = "tracing")]
                    {
                        if is_retryable_status(status) {
                            tracing::warn!(path = %descriptor.path, status, "retries exhausted");
                        }
                    }

                    return Err(TossPaymentsError::Http {
                        status,
                        body: response.body_text(),
                    });
                }
                Err(err) => {
                    if err.is_retryable() && can_retry {
                        attempt += 1;
                        self.wait_before_retry(attempt, None).await;
                        continue;
                    }

                    #[cfg(feature = "tracing")]
                    {
                        if err.is_retryable() {
                            tracing::warn!(path = %descriptor.path, error = %err, "retries exhausted");
                        }
                    }

                    return Err(TossPaymentsError::Transport(err));
                }
            }
        }
    }

    fn build_request(&self, descriptor: &RequestDescriptor) -> Result<TransportRequest> {
        if !descriptor.path.starts_with(API_PREFIX) {
            return Err(TossPaymentsError::Config(format!(
                "path '{}' must start with {API_PREFIX}",
                descriptor.path
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, self.authorization.clone());
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        if let Some(key) = &descriptor.idempotency_key {
            if key.trim().is_empty() {
                return Err(TossPaymentsError::Config(
                    "idempotency key must not be blank".to_owned(),
                ));
            }
            let value = HeaderValue::from_str(key).map_err(|err| {
                TossPaymentsError::Config(format!("invalid idempotency key '{key}': {err}"))
            })?;
            headers.insert(HeaderName::from_static(IDEMPOTENCY_KEY), value);
        }

        for (name, value) in &descriptor.headers {
            let name = HeaderName::from_str(name).map_err(|err| {
                TossPaymentsError::Config(format!("invalid header name '{name}': {err}"))
            })?;
            if name == header::AUTHORIZATION {
                return Err(TossPaymentsError::Config(
                    "authorization header cannot be overridden".to_owned(),
                ));
            }
            let value = HeaderValue::from_str(value).map_err(|err| {
                TossPaymentsError::Config(format!("invalid value for header '{name}': {err}"))
            })?;
            headers.insert(name, value);
        }

        let body = descriptor
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|err| TossPaymentsError::Config(format!("unserializable body: {err}")))?;

        Ok(TransportRequest {
            method: descriptor.method.clone(),
            url: format!("{}{}", self.base_url, descriptor.path),
            headers,
            body,
        })
    }

    /// Backoff before retry `retry` (1-based).
    fn retry_delay(&self, retry: usize) -> Duration {
        let exp = retry.saturating_sub(1).min(16) as u32;
        let multiplier = 1u64 << exp;
        Duration::from_millis(self.options.retry_backoff_ms.saturating_mul(multiplier))
    }

    /// Upstream `Retry-After` hint in whole seconds, when enabled.
    fn retry_after(&self, response: &TransportResponse) -> Option<Duration> {
        if !self.options.respect_retry_after {
            return None;
        }
        if !matches!(response.status.as_u16(), 429 | 503) {
            return None;
        }
        let seconds = response
            .headers
            .get(header::RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<u64>()
            .ok()?;
        let cap = Duration::from_millis(self.options.max_retry_after_ms);
        Some(Duration::from_secs(seconds).min(cap))
    }

    async fn wait_before_retry(&self, retry: usize, retry_after: Option<Duration>) {
        let backoff = self.retry_delay(retry);
        let delay = retry_after.map_or(backoff, |hint| hint.max(backoff));

        #[cfg(feature = "tracing")]
        tracing::debug!("retrying request after {} ms", delay.as_millis());

        sleep(delay).await;
    }
}

fn decode_json(response: &TransportResponse) -> Result<serde_json::Value> {
    serde_json::from_slice(&response.body).map_err(|err| {
        TossPaymentsError::Decode(format!(
            "invalid response JSON: {err}; body: {}",
            response.body_text()
        ))
    })
}

fn parse_env_value<N>(name: &str, value: &str) -> Result<N>
where
    N: FromStr,
    N::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|err| TossPaymentsError::Config(format!("invalid {name} '{value}': {err}")))
}
