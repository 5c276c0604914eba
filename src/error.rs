use serde::Deserialize;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum TossPaymentsError {
    /// Missing credential, invalid request field or unsupported path.
    ///
    /// Raised before any network call is made.
    #[error("configuration error: {0}")]
    Config(String),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Network failure or deadline exceeded.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// Success response whose body is not the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl TossPaymentsError {
    /// Returns `true` when the failure belongs to a class the request
    /// pipeline retries (5xx, 429 and transient transport failures).
    ///
    /// A returned error with this flag set means retries were exhausted.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => is_retryable_status(*status),
            Self::Transport(err) => err.is_retryable(),
            Self::Config(_) | Self::Decode(_) => false,
        }
    }

    /// HTTP status of an upstream failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parses the upstream `{"code": ..., "message": ...}` error body.
    pub fn api_error(&self) -> Option<ApiError> {
        match self {
            Self::Http { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

/// Error payload returned by the payment gateway on non-success responses.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Transport failures, classified by the transport that observed them.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The attempt did not complete before its deadline.
    #[error("request timed out")]
    Timeout,
    /// The peer reset or aborted an established connection.
    #[error("connection reset: {0}")]
    ConnectionReset(#[source] BoxError),
    /// Establishing the connection timed out.
    #[error("connection timed out: {0}")]
    ConnectionTimeout(#[source] BoxError),
    /// Any other failure. Never retried.
    #[error("{0}")]
    Other(#[source] BoxError),
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::ConnectionReset(_) | Self::ConnectionTimeout(_)
        )
    }
}

pub(crate) fn is_retryable_status(status: u16) -> bool {
    status >= 500 || status == 429
}
